//! Session data: the logged-in user and one-shot flash messages.

use serde::{Deserialize, Serialize};
use tower_sessions::cookie::time::Duration;
use tower_sessions::session::Error;
use tower_sessions::{Expiry, Session};

/// Key for storing user ID in session.
pub const SESSION_USER_ID_KEY: &str = "user_id";

const FLASHES_KEY: &str = "_flashes";

/// Session lifetime without "remember me".
pub const SESSION_INACTIVITY: Duration = Duration::days(1);
/// Session lifetime with "remember me".
pub const REMEMBER_ME: Duration = Duration::days(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashCategory {
    Success,
    Info,
    Danger,
}

impl FlashCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashCategory::Success => "success",
            FlashCategory::Info => "info",
            FlashCategory::Danger => "danger",
        }
    }
}

/// A message shown once on the next rendered page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flash {
    pub category: FlashCategory,
    pub message: String,
}

impl Flash {
    pub fn new(category: FlashCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }
}

/// Queue a flash message.
pub async fn flash(
    session: &Session,
    category: FlashCategory,
    message: impl Into<String>,
) -> Result<(), Error> {
    let mut flashes: Vec<Flash> = session.get(FLASHES_KEY).await?.unwrap_or_default();
    flashes.push(Flash::new(category, message));
    session.insert(FLASHES_KEY, flashes).await
}

/// Drain queued flash messages.
pub async fn take_flashes(session: &Session) -> Result<Vec<Flash>, Error> {
    Ok(session
        .remove::<Vec<Flash>>(FLASHES_KEY)
        .await?
        .unwrap_or_default())
}

/// Attach `user_id` to the session under a fresh session id.
pub async fn login(session: &Session, user_id: i64, remember: bool) -> Result<(), Error> {
    session.cycle_id().await?;
    session.insert(SESSION_USER_ID_KEY, user_id).await?;
    let lifetime = if remember { REMEMBER_ME } else { SESSION_INACTIVITY };
    session.set_expiry(Some(Expiry::OnInactivity(lifetime)));
    Ok(())
}

/// Drop the whole session, including pending flashes.
pub async fn logout(session: &Session) -> Result<(), Error> {
    session.flush().await
}

pub async fn current_user_id(session: &Session) -> Result<Option<i64>, Error> {
    session.get(SESSION_USER_ID_KEY).await
}
