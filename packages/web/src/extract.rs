//! Request extractors for the logged-in user.

use api::auth::{self, Flash};
use api::{User, UserInfo};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tower_sessions::Session;

use crate::error::AppError;
use crate::AppState;

/// The session and, when logged in, the user it belongs to.
pub struct MaybeUser {
    pub session: Session,
    pub user: Option<UserInfo>,
}

/// Like [`MaybeUser`], but rejects anonymous requests with the unauthorized page.
pub struct CurrentUser {
    pub session: Session,
    pub user: UserInfo,
}

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| AppError::Internal(msg.to_string()))?;

        let user = match auth::current_user_id(&session).await? {
            Some(id) => {
                let user = User::find_by_id(&state.pool, id).await?;
                if user.is_none() {
                    // Account is gone; forget the stale id.
                    tracing::warn!(user_id = id, "Session refers to a missing user");
                    auth::logout(&session).await?;
                }
                user.map(|u| u.to_info())
            }
            None => None,
        };

        Ok(MaybeUser { session, user })
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let MaybeUser { session, user } = MaybeUser::from_request_parts(parts, state).await?;
        match user {
            Some(user) => Ok(CurrentUser { session, user }),
            None => Err(AppError::Unauthorized {
                next: Some(parts.uri.path().to_string()),
            }),
        }
    }
}

/// Drain pending flash messages; a broken session only loses the messages.
pub async fn flashes(session: &Session) -> Vec<Flash> {
    match auth::take_flashes(session).await {
        Ok(flashes) => flashes,
        Err(e) => {
            tracing::warn!("Failed to read flash messages: {}", e);
            Vec::new()
        }
    }
}

/// Queue a flash message, logging instead of failing the request.
pub async fn flash(session: &Session, category: auth::FlashCategory, message: impl Into<String>) {
    if let Err(e) = auth::flash(session, category, message).await {
        tracing::warn!("Failed to store flash message: {}", e);
    }
}
