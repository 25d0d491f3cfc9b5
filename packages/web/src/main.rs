use std::sync::Arc;

use anyhow::Context;
use api::auth::SESSION_INACTIVITY;
use api::Settings;
use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vision::{AnomalyClassifier, FixedClassifier, LocalizerConfig, TractClassifier, TractLocalizer};
use web::{build_router, AppState};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

fn load_classifier(settings: &Settings) -> anyhow::Result<Arc<dyn AnomalyClassifier>> {
    match settings.models.classifier {
        Some(ref path) => {
            let classifier = TractClassifier::load(path)
                .with_context(|| format!("Failed to load classifier from {path}"))?;
            tracing::info!(%path, "Classifier loaded");
            Ok(Arc::new(classifier))
        }
        None => {
            tracing::warn!("No classifier model configured, predictions will be uniform");
            Ok(Arc::new(FixedClassifier::default()))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::new().context("Failed to load settings")?;
    init_logging();

    let pool = api::db::connect(&settings.database.url, settings.database.max_connections)
        .await
        .with_context(|| format!("Failed to connect to {}", settings.database.url))?;
    api::db::migrate(&pool)
        .await
        .context("Failed to run migrations")?;

    let session_store = SqliteStore::new(pool.clone());
    session_store
        .migrate()
        .await
        .context("Failed to create session table")?;

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(settings.server.secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(SESSION_INACTIVITY));

    let mut state = AppState::new(pool, &settings.storage.static_dir, load_classifier(&settings)?)
        .with_max_upload_bytes(settings.server.max_upload_bytes);
    if let Some(ref path) = settings.models.localizer {
        let config = LocalizerConfig {
            input_size: settings.models.localizer_input,
            confidence_threshold: settings.models.confidence_threshold,
            iou_threshold: settings.models.iou_threshold,
            ..LocalizerConfig::default()
        };
        let localizer = TractLocalizer::load(path, config)
            .with_context(|| format!("Failed to load localizer from {path}"))?;
        tracing::info!(%path, "Localizer loaded");
        state = state.with_localizer(Arc::new(localizer));
    }
    state
        .images
        .ensure_dirs()
        .with_context(|| format!("Failed to create image folders under {}", settings.storage.static_dir))?;

    let router = build_router(state).layer(session_layer);

    let addr = settings.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router.into_make_service()).await?;
    Ok(())
}
