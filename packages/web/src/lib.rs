//! HTTP surface of the crowd anomaly detector.
//!
//! [`build_router`] wires every page onto an axum [`Router`]. The session
//! layer is left to the caller: the binary uses a SQLite-backed store, tests
//! use an in-memory one.

use std::path::PathBuf;
use std::sync::Arc;

use api::settings::DEFAULT_MAX_UPLOAD_BYTES;
use api::ImageStore;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use sqlx::SqlitePool;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use vision::{AnomalyClassifier, ObjectLocalizer};

pub mod error;
pub mod extract;
mod routes;

pub use error::{AppError, AppResult};

/// Shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub static_dir: PathBuf,
    pub images: ImageStore,
    pub classifier: Arc<dyn AnomalyClassifier>,
    pub localizer: Option<Arc<dyn ObjectLocalizer>>,
    /// Body limit of the multipart upload routes.
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        pool: SqlitePool,
        static_dir: impl Into<PathBuf>,
        classifier: Arc<dyn AnomalyClassifier>,
    ) -> Self {
        let static_dir = static_dir.into();
        Self {
            pool,
            images: ImageStore::new(&static_dir),
            static_dir,
            classifier,
            localizer: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    pub fn with_localizer(mut self, localizer: Arc<dyn ObjectLocalizer>) -> Self {
        self.localizer = Some(localizer);
        self
    }
}

pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.static_dir);
    let upload_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        .route("/", get(routes::home::index))
        .route("/index", get(routes::home::index))
        .route("/home", get(routes::home::index))
        .route("/predict", post(routes::predict::predict).layer(upload_limit))
        .route("/records", get(routes::records::list))
        .route("/record/new", post(routes::records::create))
        .route("/record/{id}", get(routes::records::show))
        .route(
            "/record/{id}/delete",
            get(routes::records::delete).post(routes::records::delete),
        )
        .route("/record/{id}/notes", post(routes::records::update_notes))
        .route("/about", get(routes::pages::about))
        .route("/faq", get(routes::pages::faq))
        .route(
            "/contact",
            get(routes::pages::contact_form).post(routes::pages::contact_submit),
        )
        .route(
            "/register",
            get(routes::auth::register_form).post(routes::auth::register),
        )
        .route("/login", get(routes::auth::login_form).post(routes::auth::login))
        .route("/logout", get(routes::auth::logout))
        .route(
            "/profile",
            get(routes::profile::show)
                .post(routes::profile::update)
                .layer(upload_limit),
        )
        .nest_service("/static", static_files)
        .fallback(routes::not_found)
        .method_not_allowed_fallback(routes::method_not_allowed)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
