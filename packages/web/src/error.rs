//! Handler errors and the error pages they render.

use api::auth::PasswordError;
use api::UploadError;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use dioxus::prelude::*;
use rand::seq::SliceRandom;
use thiserror::Error;
use ui::views::{ErrorPage, UnauthorizedPage, NOT_FOUND_VARIANTS};
use vision::VisionError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("You need to be logged in to view this page")]
    Unauthorized { next: Option<String> },
    /// Logged in, but the resource belongs to someone else.
    #[error("{0}")]
    Forbidden(String),
    #[error("Not found")]
    NotFound,
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("{0}")]
    NotAcceptable(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
    #[error("inference error: {0}")]
    Vision(VisionError),
    #[error("password error: {0}")]
    Password(#[from] PasswordError),
    #[error("storage error: {0}")]
    Storage(UploadError),
    #[error("{0}")]
    Internal(String),
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Empty | UploadError::Extension(_) | UploadError::Image(_) => {
                AppError::NotAcceptable(err.to_string())
            }
            UploadError::Name => AppError::BadRequest(err.to_string()),
            UploadError::Io(_) => AppError::Storage(err),
        }
    }
}

impl From<VisionError> for AppError {
    fn from(err: VisionError) -> Self {
        match err {
            VisionError::Decode(e) => AppError::NotAcceptable(format!("The file is not a readable image: {e}")),
            other => AppError::Vision(other),
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        match err.status() {
            StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge(err.body_text()),
            _ => AppError::BadRequest(err.body_text()),
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("background task failed: {err}"))
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized { .. } | AppError::Forbidden(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::NotAcceptable(_) => StatusCode::NOT_ACCEPTABLE,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Database(_)
            | AppError::Session(_)
            | AppError::Vision(_)
            | AppError::Password(_)
            | AppError::Storage(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn title(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "Bad Request",
            AppError::Unauthorized { .. } | AppError::Forbidden(_) => "Unauthorized",
            AppError::NotFound => "Page Not Found",
            AppError::MethodNotAllowed => "Method Not Allowed",
            AppError::NotAcceptable(_) => "File Error",
            AppError::PayloadTooLarge(_) => "File Too Large",
            _ => "Internal Server Error",
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::NotFound => NOT_FOUND_VARIANTS
                .choose(&mut rand::thread_rng())
                .copied()
                .unwrap_or("The page you are looking for does not exist.")
                .to_string(),
            AppError::MethodNotAllowed => {
                "The method you are trying to use is not allowed.".to_string()
            }
            AppError::BadRequest(msg)
            | AppError::Forbidden(msg)
            | AppError::NotAcceptable(msg)
            | AppError::PayloadTooLarge(msg) => msg.clone(),
            _ => "Something went wrong on our side. Please try again later.".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::debug!(status = status.as_u16(), "{}", self);
        }

        let page = match self {
            AppError::Unauthorized { next } => rsx! { UnauthorizedPage { next: next } },
            ref err => rsx! {
                ErrorPage {
                    user: None::<api::UserInfo>,
                    code: status.as_u16(),
                    title: err.title().to_string(),
                    message: err.message(),
                }
            },
        };
        (status, Html(ui::render_page(page))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_errors_are_not_acceptable() {
        let err = AppError::from(UploadError::Extension("gif".into()));
        assert_eq!(err.status(), StatusCode::NOT_ACCEPTABLE);
        let err = AppError::from(UploadError::Empty);
        assert_eq!(err.status(), StatusCode::NOT_ACCEPTABLE);
        let err = AppError::from(UploadError::Io(std::io::Error::other("disk full")));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_oversized_upload_keeps_status() {
        let err = AppError::PayloadTooLarge("length limit exceeded".into());
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(err.title(), "File Too Large");
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_not_found_renders_variant() {
        let response = AppError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
