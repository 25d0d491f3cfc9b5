pub mod auth;
pub mod home;
pub mod pages;
pub mod predict;
pub mod profile;
pub mod records;

use axum::response::Html;
use dioxus::prelude::*;

use crate::error::AppError;

pub async fn not_found() -> AppError {
    AppError::NotFound
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Render a page element into an HTML response body.
pub(crate) fn page(element: Element) -> Html<String> {
    Html(ui::render_page(element))
}

/// Only same-site absolute paths are followed after login.
pub(crate) fn local_redirect_target(next: Option<&str>) -> Option<&str> {
    next.filter(|n| n.starts_with('/') && !n.starts_with("//") && !n.contains('\\'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_redirect_target() {
        assert_eq!(local_redirect_target(Some("/records")), Some("/records"));
        assert_eq!(local_redirect_target(Some("//evil.com")), None);
        assert_eq!(local_redirect_target(Some("https://evil.com")), None);
        assert_eq!(local_redirect_target(Some("/\\evil.com")), None);
        assert_eq!(local_redirect_target(None), None);
    }
}
