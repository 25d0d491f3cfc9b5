//! This crate contains all pages of the web server.
//!
//! Pages are Dioxus components rendered once per request with `dioxus-ssr`;
//! there is no client-side runtime. Forms post back to the server and the
//! next page shows the outcome through flash messages.

use dioxus::prelude::*;

mod layout;
pub use layout::{FormErrors, Layout};

pub mod views;

/// Placeholder of the notes textarea, treated as "no notes" on submit.
pub const NOTE_PLACEHOLDER: &str = "Add some notes.(Optional)";

/// Render a page element to a complete HTML document.
///
/// `dioxus-html` has no `html` element, so the root tag is written here and
/// [`Layout`] only renders `head` and `body`.
pub fn render_page(page: Element) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"en\">{}</html>",
        dioxus_ssr::render_element(page)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_page_wraps_document() {
        let html = render_page(rsx! {
            Layout { title: "Home", user: None::<api::UserInfo>, p { "hello" } }
        });
        assert!(html.starts_with("<!DOCTYPE html><html lang=\"en\"><head>"));
        assert!(html.ends_with("</body></html>"));
        assert!(html.contains("Home | Crowd Anomaly Detector"));
        assert!(html.contains("<p>hello</p>"));
    }
}
