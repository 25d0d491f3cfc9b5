use api::UserInfo;
use dioxus::prelude::*;

use crate::Layout;

/// Variants of the not-found page; one is chosen per response.
pub const NOT_FOUND_VARIANTS: [&str; 5] = [
    "The page you are looking for wandered off with the crowd.",
    "Nothing here. Perhaps it was never uploaded.",
    "This page seems to be standing somewhere else.",
    "We searched every record and came up empty.",
    "Lost in the crowd. Try the home page instead.",
];

#[component]
pub fn ErrorPage(
    user: Option<UserInfo>,
    code: u16,
    title: String,
    message: String,
) -> Element {
    rsx! {
        Layout {
            title: "{code} {title}",
            user: user,
            div {
                class: "error-page",
                h1 { class: "error-code", "{code}" }
                h2 { "{title}" }
                p { "{message}" }
                p { a { href: "/", "Back to home" } }
            }
        }
    }
}

/// Shown when a page requires login.
#[component]
pub fn UnauthorizedPage(next: Option<String>) -> Element {
    let login = match next {
        Some(ref next) => format!("/login?next={next}"),
        None => "/login".to_string(),
    };

    rsx! {
        Layout {
            title: "401 Unauthorized",
            user: None::<UserInfo>,
            div {
                class: "error-page",
                h1 { class: "error-code", "401" }
                h2 { "Unauthorized" }
                p { "You need to be logged in to view this page." }
                p { a { href: "{login}", "Log in" } " or " a { href: "/register", "create an account" } }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_page;

    #[test]
    fn test_unauthorized_links_back() {
        let html = render_page(rsx! { UnauthorizedPage { next: Some("/records".to_string()) } });
        assert!(html.contains("/login?next=/records"));
    }

    #[test]
    fn test_error_page() {
        let html = render_page(rsx! {
            ErrorPage { user: None::<UserInfo>, code: 406, title: "Not Acceptable", message: "Unsupported file." }
        });
        assert!(html.contains("406"));
        assert!(html.contains("Unsupported file."));
    }
}
