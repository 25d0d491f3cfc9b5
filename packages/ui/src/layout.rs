use api::auth::Flash;
use api::UserInfo;
use dioxus::prelude::*;

/// Document shell shared by every page: head, navbar, flash messages.
#[component]
pub fn Layout(
    title: String,
    user: Option<UserInfo>,
    #[props(default)] flashes: Vec<Flash>,
    children: Element,
) -> Element {
    rsx! {
        head {
            meta { charset: "utf-8" }
            meta { name: "viewport", content: "width=device-width, initial-scale=1" }
            title { "{title} | Crowd Anomaly Detector" }
            link { rel: "stylesheet", href: "/static/css/main.css" }
        }
        body {
            nav {
                class: "navbar",
                a { class: "brand", href: "/", "Crowd Anomaly Detector" }
                div {
                    class: "nav-links",
                    a { href: "/", "Home" }
                    a { href: "/about", "About" }
                    a { href: "/faq", "FAQ" }
                    if let Some(ref u) = user {
                        a { href: "/records", "Records" }
                        a { href: "/contact", "Contact" }
                        a {
                            class: "nav-user",
                            href: "/profile",
                            img { class: "nav-avatar", src: "{u.image_url()}", alt: "" }
                            "{u.username}"
                        }
                        a { href: "/logout", "Logout" }
                    } else {
                        a { href: "/login", "Login" }
                        a { href: "/register", "Register" }
                    }
                }
            }
            main {
                class: "content",
                for flash in flashes.iter() {
                    div {
                        class: "flash flash-{flash.category.as_str()}",
                        "{flash.message}"
                    }
                }
                {children}
            }
        }
    }
}

/// Validation messages above a form.
#[component]
pub fn FormErrors(errors: Vec<String>) -> Element {
    rsx! {
        if !errors.is_empty() {
            ul {
                class: "form-errors",
                for error in errors.iter() {
                    li { "{error}" }
                }
            }
        }
    }
}
