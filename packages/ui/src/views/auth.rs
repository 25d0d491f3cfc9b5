use api::auth::Flash;
use api::UserInfo;
use dioxus::prelude::*;

use crate::{FormErrors, Layout};

/// Values echoed back into the login form after a failed attempt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub remember: bool,
    pub next: Option<String>,
}

#[component]
pub fn LoginPage(
    flashes: Vec<Flash>,
    form: LoginForm,
    #[props(default)] errors: Vec<String>,
) -> Element {
    rsx! {
        Layout {
            title: "Login",
            user: None::<UserInfo>,
            flashes: flashes,
            h1 { "Log in" }
            form {
                class: "card",
                method: "post",
                action: "/login",
                FormErrors { errors: errors }
                if let Some(ref next) = form.next {
                    input { r#type: "hidden", name: "next", value: "{next}" }
                }
                label { r#for: "email", "Email" }
                input { id: "email", r#type: "email", name: "email", value: "{form.email}", required: true }
                label { r#for: "password", "Password" }
                input { id: "password", r#type: "password", name: "password", required: true }
                label {
                    class: "check",
                    input { r#type: "checkbox", name: "remember", value: "true", checked: form.remember }
                    "Remember me"
                }
                button { r#type: "submit", "Log in" }
            }
            p { "Need an account? " a { href: "/register", "Register" } }
        }
    }
}

/// Values echoed back into the registration form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
}

#[component]
pub fn RegisterPage(
    flashes: Vec<Flash>,
    form: RegisterForm,
    #[props(default)] errors: Vec<String>,
) -> Element {
    rsx! {
        Layout {
            title: "Register",
            user: None::<UserInfo>,
            flashes: flashes,
            h1 { "Create an account" }
            form {
                class: "card",
                method: "post",
                action: "/register",
                FormErrors { errors: errors }
                label { r#for: "username", "Username" }
                input { id: "username", name: "username", value: "{form.username}", required: true }
                label { r#for: "email", "Email" }
                input { id: "email", r#type: "email", name: "email", value: "{form.email}", required: true }
                label { r#for: "password", "Password" }
                input { id: "password", r#type: "password", name: "password", required: true }
                label { r#for: "confirm_password", "Confirm password" }
                input { id: "confirm_password", r#type: "password", name: "confirm_password", required: true }
                button { r#type: "submit", "Sign up" }
            }
            p { "Already registered? " a { href: "/login", "Log in" } }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_page;

    #[test]
    fn test_login_keeps_next_and_errors() {
        let form = LoginForm {
            email: "ann@example.com".into(),
            remember: false,
            next: Some("/records".into()),
        };
        let html = render_page(rsx! {
            LoginPage { flashes: vec![], form: form, errors: vec!["Login unsuccessful.".to_string()] }
        });
        assert!(html.contains("value=\"/records\""));
        assert!(html.contains("ann@example.com"));
        assert!(html.contains("Login unsuccessful."));
    }
}
