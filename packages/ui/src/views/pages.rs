//! Static informational pages and the contact form.

use api::auth::Flash;
use api::UserInfo;
use dioxus::prelude::*;
use vision::AnomalyLabel;

use crate::{FormErrors, Layout};

#[component]
pub fn AboutPage(user: Option<UserInfo>, flashes: Vec<Flash>) -> Element {
    rsx! {
        Layout {
            title: "About",
            user: user,
            flashes: flashes,
            h1 { "About" }
            p {
                "This service classifies images of crowds into behaviour categories. "
                "A convolutional network trained on annotated crowd footage scores each upload, "
                "and an optional object detector marks where people are in the scene."
            }
            h2 { "Categories" }
            ul {
                for label in AnomalyLabel::ALL.iter() {
                    li { key: "{label.as_str()}", "{label.display_name()}" }
                }
            }
        }
    }
}

#[component]
pub fn FaqPage(user: Option<UserInfo>, flashes: Vec<Flash>) -> Element {
    rsx! {
        Layout {
            title: "FAQ",
            user: user,
            flashes: flashes,
            h1 { "Frequently asked questions" }
            dl {
                dt { "Which files can I upload?" }
                dd { "PNG and JPEG images. Other files are rejected." }
                dt { "Do I need an account?" }
                dd { "No. Anyone can run a prediction, but only logged-in users can save results as records." }
                dt { "What do the scores mean?" }
                dd { "Each score is the model's confidence for one category. The highest one is shown as the most likely." }
                dt { "Can I remove a record?" }
                dd { "Yes. Open the record and press delete. Its image is removed as well." }
            }
        }
    }
}

/// Values echoed back into the contact form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[component]
pub fn ContactPage(
    user: UserInfo,
    flashes: Vec<Flash>,
    form: ContactForm,
    #[props(default)] errors: Vec<String>,
) -> Element {
    rsx! {
        Layout {
            title: "Contact",
            user: Some(user),
            flashes: flashes,
            h1 { "Contact us" }
            form {
                class: "card",
                method: "post",
                action: "/contact",
                FormErrors { errors: errors }
                label { r#for: "name", "Name" }
                input { id: "name", name: "name", value: "{form.name}", required: true }
                label { r#for: "email", "Email" }
                input { id: "email", r#type: "email", name: "email", value: "{form.email}", required: true }
                label { r#for: "message", "Message" }
                textarea { id: "message", name: "message", rows: "5", "{form.message}" }
                button { r#type: "submit", "Send" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_page;

    #[test]
    fn test_about_lists_categories() {
        let html = render_page(rsx! { AboutPage { user: None::<UserInfo>, flashes: vec![] } });
        assert!(html.contains("Non-pedestrian"));
        assert!(html.contains("Sleeping"));
    }
}
