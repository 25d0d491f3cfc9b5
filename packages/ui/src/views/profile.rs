use api::auth::Flash;
use api::UserInfo;
use dioxus::prelude::*;

use crate::{FormErrors, Layout};

#[component]
pub fn ProfilePage(
    user: UserInfo,
    flashes: Vec<Flash>,
    /// Values to show in the form; the stored ones unless a submit failed.
    username: String,
    email: String,
    #[props(default)] errors: Vec<String>,
) -> Element {
    let avatar = user.image_url();

    rsx! {
        Layout {
            title: "Profile",
            user: Some(user.clone()),
            flashes: flashes,
            div {
                class: "profile",
                img { class: "avatar", src: "{avatar}", alt: "Profile picture" }
                div {
                    h1 { "{user.username}" }
                    p { class: "muted", "{user.email}" }
                }
            }
            form {
                class: "card",
                method: "post",
                action: "/profile",
                enctype: "multipart/form-data",
                FormErrors { errors: errors }
                label { r#for: "username", "Username" }
                input { id: "username", name: "username", value: "{username}", required: true }
                label { r#for: "email", "Email" }
                input { id: "email", r#type: "email", name: "email", value: "{email}", required: true }
                label { r#for: "picture", "Profile picture" }
                input { id: "picture", r#type: "file", name: "picture", accept: ".png,.jpg,.jpeg" }
                button { r#type: "submit", "Update" }
            }
        }
    }
}
