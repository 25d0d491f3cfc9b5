use api::auth::Flash;
use api::UserInfo;
use dioxus::prelude::*;

use crate::Layout;

/// Multipart field name of the uploaded image.
pub const UPLOAD_FIELD: &str = "uploadedImage";

#[component]
pub fn IndexPage(user: Option<UserInfo>, flashes: Vec<Flash>) -> Element {
    rsx! {
        Layout {
            title: "Home",
            user: user,
            flashes: flashes,
            h1 { "Crowd anomaly detection" }
            p {
                class: "lead",
                "Upload a crowd scene and the classifier scores it against seven kinds of anomalous behaviour."
            }
            form {
                class: "card",
                method: "post",
                action: "/predict",
                enctype: "multipart/form-data",
                label { r#for: "{UPLOAD_FIELD}", "Image (png, jpg, jpeg)" }
                input {
                    id: "{UPLOAD_FIELD}",
                    r#type: "file",
                    name: UPLOAD_FIELD,
                    accept: ".png,.jpg,.jpeg",
                    required: true,
                }
                button { r#type: "submit", "Predict" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_page;

    #[test]
    fn test_index_has_upload_form() {
        let html = render_page(rsx! { IndexPage { user: None::<UserInfo>, flashes: vec![] } });
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("multipart/form-data"));
        assert!(html.contains("name=\"uploadedImage\""));
        assert!(html.contains("/register"));
    }
}
