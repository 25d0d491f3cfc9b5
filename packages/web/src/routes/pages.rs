use api::auth::FlashCategory;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use dioxus::prelude::*;
use serde::Deserialize;
use ui::views::{AboutPage, ContactForm, ContactPage, FaqPage};

use super::page;
use crate::extract::{flash, flashes, CurrentUser, MaybeUser};

pub async fn about(viewer: MaybeUser) -> Html<String> {
    let flashes = flashes(&viewer.session).await;
    page(rsx! { AboutPage { user: viewer.user, flashes: flashes } })
}

pub async fn faq(viewer: MaybeUser) -> Html<String> {
    let flashes = flashes(&viewer.session).await;
    page(rsx! { FaqPage { user: viewer.user, flashes: flashes } })
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContactData {
    name: String,
    email: String,
    message: String,
}

pub async fn contact_form(current: CurrentUser) -> Html<String> {
    let flashes = flashes(&current.session).await;
    let form = ContactForm {
        name: current.user.username.clone(),
        email: current.user.email.clone(),
        message: String::new(),
    };
    page(rsx! { ContactPage { user: current.user, flashes: flashes, form: form } })
}

pub async fn contact_submit(current: CurrentUser, Form(data): Form<ContactData>) -> Response {
    let form = ContactForm {
        name: data.name.trim().to_string(),
        email: data.email.trim().to_string(),
        message: data.message.trim().to_string(),
    };

    let mut errors = Vec::new();
    if form.name.is_empty() {
        errors.push("Name is required.".to_string());
    }
    if !form.email.contains('@') {
        errors.push("Invalid email address.".to_string());
    }
    if form.message.is_empty() {
        errors.push("Message is required.".to_string());
    }

    if !errors.is_empty() {
        let flashes = flashes(&current.session).await;
        return page(rsx! {
            ContactPage { user: current.user, flashes: flashes, form: form, errors: errors }
        })
        .into_response();
    }

    tracing::info!(
        user_id = current.user.id,
        from = %form.email,
        length = form.message.len(),
        "Contact message received"
    );
    flash(&current.session, FlashCategory::Success, "Your message has been sent!").await;
    Redirect::to("/contact").into_response()
}
