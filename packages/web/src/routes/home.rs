use axum::response::Html;
use dioxus::prelude::*;
use ui::views::IndexPage;

use super::page;
use crate::extract::{flashes, MaybeUser};

pub async fn index(viewer: MaybeUser) -> Html<String> {
    let flashes = flashes(&viewer.session).await;
    page(rsx! { IndexPage { user: viewer.user, flashes: flashes } })
}
