use api::auth::FlashCategory;
use api::uploads::allowed_extension;
use api::{Folder, User};
use axum::extract::{Multipart, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use dioxus::prelude::*;
use sqlx::SqlitePool;
use ui::views::ProfilePage;
use vision::preprocess;

use super::auth::{check_taken, validate_account};
use super::page;
use crate::error::AppResult;
use crate::extract::{flash, flashes, CurrentUser};
use crate::AppState;

#[derive(Debug, Default)]
struct ProfileData {
    username: String,
    email: String,
    picture: Option<(String, Vec<u8>)>,
}

async fn read_profile_form(mut multipart: Multipart) -> AppResult<ProfileData> {
    let mut data = ProfileData::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "username" | "email" => {
                let value = field.text().await?;
                if name == "username" {
                    data.username = value.trim().to_string();
                } else {
                    data.email = value.trim().to_string();
                }
            }
            "picture" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                // Browsers send an empty part when no file was chosen.
                if !filename.is_empty() && !bytes.is_empty() {
                    data.picture = Some((filename, bytes.to_vec()));
                }
            }
            _ => {}
        }
    }
    Ok(data)
}

async fn save_profile(
    pool: &SqlitePool,
    user_id: i64,
    username: &str,
    email: &str,
    image_file: &str,
) -> Result<User, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let user = User::update_profile(&mut *tx, user_id, username, email, image_file).await?;
    tx.commit().await?;
    Ok(user)
}

pub async fn show(current: CurrentUser) -> Html<String> {
    let flashes = flashes(&current.session).await;
    let username = current.user.username.clone();
    let email = current.user.email.clone();
    page(rsx! {
        ProfilePage { user: current.user, flashes: flashes, username: username, email: email }
    })
}

pub async fn update(
    State(state): State<AppState>,
    current: CurrentUser,
    multipart: Multipart,
) -> AppResult<Response> {
    let data = read_profile_form(multipart).await?;
    let user_id = current.user.id;

    let mut errors = validate_account(&data.username, &data.email);
    if let Some((ref filename, _)) = data.picture {
        if let Err(e) = allowed_extension(filename) {
            errors.push(e.to_string());
        }
    }
    if errors.is_empty() {
        errors = check_taken(&state.pool, &data.username, &data.email, Some(user_id)).await?;
    }
    if !errors.is_empty() {
        let flashes = flashes(&current.session).await;
        return Ok(page(rsx! {
            ProfilePage {
                user: current.user,
                flashes: flashes,
                username: data.username,
                email: data.email,
                errors: errors,
            }
        })
        .into_response());
    }

    let old_picture = current.user.image_file.clone();
    let image_file = match data.picture {
        Some((filename, bytes)) => {
            let images = state.images.clone();
            let stored = tokio::task::spawn_blocking(move || -> AppResult<String> {
                let image = preprocess::decode(&bytes)?;
                Ok(images.save_thumbnail(&filename, &image)?)
            })
            .await??;
            Some(stored)
        }
        None => None,
    };

    let new_picture = image_file.as_deref().unwrap_or(&old_picture);
    if let Err(e) =
        save_profile(&state.pool, user_id, &data.username, &data.email, new_picture).await
    {
        tracing::error!(user_id, "Failed to update profile: {}", e);
        if let Some(stored) = image_file {
            let images = state.images.clone();
            tokio::task::spawn_blocking(move || images.remove(Folder::ProfilePics, &stored)).await?;
        }
        flash(
            &current.session,
            FlashCategory::Danger,
            "An error occurred while updating your account. Please try again later.",
        )
        .await;
        return Ok(Redirect::to("/profile").into_response());
    }

    if image_file.is_some() {
        let images = state.images.clone();
        tokio::task::spawn_blocking(move || images.remove(Folder::ProfilePics, &old_picture)).await?;
    }

    tracing::info!(user_id, "Profile updated");
    flash(&current.session, FlashCategory::Success, "Your account has been updated!").await;
    Ok(Redirect::to("/profile").into_response())
}
