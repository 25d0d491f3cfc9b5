use api::auth::FlashCategory;
use api::models::normalize_notes;
use api::uploads::is_stored_name;
use api::{Folder, Record};
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use dioxus::prelude::*;
use serde::Deserialize;
use sqlx::SqlitePool;
use ui::views::{RecordPage, RecordView, RecordsPage};
use ui::NOTE_PLACEHOLDER;
use vision::Prediction;

use super::page;
use crate::error::{AppError, AppResult};
use crate::extract::{flash, flashes, CurrentUser};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct NewRecordForm {
    image_name: Option<String>,
    predicted: Option<String>,
    note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NotesForm {
    note: Option<String>,
}

/// Record ids in paths are integers; anything else names no record.
fn record_id(raw: &str) -> AppResult<i64> {
    raw.parse().map_err(|_| AppError::NotFound)
}

/// Load a record the current user owns: 404 when missing, 401 when foreign.
async fn owned_record(pool: &SqlitePool, user_id: i64, id: i64) -> AppResult<Record> {
    let record = Record::find(pool, id).await?.ok_or(AppError::NotFound)?;
    if !record.is_owned_by(user_id) {
        tracing::warn!(record_id = id, user_id, "Access to a foreign record refused");
        return Err(AppError::Forbidden(
            "You are not authorized to access this record.".to_string(),
        ));
    }
    Ok(record)
}

pub async fn list(State(state): State<AppState>, current: CurrentUser) -> AppResult<Response> {
    let records = Record::list_for_user(&state.pool, current.user.id).await?;
    if records.is_empty() {
        flash(&current.session, FlashCategory::Info, "No records found.").await;
        return Ok(Redirect::to("/").into_response());
    }

    let records: Vec<RecordView> = records.iter().map(RecordView::from).collect();
    let flashes = flashes(&current.session).await;
    Ok(page(rsx! {
        RecordsPage { user: Some(current.user), flashes: flashes, records: records }
    })
    .into_response())
}

pub async fn show(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let id = record_id(&id)?;
    let record = owned_record(&state.pool, current.user.id, id).await?;
    let record = RecordView::from(&record);
    let flashes = flashes(&current.session).await;
    Ok(page(rsx! {
        RecordPage { user: Some(current.user), flashes: flashes, record: record }
    }))
}

async fn insert_record(
    pool: &SqlitePool,
    user_id: i64,
    image_name: &str,
    prediction: &Prediction,
    notes: &str,
) -> Result<Record, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let record = Record::create(&mut *tx, user_id, image_name, prediction, notes).await?;
    tx.commit().await?;
    Ok(record)
}

pub async fn create(
    State(state): State<AppState>,
    current: CurrentUser,
    Form(form): Form<NewRecordForm>,
) -> AppResult<Redirect> {
    let (Some(image_name), Some(predicted)) = (form.image_name, form.predicted) else {
        return Err(AppError::BadRequest("The request you sent is invalid.".to_string()));
    };
    if !is_stored_name(&image_name) || !state.images.exists(Folder::Records, &image_name) {
        return Err(AppError::BadRequest("Unknown image.".to_string()));
    }
    let prediction = Prediction::parse(&predicted)
        .map_err(|e| AppError::BadRequest(format!("Invalid prediction: {e}")))?;
    let notes = normalize_notes(form.note.as_deref(), NOTE_PLACEHOLDER);

    match insert_record(&state.pool, current.user.id, &image_name, &prediction, &notes).await {
        Ok(record) => {
            tracing::info!(record_id = record.id, user_id = current.user.id, "Record saved");
            flash(&current.session, FlashCategory::Success, "Your record has been saved!").await;
            Ok(Redirect::to("/records"))
        }
        Err(e) => {
            tracing::error!(user_id = current.user.id, "Failed to save record: {}", e);
            flash(
                &current.session,
                FlashCategory::Danger,
                "An error occurred while saving your record. Please try again later.",
            )
            .await;
            Ok(Redirect::to("/"))
        }
    }
}

async fn delete_record(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let deleted = Record::delete(&mut *tx, id).await?;
    tx.commit().await?;
    Ok(deleted)
}

pub async fn delete(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Redirect> {
    let id = record_id(&id)?;
    let record = owned_record(&state.pool, current.user.id, id).await?;

    match delete_record(&state.pool, record.id).await {
        Ok(_) => {
            let images = state.images.clone();
            let name = record.image_name.clone();
            tokio::task::spawn_blocking(move || {
                images.remove(Folder::Records, &name);
                images.remove(Folder::Localized, &name);
            })
            .await?;
            tracing::info!(record_id = id, "Record deleted");
            flash(&current.session, FlashCategory::Success, "Your record has been deleted!").await;
        }
        Err(e) => {
            tracing::error!(record_id = id, "Failed to delete record: {}", e);
            flash(
                &current.session,
                FlashCategory::Danger,
                "An error occurred while deleting your record. Please try again later.",
            )
            .await;
        }
    }
    Ok(Redirect::to("/records"))
}

async fn save_notes(pool: &SqlitePool, id: i64, notes: &str) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let updated = Record::update_notes(&mut *tx, id, notes).await?;
    tx.commit().await?;
    Ok(updated)
}

pub async fn update_notes(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
    Form(form): Form<NotesForm>,
) -> AppResult<Redirect> {
    let id = record_id(&id)?;
    let record = owned_record(&state.pool, current.user.id, id).await?;
    let notes = normalize_notes(form.note.as_deref(), NOTE_PLACEHOLDER);

    match save_notes(&state.pool, record.id, &notes).await {
        Ok(_) => {
            flash(&current.session, FlashCategory::Success, "Your notes have been updated!").await;
        }
        Err(e) => {
            tracing::error!(record_id = record.id, "Failed to update notes: {}", e);
            flash(
                &current.session,
                FlashCategory::Danger,
                "An error occurred while updating your notes. Please try again later.",
            )
            .await;
        }
    }
    Ok(Redirect::to(&format!("/record/{}", record.id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id() {
        assert_eq!(record_id("42").unwrap(), 42);
        assert!(matches!(record_id("abc"), Err(AppError::NotFound)));
        assert!(matches!(record_id("1.5"), Err(AppError::NotFound)));
    }
}
