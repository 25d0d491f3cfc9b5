//! Stored classification results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteExecutor};
use vision::Prediction;

/// Notes stored when the user leaves the field empty.
pub const EMPTY_NOTES: &str = "No notes.";

/// One row of the `records` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    pub image_name: String,
    /// Serialized [`Prediction`], e.g. `[0.1, 0.7, ...]`.
    pub prediction: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub user_id: i64,
}

impl Record {
    pub fn prediction(&self) -> vision::Result<Prediction> {
        Prediction::parse(&self.prediction)
    }

    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }

    pub fn image_url(&self) -> String {
        format!("/static/images/records/{}", self.image_name)
    }

    pub async fn create(
        db: impl SqliteExecutor<'_>,
        user_id: i64,
        image_name: &str,
        prediction: &Prediction,
        notes: &str,
    ) -> Result<Record, sqlx::Error> {
        sqlx::query_as(
            "INSERT INTO records (image_name, prediction, notes, created_at, user_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(image_name)
        .bind(prediction.to_record_string())
        .bind(notes)
        .bind(Utc::now())
        .bind(user_id)
        .fetch_one(db)
        .await
    }

    pub async fn find(db: impl SqliteExecutor<'_>, id: i64) -> Result<Option<Record>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM records WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// All records of a user, newest first.
    pub async fn list_for_user(
        db: impl SqliteExecutor<'_>,
        user_id: i64,
    ) -> Result<Vec<Record>, sqlx::Error> {
        sqlx::query_as(
            "SELECT * FROM records WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(db)
        .await
    }

    /// Returns whether a row was updated.
    pub async fn update_notes(
        db: impl SqliteExecutor<'_>,
        id: i64,
        notes: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE records SET notes = $1 WHERE id = $2")
            .bind(notes)
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Returns whether a row was deleted.
    pub async fn delete(db: impl SqliteExecutor<'_>, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM records WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Normalise the notes field of a record form.
///
/// Blank input and the textarea placeholder both become [`EMPTY_NOTES`].
pub fn normalize_notes(input: Option<&str>, placeholder: &str) -> String {
    match input.map(str::trim) {
        Some(note) if !note.is_empty() && note != placeholder => note.to_string(),
        _ => EMPTY_NOTES.to_string(),
    }
}
