//! # User model for authenticated users
//!
//! Defines the two representations of an account:
//!
//! ## [`User`]
//!
//! The complete row from the `users` table, including the Argon2 password hash.
//! Associated functions wrap every query the web layer runs against the table.
//!
//! ## [`UserInfo`]
//!
//! A render-safe subset without the password hash, handed to UI components.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteExecutor};

/// Profile image every account starts with.
pub const DEFAULT_PROFILE_IMAGE: &str = "default.png";

/// Full user record from the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub image_file: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Convert to UserInfo for rendering.
    pub fn to_info(&self) -> UserInfo {
        UserInfo {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            image_file: self.image_file.clone(),
        }
    }

    pub async fn create(
        db: impl SqliteExecutor<'_>,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as(
            "INSERT INTO users (username, email, password_hash, image_file, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(DEFAULT_PROFILE_IMAGE)
        .bind(Utc::now())
        .fetch_one(db)
        .await
    }

    pub async fn find_by_id(db: impl SqliteExecutor<'_>, id: i64) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn find_by_email(
        db: impl SqliteExecutor<'_>,
        email: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(db)
            .await
    }

    /// Whether another account (not `except`) already uses `username`.
    pub async fn username_taken(
        db: impl SqliteExecutor<'_>,
        username: &str,
        except: Option<i64>,
    ) -> Result<bool, sqlx::Error> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM users WHERE username = $1 AND id != $2")
                .bind(username)
                .bind(except.unwrap_or(-1))
                .fetch_optional(db)
                .await?;
        Ok(row.is_some())
    }

    /// Whether another account (not `except`) already uses `email`.
    pub async fn email_taken(
        db: impl SqliteExecutor<'_>,
        email: &str,
        except: Option<i64>,
    ) -> Result<bool, sqlx::Error> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM users WHERE email = $1 AND id != $2")
                .bind(email)
                .bind(except.unwrap_or(-1))
                .fetch_optional(db)
                .await?;
        Ok(row.is_some())
    }

    pub async fn update_profile(
        db: impl SqliteExecutor<'_>,
        id: i64,
        username: &str,
        email: &str,
        image_file: &str,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as(
            "UPDATE users SET username = $1, email = $2, image_file = $3
             WHERE id = $4
             RETURNING *",
        )
        .bind(username)
        .bind(email)
        .bind(image_file)
        .bind(id)
        .fetch_one(db)
        .await
    }
}

/// User information safe to render.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub image_file: String,
}

impl UserInfo {
    /// Public URL of the profile picture.
    pub fn image_url(&self) -> String {
        format!("/static/images/profile_pics/{}", self.image_file)
    }
}
