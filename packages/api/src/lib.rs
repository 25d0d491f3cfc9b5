//! # API crate — server-side building blocks of the anomaly detector
//!
//! Everything the web layer needs below the HTTP surface.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | Argon2id password hashing, session login state, flash messages |
//! | [`db`] | SQLite connection pool and embedded migrations |
//! | [`models`] | `User` / `Record` rows with their queries, and the render-safe `UserInfo` |
//! | [`settings`] | Layered configuration: defaults, `config.toml`, environment |
//! | [`uploads`] | Uploaded image validation and storage under the static directory |

pub mod auth;
pub mod db;
pub mod models;
pub mod settings;
pub mod uploads;

pub use models::{Record, User, UserInfo};
pub use settings::Settings;
pub use uploads::{Folder, ImageStore, UploadError};
