//! # Database module — SQLite connection pool management
//!
//! The pool is created once by the binary and handed to every handler through
//! application state, so tests can swap in an in-memory database.
//!
//! ## Re-exports
//!
//! - [`connect`] — opens a pool for a `sqlite:` URL, creating the file if needed.
//! - [`connect_in_memory`] — single-connection in-memory pool for tests and demos.
//! - [`migrate`] — runs the embedded migrations in `packages/api/migrations`.

mod pool;

pub use pool::{connect, connect_in_memory, migrate};
