//! Local (email + password) authentication and session helpers.

mod password;
mod session;

pub use password::{hash_password, verify_password, PasswordError};
pub use session::{
    current_user_id, flash, login, logout, take_flashes, Flash, FlashCategory, REMEMBER_ME,
    SESSION_INACTIVITY, SESSION_USER_ID_KEY,
};
