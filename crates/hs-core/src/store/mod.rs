//! Reference user stores
//!
//! [`MemoryUserStore`] backs tests and embedding hosts that keep their own
//! persistence; [`FileUserStore`] keeps records in a JSON file for the CLI.

mod file;
mod memory;

pub use file::FileUserStore;
pub use memory::MemoryUserStore;

use crate::error::StoreError;

/// Maximum login length accepted by the stores
pub const MAX_LOGIN_LEN: usize = 60;

/// Check a login against the characters the stores accept.
///
/// Logins may contain ASCII letters, digits, space and `_ . - @`, must not
/// be blank and must not exceed [`MAX_LOGIN_LEN`] characters.
pub fn validate_login(login: &str) -> Result<(), StoreError> {
    if login.trim().is_empty() {
        return Err(StoreError::InvalidLogin("login is empty".to_string()));
    }
    if login.chars().count() > MAX_LOGIN_LEN {
        return Err(StoreError::InvalidLogin(format!(
            "login exceeds {} characters",
            MAX_LOGIN_LEN
        )));
    }
    if let Some(c) = login
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '.' | '-' | '@')))
    {
        return Err(StoreError::InvalidLogin(format!(
            "login contains invalid character {:?}",
            c
        )));
    }
    Ok(())
}
