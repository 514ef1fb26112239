//! hs-core: Core abstractions and configuration for hypr-sso
//!
//! This crate provides shared types, traits, and configuration structures
//! used by the authentication flow and the CLI.

pub mod config;
pub mod error;
pub mod password;
pub mod secret;
pub mod store;
pub mod time;
pub mod traits;
pub mod types;

pub use error::SsoError;
pub use secret::Secret;
pub use types::{Credentials, Provenance, Role, UserId, UserProfile, UserRecord};
