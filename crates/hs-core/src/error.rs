//! Core error types for hypr-sso

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the hypr-sso ecosystem
#[derive(Error, Debug)]
pub enum SsoError {
    /// Remote verification error
    #[error("Verification error: {0}")]
    Verify(#[from] VerifyError),

    /// User provisioning error
    #[error("Provisioning error: {0}")]
    Provision(#[from] ProvisionError),

    /// User store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while verifying credentials against the remote endpoint.
///
/// Every variant is a verification failure from the caller's point of view.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// Network, TLS or timeout failure
    #[error("Server communication error: {0}")]
    Transport(String),

    /// Endpoint answered with a non-success HTTP status
    #[error("Endpoint returned HTTP {0}")]
    Status(u16),

    /// Body was not JSON or lacked the `success` field
    #[error("Invalid server response: {0}")]
    Protocol(String),

    /// Endpoint rejected the credentials
    #[error("Authentication failed - {}", .message.as_deref().unwrap_or("Unknown error"))]
    Rejected {
        /// Optional diagnostic message from the endpoint
        message: Option<String>,
    },
}

/// User store errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// A record with this login already exists
    #[error("Login already exists: {0}")]
    Conflict(String),

    /// No record with this id
    #[error("User not found: {0}")]
    NotFound(String),

    /// Login is empty or contains characters the store refuses
    #[error("Invalid login: {0}")]
    InvalidLogin(String),

    /// Backing file could not be read or written
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backing file is not valid JSON
    #[error("Store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// User provisioning errors
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// The existing-user lookup failed
    #[error("Failed to look up user: {0}")]
    Lookup(#[source] StoreError),

    /// The store refused to create the user
    #[error("Failed to create user: {0}")]
    Create(#[source] StoreError),

    /// The user was created but role, profile or metadata could not be applied
    #[error("Failed to update user: {0}")]
    Update(#[source] StoreError),

    /// Password hashing failed
    #[error("Failed to hash password: {0}")]
    Hash(String),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// Invalid configuration
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialize error
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(String),
}
