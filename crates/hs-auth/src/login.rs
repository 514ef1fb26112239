//! Login pipeline integration
//!
//! The host platform calls [`LoginHandler::authenticate`] for every login
//! attempt. Attempts for any login other than the configured admin pass
//! through untouched. For the admin login the credentials are verified
//! remotely and the local administrator is provisioned on success.

use std::net::IpAddr;
use std::sync::Arc;

use thiserror::Error;

use hs_core::config::SsoConfig;
use hs_core::error::{ProvisionError, SsoError};
use hs_core::traits::{CredentialVerifier, UserStore};
use hs_core::{Credentials, UserRecord};

use crate::provision::UserProvisioner;
use crate::remote::RemoteAuthenticator;

/// Error code the host reports when a login has no local record
pub const INVALID_USERNAME: &str = "invalid_username";

/// A structured failure as understood by the host login pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostError {
    /// Machine-readable code
    pub code: String,
    /// Message safe to show the end user
    pub message: String,
}

impl HostError {
    /// Create a host error
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// State of a login attempt as it moves through the host pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum HostOutcome {
    /// Nothing has decided the attempt yet
    Unresolved,
    /// A user has been resolved
    Resolved(UserRecord),
    /// The attempt has failed
    Failed(HostError),
}

impl HostOutcome {
    /// Whether a user was resolved
    pub fn is_resolved(&self) -> bool {
        matches!(self, HostOutcome::Resolved(_))
    }
}

/// Why an admin login could not be completed
#[derive(Error, Debug)]
pub enum LoginFailure {
    /// The remote endpoint did not accept the credentials
    #[error("HYPR SSO authentication failed")]
    AuthenticationFailed,

    /// Credentials were accepted but the local user could not be provisioned
    #[error("HYPR SSO could not provision the account: {0}")]
    Provisioning(#[from] ProvisionError),
}

impl LoginFailure {
    /// Machine-readable code reported to the host
    pub fn code(&self) -> &'static str {
        match self {
            LoginFailure::AuthenticationFailed => "authentication_failed",
            LoginFailure::Provisioning(_) => "provisioning_failed",
        }
    }
}

impl From<LoginFailure> for HostError {
    fn from(failure: LoginFailure) -> Self {
        HostError::new(failure.code(), failure.to_string())
    }
}

/// Consolidated login handler, built once and shared by every request
pub struct LoginHandler {
    admin_username: String,
    verifier: Arc<dyn CredentialVerifier>,
    provisioner: UserProvisioner,
}

impl LoginHandler {
    /// Create a handler from explicit collaborators
    pub fn new(
        admin_username: impl Into<String>,
        verifier: Arc<dyn CredentialVerifier>,
        provisioner: UserProvisioner,
    ) -> Self {
        Self {
            admin_username: admin_username.into(),
            verifier,
            provisioner,
        }
    }

    /// Build the handler with a [`RemoteAuthenticator`] for the configured endpoint
    pub fn from_config(config: &SsoConfig, store: Arc<dyn UserStore>) -> Result<Self, SsoError> {
        config.validate()?;
        let authenticator = RemoteAuthenticator::new(&config.remote, config.site_url.clone())?;
        let provisioner = UserProvisioner::new(store, config.provisioning.clone());

        tracing::info!(
            admin = %config.admin_username,
            endpoint = %authenticator.endpoint(),
            "HYPR SSO login handler initialized"
        );

        Ok(Self::new(
            config.admin_username.clone(),
            Arc::new(authenticator),
            provisioner,
        ))
    }

    /// The login this handler takes over
    pub fn admin_username(&self) -> &str {
        &self.admin_username
    }

    /// Whether a login is delegated to the remote endpoint (exact match)
    pub fn handles(&self, username: &str) -> bool {
        username == self.admin_username
    }

    /// Verify remotely, then get or create the local administrator.
    ///
    /// Shared by every entry point; nothing is created when verification
    /// fails.
    pub async fn resolve(&self, credentials: &Credentials) -> Result<UserRecord, LoginFailure> {
        if !self.verifier.verify(credentials).await {
            return Err(LoginFailure::AuthenticationFailed);
        }

        let user = self
            .provisioner
            .get_or_create(&credentials.username, Some(&credentials.password))
            .await?;
        Ok(user)
    }

    /// Primary authentication hook.
    ///
    /// Returns `prior` unchanged for any login other than the admin login.
    pub async fn authenticate(&self, prior: HostOutcome, credentials: &Credentials) -> HostOutcome {
        if !self.handles(&credentials.username) {
            return prior;
        }

        tracing::debug!(username = %credentials.username, "Attempting HYPR SSO authentication");

        match self.resolve(credentials).await {
            Ok(user) => {
                tracing::info!(username = %credentials.username, id = %user.id, "Authentication successful");
                HostOutcome::Resolved(user)
            }
            Err(failure) => {
                tracing::warn!(username = %credentials.username, code = failure.code(), "Authentication failed: {}", failure);
                HostOutcome::Failed(failure.into())
            }
        }
    }

    /// Secondary hook for when the host has already reported that the
    /// admin login has no local record.
    ///
    /// Runs the same flow as [`authenticate`](Self::authenticate) but keeps
    /// `prior` on failure.
    pub async fn handle_nonexistent_user(
        &self,
        prior: HostOutcome,
        credentials: &Credentials,
    ) -> HostOutcome {
        let missing_user =
            matches!(&prior, HostOutcome::Failed(error) if error.code == INVALID_USERNAME);
        if !missing_user || !self.handles(&credentials.username) {
            return prior;
        }

        tracing::debug!(username = %credentials.username, "User does not exist, attempting HYPR SSO authentication");

        match self.resolve(credentials).await {
            Ok(user) => {
                tracing::info!(username = %credentials.username, id = %user.id, "Created and authenticated user");
                HostOutcome::Resolved(user)
            }
            Err(failure) => {
                tracing::warn!(username = %credentials.username, code = failure.code(), "Authentication failed: {}", failure);
                prior
            }
        }
    }

    /// Audit hook called by the host after any successful login
    pub fn on_successful_login(&self, login: &str, remote_addr: Option<IpAddr>) {
        if !self.handles(login) {
            return;
        }
        match remote_addr {
            Some(addr) => tracing::info!(username = login, ip = %addr, "Successful HYPR SSO login"),
            None => tracing::info!(username = login, ip = "unknown", "Successful HYPR SSO login"),
        }
    }
}
