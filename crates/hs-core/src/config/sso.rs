//! Remote login configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use super::serde_utils::duration_secs;
use crate::error::ConfigError;
use crate::secret::Secret;

/// Login name that is delegated to the remote endpoint by default
pub const DEFAULT_ADMIN_USERNAME: &str = "hypradmin";

/// Endpoint that owns the authoritative credential check
pub const DEFAULT_ENDPOINT: &str = "https://hosting.hyperuix.com.au/scripts/sso/hypr-sso.php";

/// Configuration for the remote login flow
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SsoConfig {
    /// The single login name handled by remote verification
    pub admin_username: String,

    /// Identity of this site, sent with every verification request
    pub site_url: String,

    /// Path of the JSON user store used by the CLI
    pub store_path: PathBuf,

    /// Write a plain-text copy of the log to `log_file`
    pub debug_log: bool,

    /// Debug log location
    pub log_file: PathBuf,

    /// Remote endpoint settings
    pub remote: RemoteConfig,

    /// Fields applied to newly provisioned users
    pub provisioning: ProvisioningConfig,
}

impl Default for SsoConfig {
    fn default() -> Self {
        Self {
            admin_username: DEFAULT_ADMIN_USERNAME.to_string(),
            site_url: "http://localhost".to_string(),
            store_path: super::default_data_dir().join("users.json"),
            debug_log: false,
            log_file: super::default_data_dir().join("debug.log"),
            remote: RemoteConfig::default(),
            provisioning: ProvisioningConfig::default(),
        }
    }
}

impl SsoConfig {
    /// Check the configuration for values the login flow cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.admin_username.trim().is_empty() {
            return Err(ConfigError::MissingField("admin_username".to_string()));
        }
        if self.site_url.trim().is_empty() {
            return Err(ConfigError::MissingField("site_url".to_string()));
        }
        self.remote.validate()
    }
}

/// Remote endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Verification endpoint; must not carry credentials in the URL
    pub endpoint: Url,

    /// Request timeout in seconds
    #[serde(with = "duration_secs")]
    pub timeout: Duration,

    /// User-Agent header sent to the endpoint
    pub user_agent: String,

    /// HTTP Basic credentials for the endpoint itself
    pub credentials: Option<TransportCredentials>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL"),
            timeout: Duration::from_secs(30),
            user_agent: format!("hypr-sso/{}", env!("CARGO_PKG_VERSION")),
            credentials: None,
        }
    }
}

impl RemoteConfig {
    /// Reject endpoints that embed credentials, use an unsupported scheme
    /// or send plain HTTP to anything other than a loopback host.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.endpoint.username().is_empty() || self.endpoint.password().is_some() {
            return Err(ConfigError::Invalid(
                "remote.endpoint must not contain credentials; use [remote.credentials]"
                    .to_string(),
            ));
        }

        match self.endpoint.scheme() {
            "https" => {}
            "http" if is_loopback(&self.endpoint) => {}
            "http" => {
                return Err(ConfigError::Invalid(
                    "remote.endpoint must use https".to_string(),
                ))
            }
            other => {
                return Err(ConfigError::Invalid(format!(
                    "unsupported remote.endpoint scheme: {}",
                    other
                )))
            }
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "remote.timeout must be at least 1 second".to_string(),
            ));
        }

        if let Some(creds) = &self.credentials {
            if creds.username.is_empty() {
                return Err(ConfigError::MissingField(
                    "remote.credentials.username".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Copy of the endpoint settings safe to print
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if let Some(creds) = copy.credentials.as_mut() {
            creds.password = Secret::from("********");
        }
        copy
    }
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(url::Host::Domain(domain)) => domain == "localhost",
        Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
        Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}

/// HTTP Basic credentials presented to the endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportCredentials {
    /// Basic auth user
    pub username: String,
    /// Basic auth password
    pub password: Secret<String>,
}

/// Placeholder fields written to a freshly provisioned user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisioningConfig {
    /// Contact address
    pub email: String,
    /// Public display name
    pub display_name: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Website URL
    pub url: String,
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            email: "secure-sso@hyperuix.com.au".to_string(),
            display_name: "HYPR Admin".to_string(),
            first_name: "HYPR".to_string(),
            last_name: "Admin".to_string(),
            url: "https://www.hyperuix.com.au".to_string(),
        }
    }
}
