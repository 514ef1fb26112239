//! Core domain types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::secret::Secret;

/// Metadata key marking a user created through remote verification
pub const META_SSO_USER: &str = "hypr_sso_user";

/// Metadata key holding the Unix time the SSO flow created the user
pub const META_SSO_CREATED: &str = "hypr_sso_created";

/// Unique identifier for a local user record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl UserId {
    /// Get the raw numeric id
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A username/password pair presented at login
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Login name as typed
    pub username: String,
    /// Password, redacted when printed
    pub password: Secret<String>,
}

impl Credentials {
    /// Create a credential pair
    pub fn new(username: impl Into<String>, password: impl Into<Secret<String>>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Capability level of a local user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full site control
    Administrator,
    /// Manages all content
    Editor,
    /// Publishes own content
    Author,
    /// Drafts own content
    Contributor,
    /// Reads only; the default for new records
    #[default]
    Subscriber,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Administrator => write!(f, "administrator"),
            Role::Editor => write!(f, "editor"),
            Role::Author => write!(f, "author"),
            Role::Contributor => write!(f, "contributor"),
            Role::Subscriber => write!(f, "subscriber"),
        }
    }
}

/// Display fields of a user record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Public display name
    pub display_name: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Website URL
    pub url: String,
}

/// Fields required to insert a new user record
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    /// Unique login name
    pub login: String,
    /// Argon2 PHC string
    pub password_hash: String,
    /// Contact address
    pub email: String,
    /// Metadata stored together with the insert
    pub meta: BTreeMap<String, serde_json::Value>,
}

/// A local user record as held by the user store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Store-assigned id
    pub id: UserId,
    /// Unique login name
    pub login: String,
    /// Contact address
    pub email: String,
    /// Capability level
    pub role: Role,
    /// Display fields
    #[serde(default)]
    pub profile: UserProfile,
    /// Argon2 PHC string
    pub password_hash: String,
    /// Unix time the record was inserted
    pub registered_at: u64,
    /// Free-form metadata
    #[serde(default)]
    pub meta: BTreeMap<String, serde_json::Value>,
}

/// Record of how a user came to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Provenance {
    /// Created by the remote verification flow
    pub sso_user: bool,
    /// Unix time of creation by that flow, if recorded
    pub created_at: Option<u64>,
}

impl UserRecord {
    /// Read the provenance markers from metadata
    pub fn provenance(&self) -> Provenance {
        Provenance {
            sso_user: self
                .meta
                .get(META_SSO_USER)
                .and_then(serde_json::Value::as_bool)
                .unwrap_or(false),
            created_at: self
                .meta
                .get(META_SSO_CREATED)
                .and_then(serde_json::Value::as_u64),
        }
    }

    /// Whether the record holds the administrator role
    pub fn is_admin(&self) -> bool {
        self.role == Role::Administrator
    }

    /// Created by the SSO flow but never promoted to administrator
    pub fn is_partially_provisioned(&self) -> bool {
        self.provenance().sso_user && !self.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> UserRecord {
        UserRecord {
            id: UserId(1),
            login: "hypradmin".to_string(),
            email: "secure-sso@hyperuix.com.au".to_string(),
            role: Role::Subscriber,
            profile: UserProfile::default(),
            password_hash: String::new(),
            registered_at: 0,
            meta: BTreeMap::new(),
        }
    }

    #[test]
    fn test_provenance_absent() {
        let provenance = record().provenance();
        assert!(!provenance.sso_user);
        assert_eq!(provenance.created_at, None);
    }

    #[test]
    fn test_provenance_present() {
        let mut user = record();
        user.meta
            .insert(META_SSO_USER.to_string(), serde_json::Value::Bool(true));
        user.meta
            .insert(META_SSO_CREATED.to_string(), serde_json::json!(1_700_000_000u64));

        let provenance = user.provenance();
        assert!(provenance.sso_user);
        assert_eq!(provenance.created_at, Some(1_700_000_000));
    }

    #[test]
    fn test_partially_provisioned() {
        let mut user = record();
        assert!(!user.is_partially_provisioned());

        user.meta
            .insert(META_SSO_USER.to_string(), serde_json::Value::Bool(true));
        assert!(user.is_partially_provisioned());

        user.role = Role::Administrator;
        assert!(!user.is_partially_provisioned());
    }

    #[test]
    fn test_role_display_and_serde() {
        assert_eq!(Role::Administrator.to_string(), "administrator");
        assert_eq!(
            serde_json::to_string(&Role::Administrator).unwrap(),
            r#""administrator""#
        );
        assert_eq!(Role::default(), Role::Subscriber);
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials::new("hypradmin", "correct");
        let printed = format!("{:?}", creds);
        assert!(printed.contains("hypradmin"));
        assert!(!printed.contains("correct"));
    }
}
