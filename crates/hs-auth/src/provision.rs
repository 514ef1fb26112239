//! Local administrator provisioning
//!
//! `get_or_create` returns the existing record for a login untouched, or
//! creates it as an administrator with provenance metadata. Creation relies
//! on the store's unique-login insert; losing a creation race resolves to
//! the winner's record instead of an error.
//!
//! Provenance is written with the insert and the administrator role is set
//! last. A record carrying provenance but no administrator role was left
//! behind by an interrupted setup and is finished on the next call.

use std::collections::BTreeMap;
use std::sync::Arc;

use hs_core::config::ProvisioningConfig;
use hs_core::error::{ProvisionError, StoreError};
use hs_core::password::{generate_password, hash_password};
use hs_core::time::current_time_secs;
use hs_core::traits::UserStore;
use hs_core::types::{NewUser, META_SSO_CREATED, META_SSO_USER};
use hs_core::{Role, Secret, UserProfile, UserRecord};

/// Creates or reuses the local record for a verified login
pub struct UserProvisioner {
    store: Arc<dyn UserStore>,
    defaults: ProvisioningConfig,
}

impl UserProvisioner {
    /// Create a provisioner over a user store
    pub fn new(store: Arc<dyn UserStore>, defaults: ProvisioningConfig) -> Self {
        Self { store, defaults }
    }

    /// Return the record for `username`, creating it if absent.
    ///
    /// An existing record is returned unchanged and `password` is ignored,
    /// unless it is a partially provisioned one, which is finished first.
    /// A new record uses `password` when given and non-empty, otherwise a
    /// generated one.
    pub async fn get_or_create(
        &self,
        username: &str,
        password: Option<&Secret<String>>,
    ) -> Result<UserRecord, ProvisionError> {
        if let Some(user) = self.lookup(username).await? {
            return self.reuse(user).await;
        }

        let (password, generated) = match password {
            Some(p) if !p.is_empty() => (p.clone(), false),
            _ => (generate_password(), true),
        };
        let password_hash =
            hash_password(&password).map_err(|e| ProvisionError::Hash(e.to_string()))?;

        let mut meta = BTreeMap::new();
        meta.insert(META_SSO_USER.to_string(), serde_json::Value::Bool(true));
        meta.insert(
            META_SSO_CREATED.to_string(),
            serde_json::json!(current_time_secs()),
        );

        let new_user = NewUser {
            login: username.to_string(),
            password_hash,
            email: self.defaults.email.clone(),
            meta,
        };

        let user = match self.store.create_user(new_user).await {
            Ok(user) => user,
            Err(StoreError::Conflict(_)) => {
                tracing::warn!(username, "User was created concurrently, reusing it");
                let user = self.lookup(username).await?.ok_or_else(|| {
                    ProvisionError::Create(StoreError::Conflict(username.to_string()))
                })?;
                return self.reuse(user).await;
            }
            Err(e) => {
                tracing::error!(username, "Failed to create user: {}", e);
                return Err(ProvisionError::Create(e));
            }
        };

        let user = self.finish(user).await?;

        tracing::info!(
            username,
            id = %user.id,
            password = if generated { "generated" } else { "provided" },
            "Created new user"
        );

        Ok(user)
    }

    async fn lookup(&self, username: &str) -> Result<Option<UserRecord>, ProvisionError> {
        self.store
            .find_by_login(username)
            .await
            .map_err(ProvisionError::Lookup)
    }

    async fn reuse(&self, user: UserRecord) -> Result<UserRecord, ProvisionError> {
        if user.is_partially_provisioned() {
            tracing::warn!(username = %user.login, id = %user.id, "Finishing setup of partially provisioned user");
            return self.finish(user).await;
        }

        tracing::debug!(username = %user.login, id = %user.id, "Reusing existing user");
        Ok(user)
    }

    /// Apply profile and role, then return the stored record
    async fn finish(&self, user: UserRecord) -> Result<UserRecord, ProvisionError> {
        if let Err(e) = self.promote(&user).await {
            tracing::error!(username = %user.login, id = %user.id, "Failed to finish user setup: {}", e);
            return Err(ProvisionError::Update(e));
        }

        self.lookup(&user.login)
            .await?
            .ok_or_else(|| ProvisionError::Update(StoreError::NotFound(user.id.to_string())))
    }

    async fn promote(&self, user: &UserRecord) -> Result<(), StoreError> {
        let profile = UserProfile {
            display_name: self.defaults.display_name.clone(),
            first_name: self.defaults.first_name.clone(),
            last_name: self.defaults.last_name.clone(),
            url: self.defaults.url.clone(),
        };
        self.store.update_profile(user.id, profile).await?;

        // Role goes last: an administrator record is a finished one.
        self.store.set_role(user.id, Role::Administrator).await
    }
}
