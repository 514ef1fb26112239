//! In-memory user store

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::validate_login;
use crate::error::StoreError;
use crate::time::current_time_secs;
use crate::traits::UserStore;
use crate::types::{NewUser, Role, UserId, UserProfile, UserRecord};

/// User store held entirely in memory
///
/// Login uniqueness is enforced through the `DashMap` entry API, so two
/// concurrent inserts for the same login cannot both succeed.
pub struct MemoryUserStore {
    users: DashMap<UserId, UserRecord>,
    logins: DashMap<String, UserId>,
    next_id: AtomicU64,
}

impl MemoryUserStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            logins: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of records held
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    fn modify<F>(&self, id: UserId, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut UserRecord),
    {
        let mut user = self
            .users
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        f(&mut user);
        Ok(())
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_login(&self, login: &str) -> Result<Option<UserRecord>, StoreError> {
        let id = match self.logins.get(login) {
            Some(id) => *id,
            None => return Ok(None),
        };
        Ok(self.users.get(&id).map(|user| user.clone()))
    }

    async fn create_user(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        validate_login(&user.login)?;

        match self.logins.entry(user.login.clone()) {
            Entry::Occupied(_) => Err(StoreError::Conflict(user.login)),
            Entry::Vacant(slot) => {
                let id = UserId(self.next_id.fetch_add(1, Ordering::SeqCst));
                let record = UserRecord {
                    id,
                    login: user.login,
                    email: user.email,
                    role: Role::default(),
                    profile: UserProfile::default(),
                    password_hash: user.password_hash,
                    registered_at: current_time_secs(),
                    meta: user.meta,
                };
                self.users.insert(id, record.clone());
                slot.insert(id);
                Ok(record)
            }
        }
    }

    async fn set_role(&self, id: UserId, role: Role) -> Result<(), StoreError> {
        self.modify(id, |user| user.role = role)
    }

    async fn update_profile(&self, id: UserId, profile: UserProfile) -> Result<(), StoreError> {
        self.modify(id, |user| user.profile = profile)
    }

    async fn attach_metadata(
        &self,
        id: UserId,
        key: &str,
        value: serde_json::Value,
    ) -> Result<(), StoreError> {
        self.modify(id, |user| {
            user.meta.insert(key.to_string(), value);
        })
    }
}
