//! JSON-file user store

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::validate_login;
use crate::error::StoreError;
use crate::time::current_time_secs;
use crate::traits::UserStore;
use crate::types::{NewUser, Role, UserId, UserProfile, UserRecord};

/// On-disk layout of the store file
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    next_id: u64,
    users: Vec<UserRecord>,
}

/// User store persisted as a single JSON document
///
/// The whole table is loaded on open and rewritten after every mutation.
/// All operations hold one async mutex, which makes the uniqueness check
/// and the insert a single atomic step within this process.
pub struct FileUserStore {
    path: PathBuf,
    state: Mutex<StoreFile>,
}

impl FileUserStore {
    /// Open the store at `path`, starting empty if the file does not exist
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let state = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoreFile {
                next_id: 1,
                users: Vec::new(),
            },
            Err(e) => return Err(e.into()),
        };

        tracing::debug!("Opened user store at {:?} ({} users)", path, state.users.len());

        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    async fn persist(&self, state: &StoreFile) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let content = serde_json::to_vec_pretty(state)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    async fn modify<F>(&self, id: UserId, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut UserRecord) + Send,
    {
        let mut state = self.state.lock().await;
        let index = state
            .users
            .iter()
            .position(|u| u.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let previous = state.users[index].clone();
        f(&mut state.users[index]);

        if let Err(e) = self.persist(&state).await {
            state.users[index] = previous;
            return Err(e);
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for FileUserStore {
    async fn find_by_login(&self, login: &str) -> Result<Option<UserRecord>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.users.iter().find(|u| u.login == login).cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        validate_login(&user.login)?;

        let mut state = self.state.lock().await;
        if state.users.iter().any(|u| u.login == user.login) {
            return Err(StoreError::Conflict(user.login));
        }

        let id = UserId(state.next_id.max(1));
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
        state.next_id = id.get() + 1;
        state.users.push(record.clone());

        if let Err(e) = self.persist(&state).await {
            state.users.pop();
            state.next_id = id.get();
            return Err(e);
        }
        Ok(record)
    }

    async fn set_role(&self, id: UserId, role: Role) -> Result<(), StoreError> {
        self.modify(id, move |user| user.role = role).await
    }

    async fn update_profile(&self, id: UserId, profile: UserProfile) -> Result<(), StoreError> {
        self.modify(id, move |user| user.profile = profile).await
    }

    async fn attach_metadata(
        &self,
        id: UserId,
        key: &str,
        value: serde_json::Value,
    ) -> Result<(), StoreError> {
        let key = key.to_string();
        self.modify(id, move |user| {
            user.meta.insert(key, value);
        })
        .await
    }
}
