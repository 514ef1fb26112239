//! User store trait

use async_trait::async_trait;

use crate::error::StoreError;
use crate::types::{NewUser, Role, UserId, UserProfile, UserRecord};

/// Persistent user-record store owned by the host platform
///
/// Implementations must enforce login uniqueness inside `create_user`:
/// a second insert for an existing login fails with
/// [`StoreError::Conflict`] instead of creating a duplicate.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a record by exact login name
    async fn find_by_login(&self, login: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Insert a new record with the default role and the given metadata
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, StoreError>;

    /// Replace the role of an existing record
    async fn set_role(&self, id: UserId, role: Role) -> Result<(), StoreError>;

    /// Replace the display fields of an existing record
    async fn update_profile(&self, id: UserId, profile: UserProfile) -> Result<(), StoreError>;

    /// Set a metadata entry on an existing record
    async fn attach_metadata(
        &self,
        id: UserId,
        key: &str,
        value: serde_json::Value,
    ) -> Result<(), StoreError>;
}
