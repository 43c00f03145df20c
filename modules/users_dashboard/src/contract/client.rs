use async_trait::async_trait;

use crate::contract::{
    error::RemoteError,
    model::{UpdateResponse, UserRecord},
};

/// CRUD surface of the remote user service the store reconciles against
#[async_trait]
pub trait RemoteUserService: Send + Sync {
    /// Fetch the full user list
    async fn list_users(&self) -> Result<Vec<UserRecord>, RemoteError>;

    /// Create a user. The draft already carries the client's synthetic id;
    /// the returned record is what the service echoed back.
    async fn create_user(&self, draft: &UserRecord) -> Result<UserRecord, RemoteError>;

    /// Replace a user. The status is returned so the caller can decide what
    /// counts as confirmed.
    async fn update_user(&self, id: u64, record: &UserRecord)
        -> Result<UpdateResponse, RemoteError>;

    /// Delete a user by id
    async fn delete_user(&self, id: u64) -> Result<(), RemoteError>;
}
