use thiserror::Error;

/// Failure categories of the store operations. Network, server and decode
/// failures all collapse into the category of the operation that hit them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    #[error("Failed to load users: {cause}")]
    LoadFailure { cause: String },

    #[error("Failed to create user: {cause}")]
    CreateFailure { cause: String },

    #[error("Failed to update user {id}: {cause}")]
    UpdateFailure { id: u64, cause: String },

    #[error("Failed to delete user {id}: {cause}")]
    DeleteFailure { id: u64, cause: String },
}

impl DashboardError {
    pub fn load(cause: impl ToString) -> Self {
        Self::LoadFailure {
            cause: cause.to_string(),
        }
    }

    pub fn create(cause: impl ToString) -> Self {
        Self::CreateFailure {
            cause: cause.to_string(),
        }
    }

    pub fn update(id: u64, cause: impl ToString) -> Self {
        Self::UpdateFailure {
            id,
            cause: cause.to_string(),
        }
    }

    pub fn delete(id: u64, cause: impl ToString) -> Self {
        Self::DeleteFailure {
            id,
            cause: cause.to_string(),
        }
    }

    /// The single toast string shown for this failure
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::LoadFailure { .. } => messages::LOAD_FAILED,
            Self::CreateFailure { .. } => messages::CREATE_FAILED,
            Self::UpdateFailure { .. } => messages::UPDATE_FAILED,
            Self::DeleteFailure { .. } => messages::DELETE_FAILED,
        }
    }
}

/// Toast strings
pub mod messages {
    pub const LOAD_FAILED: &str = "Failed to fetch users";
    pub const CREATED: &str = "User added successfully!";
    pub const CREATE_FAILED: &str = "Failed to add user";
    pub const UPDATED_REMOTELY: &str = "User updated successfully!";
    pub const UPDATED_LOCALLY: &str = "User updated locally!";
    pub const UPDATE_FAILED: &str = "Failed to update user";
    pub const DELETED: &str = "User deleted successfully!";
    pub const DELETE_FAILED: &str = "Failed to delete user";
}
