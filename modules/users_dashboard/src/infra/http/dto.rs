use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::contract::model::UserRecord;

/// Wire shape of a user on the remote service. Fields the dashboard does not
/// model are kept in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

// Conversion implementations between wire DTOs and contract models

impl From<&UserRecord> for UserDto {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: Some(user.id),
            name: user.name.clone(),
            email: user.email.clone(),
            department: user.department.clone(),
            extra: user.attributes.clone(),
        }
    }
}

impl UserDto {
    /// Convert to the contract model, falling back to `default_id` when the
    /// service did not send one.
    pub fn into_record(self, default_id: u64) -> UserRecord {
        UserRecord {
            id: self.id.unwrap_or(default_id),
            name: self.name,
            email: self.email,
            department: self.department,
            attributes: self.extra,
        }
    }
}
