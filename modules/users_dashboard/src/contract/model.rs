use std::collections::BTreeMap;

use serde_json::Value;

/// Pure user model shared between the store, the view and the adapters.
///
/// `attributes` holds whatever extra fields the remote service returned so a
/// shallow merge keeps them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserRecord {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub department: Option<String>,
    pub attributes: BTreeMap<String, Value>,
}

/// Validated form output that has not been given an id yet
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub department: Option<String>,
}

/// First/last name projection of a full name. Never stored on the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameParts<'a> {
    pub first: &'a str,
    pub last: Option<&'a str>,
}

/// Reply of a remote update: the status is checked by the store
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateResponse {
    pub status: u16,
    pub body: Option<UserRecord>,
}

impl UserRecord {
    pub fn new(id: u64, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            department: None,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    /// Stamp a draft with an id.
    pub fn from_draft(id: u64, draft: UserDraft) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
            department: draft.department,
            attributes: BTreeMap::new(),
        }
    }

    /// Split the full name on its first space.
    pub fn name_parts(&self) -> NameParts<'_> {
        split_full_name(&self.name)
    }

    /// Shallow merge: fields of `incoming` win, absent optional fields keep
    /// their prior value. The id is never changed.
    pub fn merged_with(&self, incoming: &UserRecord) -> UserRecord {
        let mut attributes = self.attributes.clone();
        attributes.extend(
            incoming
                .attributes
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );

        UserRecord {
            id: self.id,
            name: incoming.name.clone(),
            email: incoming.email.clone(),
            department: incoming
                .department
                .clone()
                .or_else(|| self.department.clone()),
            attributes,
        }
    }
}

/// Split at the first space; a multi-word last name is kept whole.
pub fn split_full_name(name: &str) -> NameParts<'_> {
    match name.split_once(' ') {
        Some((first, rest)) if !rest.is_empty() => NameParts {
            first,
            last: Some(rest),
        },
        Some((first, _)) => NameParts { first, last: None },
        None => NameParts {
            first: name,
            last: None,
        },
    }
}
