use serde::{Deserialize, Serialize};

/// Server-assigned policy identifier.
pub type PolicyId = i64;

/// A policy record as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Policy {
    pub id: PolicyId,
    pub name: String,
    #[serde(default)]
    pub details: String,
    pub owner: String,
}

/// Body of a create request; the owner is assigned by the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewPolicy {
    pub name: String,
    pub details: String,
}

impl NewPolicy {
    /// Both fields are required by the create form.
    #[must_use]
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.name.trim().is_empty() {
            Some("name")
        } else if self.details.trim().is_empty() {
            Some("details")
        } else {
            None
        }
    }
}

/// Partial update; absent fields are left untouched by the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PolicyPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

impl PolicyPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.details.is_none() && self.owner.is_none()
    }

    /// Build a patch holding only the fields of `edited` that differ from `current`.
    #[must_use]
    pub fn diff(current: &Policy, edited: &Policy) -> Self {
        let changed = |before: &String, after: &String| {
            (before != after).then(|| after.clone())
        };
        Self {
            name: changed(&current.name, &edited.name),
            details: changed(&current.details, &edited.details),
            owner: changed(&current.owner, &edited.owner),
        }
    }
}
