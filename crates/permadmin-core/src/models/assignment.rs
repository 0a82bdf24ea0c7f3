//! Assignment domain model: the permissions granted to one user.

use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::permission::Permission;

/// The permission ids granted to a user.
///
/// `permission_ids` is duplicate-free; its order is the order in which
/// grants were first added and carries no meaning beyond stable output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub user_id: String,
    pub permission_ids: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl Assignment {
    /// An empty assignment stamped with the current time.
    ///
    /// Returned for users that have never been written to; it is not stored.
    pub fn empty(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            permission_ids: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    pub fn contains(&self, permission_id: &str) -> bool {
        self.permission_ids.iter().any(|id| id == permission_id)
    }

    /// Expand into one flag per catalog entry, in catalog order.
    ///
    /// Granted ids that are no longer in the catalog are appended at the
    /// end so no grant is hidden from the caller.
    pub fn to_flags(&self, catalog: &[Permission]) -> Vec<PermissionFlag> {
        let mut flags: Vec<PermissionFlag> = catalog
            .iter()
            .map(|p| PermissionFlag {
                permission: p.id.clone(),
                granted: self.contains(&p.id),
            })
            .collect();

        for id in &self.permission_ids {
            if !catalog.iter().any(|p| &p.id == id) {
                flags.push(PermissionFlag {
                    permission: id.clone(),
                    granted: true,
                });
            }
        }
        flags
    }
}

/// One entry of the flag-list representation: `{permission, granted}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PermissionFlag {
    pub permission: String,
    #[serde(default)]
    pub granted: bool,
}

/// Collapse a flag list into the set of granted ids.
///
/// Later entries for the same permission override earlier ones.
pub fn granted_ids(flags: &[PermissionFlag]) -> IndexSet<String> {
    let mut granted = IndexSet::new();
    for flag in flags {
        if flag.granted {
            granted.insert(flag.permission.clone());
        } else {
            granted.shift_remove(&flag.permission);
        }
    }
    granted
}

/// Raw write input for replace/merge.
///
/// The id list is kept as an untyped JSON value so that a wrong shape is
/// reported as a validation violation rather than a decode failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignPermissions {
    #[serde(default)]
    pub permission_ids: serde_json::Value,
}

impl AssignPermissions {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids = ids
            .into_iter()
            .map(|id| serde_json::Value::String(id.into()))
            .collect();
        Self {
            permission_ids: serde_json::Value::Array(ids),
        }
    }
}
