//! Permission domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A catalog entry. Seeded once at startup and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    /// Stable identifier, 1–128 characters (e.g., `perm-read-users`).
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub created_at: DateTime<Utc>,
}

impl Permission {
    /// Build a bare catalog entry whose name doubles as its id.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            description: String::new(),
            category: String::new(),
            created_at: Utc::now(),
        }
    }
}
