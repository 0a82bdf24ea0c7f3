//! Seed data: the permission catalog and any initial users.
//!
//! The catalog is configuration, not user data: it is fixed for the life
//! of the process. Seeds come either from the built-in demo set or from a
//! JSON file shaped like [`SeedData`].

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use indexmap::IndexSet;
use permadmin_core::models::permission::Permission;
use permadmin_core::models::user::User;
use permadmin_core::validation::{MAX_ID_LEN, MIN_ID_LEN};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::StoreError;
use crate::memory::{AssignmentRecord, Tables};

/// Initial grants for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedAssignment {
    pub user_id: String,
    pub permission_ids: Vec<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedData {
    pub permissions: Vec<Permission>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub assignments: Vec<SeedAssignment>,
}

impl SeedData {
    /// Load seed data from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let seed: SeedData = serde_json::from_str(&raw)?;
        info!(path = %path.display(), "Loaded seed file");
        Ok(seed)
    }

    /// The built-in catalog with no users.
    pub fn catalog_only() -> Self {
        Self {
            permissions: default_catalog(),
            ..Self::default()
        }
    }

    /// The built-in catalog plus ten demo users with assorted grants.
    pub fn demo() -> Self {
        const DEMO_USERS: [(&str, &str, &str, u32, &[&str]); 10] = [
            ("user-1", "Alice Johnson", "alice.johnson", 15, &["perm-read-users"]),
            ("user-2", "Bob Smith", "bob.smith", 16, &["perm-read-users", "perm-write-users"]),
            (
                "user-3",
                "Carol Williams",
                "carol.williams",
                17,
                &["perm-read-users", "perm-write-users", "perm-delete-users"],
            ),
            ("user-4", "David Brown", "david.brown", 18, &["perm-read-users"]),
            (
                "user-5",
                "Emma Davis",
                "emma.davis",
                19,
                &["perm-read-users", "perm-write-users", "perm-admin"],
            ),
            ("user-6", "Frank Wilson", "frank.wilson", 20, &["perm-read-users"]),
            (
                "user-7",
                "Grace Miller",
                "grace.miller",
                21,
                &["perm-read-users", "perm-write-users", "perm-delete-users"],
            ),
            ("user-8", "Henry Taylor", "henry.taylor", 22, &["perm-read-users", "perm-write-users"]),
            ("user-9", "Ivy Anderson", "ivy.anderson", 23, &["perm-read-users"]),
            (
                "user-10",
                "Jack Martinez",
                "jack.martinez",
                24,
                &["perm-read-users", "perm-write-users", "perm-delete-users", "perm-admin"],
            ),
        ];

        let mut seed = Self::catalog_only();
        for (id, name, mailbox, day, grants) in DEMO_USERS {
            let created_at = jan_2024(day, 10);
            let updated_at = jan_2024(day + 5, 12);
            seed.users.push(User {
                id: id.into(),
                name: name.into(),
                email: format!("{mailbox}@techcorp.com"),
                created_at,
                updated_at,
            });
            seed.assignments.push(SeedAssignment {
                user_id: id.into(),
                permission_ids: grants.iter().map(|g| g.to_string()).collect(),
                updated_at: Some(updated_at),
            });
        }
        seed
    }

    /// Check the seed against the store invariants and build the tables.
    pub(crate) fn into_tables(self) -> Result<Tables, StoreError> {
        let mut tables = Tables::default();

        for permission in self.permissions {
            let len = permission.id.chars().count();
            if !(MIN_ID_LEN..=MAX_ID_LEN).contains(&len) {
                return Err(StoreError::Seed(format!(
                    "permission id must be {MIN_ID_LEN}-{MAX_ID_LEN} characters: {:?}",
                    permission.id
                )));
            }
            if tables.catalog.contains_key(&permission.id) {
                return Err(StoreError::Seed(format!(
                    "duplicate permission id: {}",
                    permission.id
                )));
            }
            tables.catalog.insert(permission.id.clone(), permission);
        }

        for user in self.users {
            if tables.users.contains_key(&user.id) {
                return Err(StoreError::Seed(format!("duplicate user id: {}", user.id)));
            }
            if tables.email_in_use(&user.email) {
                return Err(StoreError::Seed(format!(
                    "duplicate user email: {}",
                    user.email
                )));
            }
            tables.users.insert(user.id.clone(), user);
        }

        let mut assigned = HashSet::new();
        for seeded in self.assignments {
            if !tables.users.contains_key(&seeded.user_id) {
                return Err(StoreError::Seed(format!(
                    "assignment for unknown user: {}",
                    seeded.user_id
                )));
            }
            if !assigned.insert(seeded.user_id.clone()) {
                return Err(StoreError::Seed(format!(
                    "more than one assignment for user: {}",
                    seeded.user_id
                )));
            }
            if let Some(unknown) = seeded
                .permission_ids
                .iter()
                .find(|id| !tables.catalog.contains_key(*id))
            {
                return Err(StoreError::Seed(format!(
                    "assignment for {} references unknown permission: {unknown}",
                    seeded.user_id
                )));
            }

            let record = AssignmentRecord {
                permission_ids: seeded.permission_ids.into_iter().collect(),
                updated_at: seeded.updated_at.unwrap_or_else(Utc::now),
            };
            tables.assignments.insert(seeded.user_id, record);
        }

        Ok(tables)
    }
}

/// The six-permission catalog the service ships with.
pub fn default_catalog() -> Vec<Permission> {
    const CATALOG: [(&str, &str, &str, &str); 6] = [
        ("perm-read-users", "Read Users", "Allows reading user information", "users"),
        ("perm-write-users", "Write Users", "Allows creating and updating users", "users"),
        ("perm-delete-users", "Delete Users", "Allows deleting users", "users"),
        ("perm-admin", "Admin", "Full administrative access", "admin"),
        ("perm-read-permissions", "Read Permissions", "Allows viewing permissions", "permissions"),
        (
            "perm-manage-permissions",
            "Manage Permissions",
            "Allows managing user permissions",
            "permissions",
        ),
    ];

    let created_at = jan_2024(1, 0);
    CATALOG
        .into_iter()
        .map(|(id, name, description, category)| Permission {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            category: category.into(),
            created_at,
        })
        .collect()
}

fn jan_2024(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0)
        .single()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_seed_is_consistent() {
        let tables = SeedData::demo().into_tables().unwrap();
        assert_eq!(tables.catalog.len(), 6);
        assert_eq!(tables.users.len(), 10);
        assert_eq!(tables.assignments.len(), 10);
        assert_eq!(tables.assignments["user-10"].permission_ids.len(), 4);
    }

    #[test]
    fn duplicate_permission_ids_are_rejected() {
        let mut seed = SeedData::catalog_only();
        seed.permissions.push(Permission::named("perm-admin"));
        assert!(matches!(seed.into_tables(), Err(StoreError::Seed(_))));
    }

    #[test]
    fn emails_collide_case_insensitively() {
        let mut seed = SeedData::demo();
        let mut clone = seed.users[0].clone();
        clone.id = "user-99".into();
        clone.email = clone.email.to_uppercase();
        seed.users.push(clone);
        assert!(matches!(seed.into_tables(), Err(StoreError::Seed(_))));
    }

    #[test]
    fn assignments_must_reference_the_catalog() {
        let mut seed = SeedData::demo();
        seed.assignments[0].permission_ids.push("perm-missing".into());
        let err = seed.into_tables().unwrap_err();
        assert!(err.to_string().contains("perm-missing"));
    }
}
