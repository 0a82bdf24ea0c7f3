//! The in-memory store shared by all repositories.
//!
//! A single [`MemoryStore`] owns every table behind one async lock. Each
//! write holds the write lock for its entire check-validate-mutate
//! sequence, so concurrent merges or grants on the same user can never
//! lose each other's updates.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};
use permadmin_core::error::{AdminError, AdminResult};
use permadmin_core::models::assignment::Assignment;
use permadmin_core::models::permission::Permission;
use permadmin_core::models::user::User;
use permadmin_core::validation::{self, FieldViolation};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::info;

use crate::error::StoreError;
use crate::repository::{
    MemoryAssignmentRepository, MemoryPermissionRepository, MemoryUserRepository,
};
use crate::seed::SeedData;

/// Stored grants for one user.
#[derive(Debug, Clone)]
pub(crate) struct AssignmentRecord {
    pub(crate) permission_ids: IndexSet<String>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl AssignmentRecord {
    pub(crate) fn to_assignment(&self, user_id: &str) -> Assignment {
        Assignment {
            user_id: user_id.to_owned(),
            permission_ids: self.permission_ids.iter().cloned().collect(),
            updated_at: self.updated_at,
        }
    }

    /// Swap in a new grant set, advancing the timestamp monotonically.
    pub(crate) fn set(&mut self, permission_ids: IndexSet<String>) {
        self.permission_ids = permission_ids;
        self.updated_at = next_timestamp(Some(self.updated_at));
    }
}

#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub(crate) catalog: IndexMap<String, Permission>,
    pub(crate) users: IndexMap<String, User>,
    pub(crate) assignments: HashMap<String, AssignmentRecord>,
}

impl Tables {
    pub(crate) fn require_user(&self, user_id: &str) -> AdminResult<&User> {
        self.users
            .get(user_id)
            .ok_or_else(|| AdminError::user_not_found(user_id))
    }

    pub(crate) fn require_permission(&self, permission_id: &str) -> AdminResult<&Permission> {
        self.catalog
            .get(permission_id)
            .ok_or_else(|| AdminError::permission_not_found(permission_id))
    }

    pub(crate) fn email_in_use(&self, email: &str) -> bool {
        self.users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(email))
    }

    /// Validate a raw id list against the catalog.
    pub(crate) fn validate_ids(
        &self,
        input: &serde_json::Value,
    ) -> Result<Vec<String>, Vec<FieldViolation>> {
        validation::validate_permission_ids(input, |id| self.catalog.contains_key(id))
    }

    pub(crate) fn assignment(&self, user_id: &str) -> Assignment {
        self.assignments
            .get(user_id)
            .map(|record| record.to_assignment(user_id))
            .unwrap_or_else(|| Assignment::empty(user_id))
    }

    /// The user's record, created empty on first write.
    pub(crate) fn assignment_mut(&mut self, user_id: &str) -> &mut AssignmentRecord {
        self.assignments
            .entry(user_id.to_owned())
            .or_insert_with(|| AssignmentRecord {
                permission_ids: IndexSet::new(),
                updated_at: DateTime::<Utc>::MIN_UTC,
            })
    }

    pub(crate) fn catalog_list(&self) -> Vec<Permission> {
        self.catalog.values().cloned().collect()
    }
}

/// `now`, but never earlier than `previous`.
pub(crate) fn next_timestamp(previous: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now();
    previous.map_or(now, |prev| now.max(prev))
}

/// Shared handle to the in-memory tables. Cloning is cheap.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// A store with the given catalog and no users.
    pub fn new(catalog: Vec<Permission>) -> Result<Self, StoreError> {
        Self::from_seed(SeedData {
            permissions: catalog,
            ..SeedData::default()
        })
    }

    /// Build a store from seed data, rejecting anything that would break
    /// the store's invariants.
    pub fn from_seed(seed: SeedData) -> Result<Self, StoreError> {
        let tables = seed.into_tables()?;

        info!(
            permissions = tables.catalog.len(),
            users = tables.users.len(),
            assignments = tables.assignments.len(),
            "In-memory store initialised"
        );

        Ok(Self {
            tables: Arc::new(RwLock::new(tables)),
        })
    }

    pub fn permissions(&self) -> MemoryPermissionRepository {
        MemoryPermissionRepository::new(self.clone())
    }

    pub fn users(&self) -> MemoryUserRepository {
        MemoryUserRepository::new(self.clone())
    }

    pub fn assignments(&self) -> MemoryAssignmentRepository {
        MemoryAssignmentRepository::new(self.clone())
    }

    pub(crate) async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().await
    }

    pub(crate) async fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().await
    }
}
