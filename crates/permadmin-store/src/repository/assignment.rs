//! In-memory implementation of [`AssignmentRepository`].
//!
//! Both the id-set operations (`replace`, `merge`) and the flag-list
//! operations (`grant_one`, `flags`, `replace_flags`) act on the same
//! stored set of granted permission ids.

use indexmap::IndexSet;
use permadmin_core::error::{AdminError, AdminResult};
use permadmin_core::models::assignment::{
    AssignPermissions, Assignment, PermissionFlag, granted_ids,
};
use permadmin_core::models::user::User;
use permadmin_core::repository::AssignmentRepository;
use tracing::{debug, info, warn};

use crate::memory::{MemoryStore, Tables};

#[derive(Clone)]
pub struct MemoryAssignmentRepository {
    store: MemoryStore,
}

impl MemoryAssignmentRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

/// Validate `input` for `user_id`, or explain why not.
fn checked_ids(tables: &Tables, user_id: &str, input: &AssignPermissions) -> AdminResult<Vec<String>> {
    tables.require_user(user_id)?;
    tables.validate_ids(&input.permission_ids).map_err(|violations| {
        warn!(
            user_id = %user_id,
            violations = violations.len(),
            "Rejected permission update"
        );
        AdminError::Validation { violations }
    })
}

fn flags_for(tables: &Tables, user_id: &str) -> Vec<PermissionFlag> {
    tables
        .assignment(user_id)
        .to_flags(&tables.catalog_list())
}

impl AssignmentRepository for MemoryAssignmentRepository {
    async fn get(&self, user_id: &str) -> AdminResult<Assignment> {
        let tables = self.store.read().await;
        tables.require_user(user_id)?;
        let assignment = tables.assignment(user_id);
        debug!(
            user_id = %user_id,
            granted = assignment.permission_ids.len(),
            "Fetched permissions"
        );
        Ok(assignment)
    }

    async fn replace(&self, user_id: &str, input: AssignPermissions) -> AdminResult<Assignment> {
        let mut tables = self.store.write().await;
        let ids = checked_ids(&tables, user_id, &input)?;

        let record = tables.assignment_mut(user_id);
        record.set(ids.into_iter().collect());
        let assignment = record.to_assignment(user_id);

        info!(
            user_id = %user_id,
            granted = assignment.permission_ids.len(),
            "Permissions replaced"
        );
        Ok(assignment)
    }

    async fn merge(&self, user_id: &str, input: AssignPermissions) -> AdminResult<Assignment> {
        let mut tables = self.store.write().await;
        let ids = checked_ids(&tables, user_id, &input)?;

        let record = tables.assignment_mut(user_id);
        let mut merged = record.permission_ids.clone();
        let before = merged.len();
        merged.extend(ids);
        let added = merged.len() - before;
        record.set(merged);
        let assignment = record.to_assignment(user_id);

        info!(
            user_id = %user_id,
            added,
            granted = assignment.permission_ids.len(),
            "Permissions merged"
        );
        Ok(assignment)
    }

    async fn grant_one(
        &self,
        user_id: &str,
        permission: &str,
        granted: bool,
    ) -> AdminResult<Vec<PermissionFlag>> {
        let mut tables = self.store.write().await;
        tables.require_user(user_id)?;
        tables.require_permission(permission)?;

        let record = tables.assignment_mut(user_id);
        let mut ids = record.permission_ids.clone();
        if granted {
            ids.insert(permission.to_owned());
        } else {
            ids.shift_remove(permission);
        }
        record.set(ids);

        info!(user_id = %user_id, permission = %permission, granted, "Permission flag set");
        Ok(flags_for(&tables, user_id))
    }

    async fn flags(&self, user_id: &str) -> AdminResult<Vec<PermissionFlag>> {
        let tables = self.store.read().await;
        tables.require_user(user_id)?;
        Ok(flags_for(&tables, user_id))
    }

    async fn users_with_flags(&self) -> AdminResult<Vec<(User, Vec<PermissionFlag>)>> {
        let tables = self.store.read().await;
        let catalog = tables.catalog_list();
        let listing: Vec<_> = tables
            .users
            .values()
            .map(|user| {
                let flags = tables.assignment(&user.id).to_flags(&catalog);
                (user.clone(), flags)
            })
            .collect();
        debug!(users = listing.len(), "Listed users with flags");
        Ok(listing)
    }

    async fn replace_flags(
        &self,
        user_id: &str,
        flags: Vec<PermissionFlag>,
    ) -> AdminResult<Vec<PermissionFlag>> {
        let mut tables = self.store.write().await;
        tables.require_user(user_id)?;
        for flag in &flags {
            tables.require_permission(&flag.permission)?;
        }

        let ids: IndexSet<String> = granted_ids(&flags);
        let granted = ids.len();
        tables.assignment_mut(user_id).set(ids);

        info!(user_id = %user_id, granted, "Permission flags replaced");
        Ok(flags_for(&tables, user_id))
    }
}
