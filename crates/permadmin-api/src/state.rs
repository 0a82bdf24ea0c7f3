//! Shared handler state.

use permadmin_store::MemoryStore;
use permadmin_store::repository::{
    MemoryAssignmentRepository, MemoryPermissionRepository, MemoryUserRepository,
};

/// Repositories handed to every handler. Cloning is cheap; all clones
/// share the same underlying store.
#[derive(Clone)]
pub struct AppState {
    pub permissions: MemoryPermissionRepository,
    pub users: MemoryUserRepository,
    pub assignments: MemoryAssignmentRepository,
}

impl AppState {
    pub fn new(store: &MemoryStore) -> Self {
        Self {
            permissions: store.permissions(),
            users: store.users(),
            assignments: store.assignments(),
        }
    }
}
