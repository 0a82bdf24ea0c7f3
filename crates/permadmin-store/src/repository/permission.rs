//! In-memory implementation of [`PermissionRepository`].

use permadmin_core::error::AdminResult;
use permadmin_core::models::permission::Permission;
use permadmin_core::repository::{PaginatedResult, Pagination, PermissionRepository};
use tracing::debug;

use crate::memory::MemoryStore;

/// Read-only view of the permission catalog.
#[derive(Clone)]
pub struct MemoryPermissionRepository {
    store: MemoryStore,
}

impl MemoryPermissionRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

impl PermissionRepository for MemoryPermissionRepository {
    async fn get_by_id(&self, id: &str) -> AdminResult<Permission> {
        let tables = self.store.read().await;
        tables.require_permission(id).cloned()
    }

    async fn list(&self, pagination: Pagination) -> AdminResult<PaginatedResult<Permission>> {
        let tables = self.store.read().await;
        let page = pagination.page(&tables.catalog_list());
        debug!(
            limit = page.limit,
            offset = page.offset,
            returned = page.items.len(),
            total = page.total,
            "Listed permissions"
        );
        Ok(page)
    }

    async fn list_all(&self) -> AdminResult<Vec<Permission>> {
        Ok(self.store.read().await.catalog_list())
    }
}
