//! Request and response bodies.

use chrono::{DateTime, Utc};
use permadmin_core::models::assignment::{Assignment, PermissionFlag};
use permadmin_core::models::permission::Permission;
use permadmin_core::models::user::User;
use permadmin_core::repository::PaginatedResult;
use serde::{Deserialize, Serialize};

/// Raw `limit`/`offset` query values. Kept as strings so that bad input
/// falls back to defaults instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserList {
    pub users: Vec<User>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

impl From<PaginatedResult<User>> for UserList {
    fn from(page: PaginatedResult<User>) -> Self {
        Self {
            users: page.items,
            total: page.total,
            limit: page.limit,
            offset: page.offset,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PermissionsList {
    pub permissions: Vec<Permission>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

impl From<PaginatedResult<Permission>> for PermissionsList {
    fn from(page: PaginatedResult<Permission>) -> Self {
        Self {
            permissions: page.items,
            total: page.total,
            limit: page.limit,
            offset: page.offset,
        }
    }
}

/// A user's grants expanded to full catalog entries.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPermissions {
    pub user_id: String,
    pub permissions: Vec<Permission>,
    pub updated_at: DateTime<Utc>,
}

impl UserPermissions {
    /// Resolve the assignment's ids against the catalog, keeping grant order.
    pub fn resolve(assignment: Assignment, catalog: &[Permission]) -> Self {
        let permissions = assignment
            .permission_ids
            .iter()
            .filter_map(|id| catalog.iter().find(|p| &p.id == id).cloned())
            .collect();
        Self {
            user_id: assignment.user_id,
            permissions,
            updated_at: assignment.updated_at,
        }
    }
}

/// A user as the unversioned routes show it, with its flag list embedded.
#[derive(Debug, Serialize)]
pub struct LegacyUser {
    #[serde(flatten)]
    pub user: User,
    pub permissions: Vec<PermissionFlag>,
}

/// Body of `POST /users/{userId}/permissions`.
#[derive(Debug, Deserialize)]
pub struct GrantRequest {
    pub permission: String,
    #[serde(default)]
    pub granted: bool,
}

#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}
