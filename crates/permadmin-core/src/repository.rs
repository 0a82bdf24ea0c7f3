//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Write operations validate their
//! whole input before touching any state, so a rejected request leaves
//! the store exactly as it was.

use crate::error::AdminResult;
use crate::models::{
    assignment::{AssignPermissions, Assignment, PermissionFlag},
    permission::Permission,
    user::{CreateUser, User},
};

/// Page size used when the caller gives none (or an unusable one).
pub const DEFAULT_LIMIT: u64 = 20;
/// Largest page a caller may request.
pub const MAX_LIMIT: u64 = 100;

/// Pagination parameters for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    /// Build from raw query-string values.
    ///
    /// Never fails: missing or non-numeric values fall back to the
    /// defaults, a limit of zero means "default", and everything else is
    /// clamped (`limit` into `[1, 100]`, `offset` to `>= 0`). Like the
    /// clients we serve, only the leading integer of a value is read, so
    /// `"5abc"` is 5.
    pub fn from_query(limit: Option<&str>, offset: Option<&str>) -> Self {
        let limit = match limit.and_then(leading_int) {
            None | Some(0) => DEFAULT_LIMIT as i64,
            Some(n) => n,
        };
        let offset = offset.and_then(leading_int).unwrap_or(0);

        Self {
            limit: limit.clamp(1, MAX_LIMIT as i64) as u64,
            offset: offset.max(0) as u64,
        }
    }

    /// Slice one page out of `items`. Past the end yields an empty page.
    pub fn page<T: Clone>(&self, items: &[T]) -> PaginatedResult<T> {
        let start = usize::try_from(self.offset)
            .unwrap_or(usize::MAX)
            .min(items.len());
        let end = start
            .saturating_add(usize::try_from(self.limit).unwrap_or(usize::MAX))
            .min(items.len());

        PaginatedResult {
            items: items[start..end].to_vec(),
            total: items.len() as u64,
            offset: self.offset,
            limit: self.limit,
        }
    }
}

/// Parse an optional sign followed by decimal digits, ignoring anything
/// after them. Overlong numbers saturate.
fn leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude = digits[..end]
        .bytes()
        .fold(0i64, |acc, d| acc.saturating_mul(10).saturating_add(i64::from(d - b'0')));
    Some(if negative { -magnitude } else { magnitude })
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Catalog (read-only)
// ---------------------------------------------------------------------------

pub trait PermissionRepository: Send + Sync {
    fn get_by_id(&self, id: &str) -> impl Future<Output = AdminResult<Permission>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = AdminResult<PaginatedResult<Permission>>> + Send;
    /// The whole catalog in insertion order.
    fn list_all(&self) -> impl Future<Output = AdminResult<Vec<Permission>>> + Send;
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` on a duplicate id or email.
    fn create(&self, input: CreateUser) -> impl Future<Output = AdminResult<User>> + Send;
    fn get_by_id(&self, id: &str) -> impl Future<Output = AdminResult<User>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = AdminResult<PaginatedResult<User>>> + Send;
    fn list_all(&self) -> impl Future<Output = AdminResult<Vec<User>>> + Send;
    /// Hard delete. Also drops the user's assignment. Not idempotent.
    fn delete(&self, id: &str) -> impl Future<Output = AdminResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Assignments
// ---------------------------------------------------------------------------

pub trait AssignmentRepository: Send + Sync {
    /// Current grants. Users never written to get an empty, unsaved assignment.
    fn get(&self, user_id: &str) -> impl Future<Output = AdminResult<Assignment>> + Send;

    /// Overwrite the user's grants with the validated input.
    fn replace(
        &self,
        user_id: &str,
        input: AssignPermissions,
    ) -> impl Future<Output = AdminResult<Assignment>> + Send;

    /// Add the validated input to the user's grants. Never revokes.
    fn merge(
        &self,
        user_id: &str,
        input: AssignPermissions,
    ) -> impl Future<Output = AdminResult<Assignment>> + Send;

    /// Grant or revoke one permission and return the full flag list.
    fn grant_one(
        &self,
        user_id: &str,
        permission: &str,
        granted: bool,
    ) -> impl Future<Output = AdminResult<Vec<PermissionFlag>>> + Send;

    /// The user's grants as one flag per catalog entry.
    fn flags(&self, user_id: &str) -> impl Future<Output = AdminResult<Vec<PermissionFlag>>> + Send;

    /// Every user with its flag list, read as one consistent snapshot.
    fn users_with_flags(
        &self,
    ) -> impl Future<Output = AdminResult<Vec<(User, Vec<PermissionFlag>)>>> + Send;

    /// Overwrite the user's grants from a flag list and return the result.
    fn replace_flags(
        &self,
        user_id: &str,
        flags: Vec<PermissionFlag>,
    ) -> impl Future<Output = AdminResult<Vec<PermissionFlag>>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_values_use_defaults() {
        assert_eq!(Pagination::from_query(None, None), Pagination::default());
    }

    #[test]
    fn unusable_values_use_defaults() {
        let p = Pagination::from_query(Some("abc"), Some("-"));
        assert_eq!(p.limit, 20);
        assert_eq!(p.offset, 0);

        assert_eq!(Pagination::from_query(Some("0"), None).limit, 20);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let p = Pagination::from_query(Some("500"), Some("-3"));
        assert_eq!(p.limit, 100);
        assert_eq!(p.offset, 0);

        assert_eq!(Pagination::from_query(Some("-5"), None).limit, 1);
    }

    #[test]
    fn only_leading_digits_are_read() {
        let p = Pagination::from_query(Some("5abc"), Some(" 8.9"));
        assert_eq!(p.limit, 5);
        assert_eq!(p.offset, 8);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let items: Vec<u32> = (0..10).collect();

        let page = Pagination::from_query(Some("5"), Some("8")).page(&items);
        assert_eq!(page.items, vec![8, 9]);
        assert_eq!(page.total, 10);

        let page = Pagination::from_query(None, Some("100")).page(&items);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 10);
        assert_eq!(page.offset, 100);
    }

    #[test]
    fn huge_offsets_do_not_overflow() {
        let items = vec!["a"];
        let page = Pagination::from_query(Some("100"), Some("99999999999999999999999")).page(&items);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 1);
    }
}
