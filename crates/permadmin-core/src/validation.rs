//! Input validation for permission assignments and new users.
//!
//! Validators never stop at the first problem: every violation is
//! collected so the caller can report them all in one response. The only
//! exceptions are a wrong shape and an empty list, after which the
//! remaining checks have nothing meaningful to look at.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;

use crate::models::user::CreateUser;

/// Field name used for the permission id list in violations.
pub const PERMISSION_IDS_FIELD: &str = "permissionIds";

/// Bounds on the length of any id, in characters.
pub const MIN_ID_LEN: usize = 1;
pub const MAX_ID_LEN: usize = 128;

/// Which rule a violation broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    Type,
    Required,
    Uniqueness,
    UnknownId,
    Length,
}

/// A single validation failure, reported to clients as `{field, reason}`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldViolation {
    #[serde(skip)]
    pub kind: ViolationKind,
    pub field: String,
    pub reason: String,
}

impl FieldViolation {
    pub fn new(kind: ViolationKind, field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind,
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Validate a raw permission id list against the catalog.
///
/// `is_known` answers whether an id exists in the catalog. On success
/// returns the ids in input order.
pub fn validate_permission_ids(
    input: &Value,
    is_known: impl Fn(&str) -> bool,
) -> Result<Vec<String>, Vec<FieldViolation>> {
    let Some(items) = input.as_array() else {
        return Err(vec![FieldViolation::new(
            ViolationKind::Type,
            PERMISSION_IDS_FIELD,
            "must be an array",
        )]);
    };

    if items.is_empty() {
        return Err(vec![FieldViolation::new(
            ViolationKind::Required,
            PERMISSION_IDS_FIELD,
            "must not be empty",
        )]);
    }

    let mut violations = Vec::new();

    // Keyed by JSON text, so `7` and `"7"` stay distinct.
    let mut seen = HashSet::with_capacity(items.len());
    let has_duplicates = !items.iter().all(|item| seen.insert(item.to_string()));
    if has_duplicates {
        violations.push(FieldViolation::new(
            ViolationKind::Uniqueness,
            PERMISSION_IDS_FIELD,
            "must contain unique items",
        ));
    }

    let unknown: Vec<String> = items
        .iter()
        .filter(|item| !item.as_str().is_some_and(&is_known))
        .map(render_id)
        .collect();
    if !unknown.is_empty() {
        violations.push(FieldViolation::new(
            ViolationKind::UnknownId,
            PERMISSION_IDS_FIELD,
            format!("invalid permission IDs: {}", unknown.join(", ")),
        ));
    }

    for (index, item) in items.iter().enumerate() {
        if !item.as_str().is_some_and(id_length_ok) {
            violations.push(FieldViolation::new(
                ViolationKind::Length,
                format!("{PERMISSION_IDS_FIELD}[{index}]"),
                format!("must be a string between {MIN_ID_LEN} and {MAX_ID_LEN} characters"),
            ));
        }
    }

    if !violations.is_empty() {
        return Err(violations);
    }

    Ok(items
        .iter()
        .filter_map(|item| item.as_str().map(str::to_owned))
        .collect())
}

/// Validate the fields of a user creation request.
///
/// Uniqueness is not checked here; it needs the user table.
pub fn validate_new_user(input: &CreateUser) -> Result<(), Vec<FieldViolation>> {
    let mut violations = Vec::new();

    if let Some(id) = &input.id {
        if !id_length_ok(id) {
            violations.push(FieldViolation::new(
                ViolationKind::Length,
                "id",
                format!("must be a string between {MIN_ID_LEN} and {MAX_ID_LEN} characters"),
            ));
        }
    }
    if input.name.trim().is_empty() {
        violations.push(FieldViolation::new(
            ViolationKind::Required,
            "name",
            "must not be empty",
        ));
    }
    if input.email.trim().is_empty() {
        violations.push(FieldViolation::new(
            ViolationKind::Required,
            "email",
            "must not be empty",
        ));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

fn id_length_ok(id: &str) -> bool {
    (MIN_ID_LEN..=MAX_ID_LEN).contains(&id.chars().count())
}

fn render_id(item: &Value) -> String {
    match item {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog(id: &str) -> bool {
        matches!(id, "read" | "write" | "delete" | "admin")
    }

    fn kinds(violations: &[FieldViolation]) -> Vec<ViolationKind> {
        violations.iter().map(|v| v.kind).collect()
    }

    #[test]
    fn accepts_known_unique_ids() {
        let ids = validate_permission_ids(&json!(["write", "read"]), catalog).unwrap();
        assert_eq!(ids, vec!["write", "read"]);
    }

    #[test]
    fn non_array_is_a_single_type_violation() {
        for input in [json!(null), json!("read"), json!({"id": "read"}), json!(3)] {
            let errs = validate_permission_ids(&input, catalog).unwrap_err();
            assert_eq!(kinds(&errs), vec![ViolationKind::Type]);
            assert_eq!(errs[0].reason, "must be an array");
        }
    }

    #[test]
    fn empty_list_is_required_violation() {
        let errs = validate_permission_ids(&json!([]), catalog).unwrap_err();
        assert_eq!(kinds(&errs), vec![ViolationKind::Required]);
    }

    #[test]
    fn duplicates_and_unknown_ids_reported_together() {
        let errs = validate_permission_ids(&json!(["bad-id", "bad-id"]), catalog).unwrap_err();
        assert_eq!(
            kinds(&errs),
            vec![ViolationKind::Uniqueness, ViolationKind::UnknownId]
        );
        assert_eq!(errs[1].reason, "invalid permission IDs: bad-id, bad-id");
    }

    #[test]
    fn duplicates_distinguish_numbers_from_strings() {
        let errs = validate_permission_ids(&json!(["read", 7, "7"]), catalog).unwrap_err();
        assert!(!kinds(&errs).contains(&ViolationKind::Uniqueness));

        let errs = validate_permission_ids(&json!(["read", 7, 7]), catalog).unwrap_err();
        assert_eq!(errs[0].kind, ViolationKind::Uniqueness);
    }

    #[test]
    fn large_distinct_input_is_checked_in_linear_time() {
        let ids: Vec<String> = (0..200_000).map(|i| format!("perm-{i}")).collect();
        let input = json!(ids);

        let started = std::time::Instant::now();
        let validated = validate_permission_ids(&input, |_| true).unwrap();
        assert_eq!(validated.len(), 200_000);
        assert!(started.elapsed() < std::time::Duration::from_secs(5));
    }

    #[test]
    fn unknown_ids_are_named_together() {
        let errs = validate_permission_ids(&json!(["read", "x", "y"]), catalog).unwrap_err();
        assert_eq!(kinds(&errs), vec![ViolationKind::UnknownId]);
        assert_eq!(errs[0].reason, "invalid permission IDs: x, y");
    }

    #[test]
    fn length_violations_are_per_index() {
        let long = "a".repeat(129);
        let errs = validate_permission_ids(&json!(["read", "", long, 7]), catalog).unwrap_err();

        let length: Vec<_> = errs
            .iter()
            .filter(|v| v.kind == ViolationKind::Length)
            .map(|v| v.field.as_str())
            .collect();
        assert_eq!(
            length,
            vec!["permissionIds[1]", "permissionIds[2]", "permissionIds[3]"]
        );

        // The same elements are also unknown to the catalog.
        let unknown = errs
            .iter()
            .find(|v| v.kind == ViolationKind::UnknownId)
            .unwrap();
        assert!(unknown.reason.ends_with(", 7"));
    }

    #[test]
    fn new_user_requires_name_and_email() {
        let input = CreateUser {
            id: Some(String::new()),
            name: "  ".into(),
            email: String::new(),
        };
        let errs = validate_new_user(&input).unwrap_err();
        let fields: Vec<_> = errs.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["id", "name", "email"]);
    }
}
