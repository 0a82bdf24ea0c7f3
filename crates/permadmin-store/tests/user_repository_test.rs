//! Integration tests for the User repository.

use permadmin_core::AdminError;
use permadmin_core::models::assignment::AssignPermissions;
use permadmin_core::models::user::CreateUser;
use permadmin_core::repository::{AssignmentRepository, Pagination, UserRepository};
use permadmin_store::{MemoryStore, SeedData};

/// Helper: a store with the built-in catalog and no users.
fn setup() -> MemoryStore {
    MemoryStore::from_seed(SeedData::catalog_only()).unwrap()
}

fn new_user(id: Option<&str>, name: &str, email: &str) -> CreateUser {
    CreateUser {
        id: id.map(str::to_owned),
        name: name.into(),
        email: email.into(),
    }
}

#[tokio::test]
async fn create_and_get_user() {
    let store = setup();
    let repo = store.users();

    let user = repo
        .create(new_user(Some("u1"), "Alice", "alice@example.com"))
        .await
        .unwrap();

    assert_eq!(user.id, "u1");
    assert_eq!(user.name, "Alice");
    assert_eq!(user.email, "alice@example.com");
    assert_eq!(user.created_at, user.updated_at);

    let fetched = repo.get_by_id("u1").await.unwrap();
    assert_eq!(fetched, user);
}

#[tokio::test]
async fn generated_ids_are_unique() {
    let store = setup();
    let repo = store.users();

    let a = repo
        .create(new_user(None, "A", "a@example.com"))
        .await
        .unwrap();
    let b = repo
        .create(new_user(None, "B", "b@example.com"))
        .await
        .unwrap();

    assert!(!a.id.is_empty());
    assert_ne!(a.id, b.id);
}

#[tokio::test]
async fn duplicate_id_conflicts() {
    let store = setup();
    let repo = store.users();

    repo.create(new_user(Some("u1"), "Alice", "alice@example.com"))
        .await
        .unwrap();
    let err = repo
        .create(new_user(Some("u1"), "Other", "other@example.com"))
        .await
        .unwrap_err();

    match err {
        AdminError::Conflict { field, value, .. } => {
            assert_eq!(field, "id");
            assert_eq!(value, "u1");
        }
        other => panic!("expected Conflict, got {other:?}"),
    }
}

#[tokio::test]
async fn duplicate_email_conflicts_ignoring_case() {
    let store = setup();
    let repo = store.users();

    repo.create(new_user(None, "Alice", "alice@example.com"))
        .await
        .unwrap();
    let err = repo
        .create(new_user(None, "Alice Again", "Alice@Example.com"))
        .await
        .unwrap_err();

    assert!(matches!(err, AdminError::Conflict { ref field, .. } if field == "email"));
    assert_eq!(repo.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn blank_fields_fail_validation() {
    let store = setup();
    let repo = store.users();

    let err = repo.create(new_user(None, "", " ")).await.unwrap_err();
    match err {
        AdminError::Validation { violations } => assert_eq!(violations.len(), 2),
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[tokio::test]
async fn delete_cascades_to_assignment() {
    let store = setup();
    let users = store.users();
    let assignments = store.assignments();

    users
        .create(new_user(Some("u1"), "Alice", "alice@example.com"))
        .await
        .unwrap();
    assignments
        .replace("u1", AssignPermissions::new(["perm-admin"]))
        .await
        .unwrap();

    users.delete("u1").await.unwrap();

    assert!(matches!(
        users.get_by_id("u1").await,
        Err(AdminError::NotFound { .. })
    ));
    assert!(matches!(
        assignments.get("u1").await,
        Err(AdminError::NotFound { .. })
    ));

    // A new user reusing the id starts with no grants.
    users
        .create(new_user(Some("u1"), "Alice", "alice@example.com"))
        .await
        .unwrap();
    assert!(assignments.get("u1").await.unwrap().permission_ids.is_empty());
}

#[tokio::test]
async fn second_delete_is_not_found() {
    let store = setup();
    let repo = store.users();

    repo.create(new_user(Some("u1"), "Alice", "alice@example.com"))
        .await
        .unwrap();
    repo.delete("u1").await.unwrap();

    let err = repo.delete("u1").await.unwrap_err();
    assert!(matches!(err, AdminError::NotFound { ref entity, .. } if entity == "user"));
}

#[tokio::test]
async fn list_users_with_pagination() {
    let store = MemoryStore::from_seed(SeedData::demo()).unwrap();
    let repo = store.users();

    let page = repo
        .list(Pagination::from_query(Some("3"), Some("2")))
        .await
        .unwrap();
    assert_eq!(page.total, 10);
    assert_eq!(page.limit, 3);
    assert_eq!(page.offset, 2);
    let ids: Vec<_> = page.items.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(ids, vec!["user-3", "user-4", "user-5"]);

    let past_end = repo
        .list(Pagination::from_query(None, Some("100")))
        .await
        .unwrap();
    assert!(past_end.items.is_empty());
    assert_eq!(past_end.total, 10);
}

#[tokio::test]
async fn list_keeps_insertion_order_after_delete() {
    let store = MemoryStore::from_seed(SeedData::demo()).unwrap();
    let repo = store.users();

    repo.delete("user-2").await.unwrap();
    let all = repo.list_all().await.unwrap();
    let ids: Vec<_> = all.iter().take(3).map(|u| u.id.as_str()).collect();
    assert_eq!(ids, vec!["user-1", "user-3", "user-4"]);
}
