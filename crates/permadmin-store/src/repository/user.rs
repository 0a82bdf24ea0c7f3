//! In-memory implementation of [`UserRepository`].
//!
//! Ids are generated as random UUID strings when the caller does not
//! supply one. Email uniqueness ignores ASCII case.

use chrono::Utc;
use permadmin_core::error::{AdminError, AdminResult};
use permadmin_core::models::user::{CreateUser, User};
use permadmin_core::repository::{PaginatedResult, Pagination, UserRepository};
use permadmin_core::validation;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::memory::MemoryStore;

#[derive(Clone)]
pub struct MemoryUserRepository {
    store: MemoryStore,
}

impl MemoryUserRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

impl UserRepository for MemoryUserRepository {
    async fn create(&self, input: CreateUser) -> AdminResult<User> {
        validation::validate_new_user(&input)
            .map_err(|violations| AdminError::Validation { violations })?;

        let name = input.name.trim().to_owned();
        let email = input.email.trim().to_owned();

        let mut tables = self.store.write().await;

        if let Some(id) = &input.id {
            if tables.users.contains_key(id) {
                warn!(user_id = %id, "Rejected user with duplicate id");
                return Err(AdminError::Conflict {
                    entity: "user".into(),
                    field: "id".into(),
                    value: id.clone(),
                });
            }
        }
        if tables.email_in_use(&email) {
            warn!(email = %email, "Rejected user with duplicate email");
            return Err(AdminError::Conflict {
                entity: "user".into(),
                field: "email".into(),
                value: email,
            });
        }

        let id = match input.id {
            Some(id) => id,
            None => loop {
                let candidate = Uuid::new_v4().to_string();
                if !tables.users.contains_key(&candidate) {
                    break candidate;
                }
            },
        };

        let now = Utc::now();
        let user = User {
            id: id.clone(),
            name,
            email,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(id, user.clone());

        info!(user_id = %user.id, "User created");
        Ok(user)
    }

    async fn get_by_id(&self, id: &str) -> AdminResult<User> {
        let tables = self.store.read().await;
        tables.require_user(id).cloned()
    }

    async fn list(&self, pagination: Pagination) -> AdminResult<PaginatedResult<User>> {
        let tables = self.store.read().await;
        let users: Vec<User> = tables.users.values().cloned().collect();
        let page = pagination.page(&users);
        debug!(
            limit = page.limit,
            offset = page.offset,
            returned = page.items.len(),
            total = page.total,
            "Listed users"
        );
        Ok(page)
    }

    async fn list_all(&self) -> AdminResult<Vec<User>> {
        let tables = self.store.read().await;
        Ok(tables.users.values().cloned().collect())
    }

    async fn delete(&self, id: &str) -> AdminResult<()> {
        let mut tables = self.store.write().await;

        if tables.users.shift_remove(id).is_none() {
            return Err(AdminError::user_not_found(id));
        }
        let had_grants = tables.assignments.remove(id).is_some();

        info!(user_id = %id, had_grants, "User deleted");
        Ok(())
    }
}
