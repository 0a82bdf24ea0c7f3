//! Handlers for the versioned `/v1` routes.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use permadmin_core::models::assignment::{AssignPermissions, Assignment};
use permadmin_core::models::user::{CreateUser, User};
use permadmin_core::repository::{
    AssignmentRepository, Pagination, PermissionRepository, UserRepository,
};

use crate::dto::{PageQuery, PermissionsList, UserList, UserPermissions};
use crate::error::ApiError;
use crate::state::AppState;

pub(crate) fn pagination(query: Result<Query<PageQuery>, QueryRejection>) -> Pagination {
    let query = query.map(|Query(q)| q).unwrap_or_default();
    Pagination::from_query(query.limit.as_deref(), query.offset.as_deref())
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::malformed_body(rejection.body_text()))
}

async fn with_catalog(state: &AppState, assignment: Assignment) -> Result<UserPermissions, ApiError> {
    let catalog = state.permissions.list_all().await?;
    Ok(UserPermissions::resolve(assignment, &catalog))
}

pub async fn list_users(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<UserList>, ApiError> {
    let page = state.users.list(pagination(query)).await?;
    Ok(Json(page.into()))
}

pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUser>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = state.users.create(body(payload)?).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.users.delete(&user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_user_permissions(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserPermissions>, ApiError> {
    let assignment = state.assignments.get(&user_id).await?;
    Ok(Json(with_catalog(&state, assignment).await?))
}

/// `PUT`: replace the user's grants.
pub async fn replace_user_permissions(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    payload: Result<Json<AssignPermissions>, JsonRejection>,
) -> Result<Json<UserPermissions>, ApiError> {
    // An unknown user wins over a bad body.
    state.users.get_by_id(&user_id).await?;
    let assignment = state.assignments.replace(&user_id, body(payload)?).await?;
    Ok(Json(with_catalog(&state, assignment).await?))
}

/// `POST`: add to the user's grants. Answers 201 rather than 200.
pub async fn merge_user_permissions(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    payload: Result<Json<AssignPermissions>, JsonRejection>,
) -> Result<(StatusCode, Json<UserPermissions>), ApiError> {
    state.users.get_by_id(&user_id).await?;
    let assignment = state.assignments.merge(&user_id, body(payload)?).await?;
    Ok((
        StatusCode::CREATED,
        Json(with_catalog(&state, assignment).await?),
    ))
}

pub async fn list_permissions(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<PermissionsList>, ApiError> {
    let page = state.permissions.list(pagination(query)).await?;
    Ok(Json(page.into()))
}
