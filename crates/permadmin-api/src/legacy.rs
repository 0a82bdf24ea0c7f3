//! Handlers for the unversioned routes used by the original admin UI.
//!
//! These speak in permission names and `{permission, granted}` flag lists
//! and report errors as `{error}`. Permission names are catalog ids.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use permadmin_core::models::assignment::PermissionFlag;
use permadmin_core::models::user::CreateUser;
use permadmin_core::repository::{AssignmentRepository, PermissionRepository, UserRepository};

use crate::dto::{GrantRequest, LegacyUser, MessageBody};
use crate::error::{ApiError, LegacyError};
use crate::state::AppState;

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, LegacyError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::malformed_body(rejection.body_text()).into())
}

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<LegacyUser>>, LegacyError> {
    let users = state
        .assignments
        .users_with_flags()
        .await?
        .into_iter()
        .map(|(user, permissions)| LegacyUser { user, permissions })
        .collect();
    Ok(Json(users))
}

pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUser>, JsonRejection>,
) -> Result<(StatusCode, Json<LegacyUser>), LegacyError> {
    let user = state.users.create(body(payload)?).await?;
    let permissions = state.assignments.flags(&user.id).await?;
    Ok((StatusCode::CREATED, Json(LegacyUser { user, permissions })))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<MessageBody>, LegacyError> {
    state.users.delete(&user_id).await?;
    Ok(Json(MessageBody {
        message: format!("User {user_id} deleted"),
    }))
}

/// Names of the permissions currently granted.
pub async fn get_user_permissions(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<String>>, LegacyError> {
    let assignment = state.assignments.get(&user_id).await?;
    Ok(Json(assignment.permission_ids))
}

pub async fn replace_user_permissions(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    payload: Result<Json<Vec<PermissionFlag>>, JsonRejection>,
) -> Result<Json<Vec<PermissionFlag>>, LegacyError> {
    state.users.get_by_id(&user_id).await?;
    let flags = state
        .assignments
        .replace_flags(&user_id, body(payload)?)
        .await?;
    Ok(Json(flags))
}

pub async fn grant_user_permission(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    payload: Result<Json<GrantRequest>, JsonRejection>,
) -> Result<Json<Vec<PermissionFlag>>, LegacyError> {
    state.users.get_by_id(&user_id).await?;
    let GrantRequest { permission, granted } = body(payload)?;
    let flags = state
        .assignments
        .grant_one(&user_id, &permission, granted)
        .await?;
    Ok(Json(flags))
}

pub async fn list_permissions(State(state): State<AppState>) -> Result<Json<Vec<String>>, LegacyError> {
    let names = state
        .permissions
        .list_all()
        .await?
        .into_iter()
        .map(|p| p.id)
        .collect();
    Ok(Json(names))
}
