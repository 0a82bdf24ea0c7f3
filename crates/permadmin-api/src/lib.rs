//! Permadmin API — HTTP routes for the permissions admin service.
//!
//! Two route families share one store:
//! - `/v1/...`: id-based, paginated, `{code, message, details}` errors.
//! - `/users`, `/permissions`: name-based flag lists for the original
//!   admin UI, `{error}` errors.
//!
//! Every route accepts cross-origin requests.

pub mod dto;
pub mod error;
mod legacy;
mod state;
mod v1;

use axum::Router;
use axum::routing::{delete, get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::{ApiError, LegacyError};
pub use state::AppState;

fn v1_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(v1::list_users).post(v1::create_user))
        .route("/users/:user_id", delete(v1::delete_user))
        .route(
            "/users/:user_id/permissions",
            get(v1::get_user_permissions)
                .put(v1::replace_user_permissions)
                .post(v1::merge_user_permissions),
        )
        .route("/permissions", get(v1::list_permissions))
}

fn legacy_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(legacy::list_users).post(legacy::create_user))
        .route("/users/:user_id", delete(legacy::delete_user))
        .route(
            "/users/:user_id/permissions",
            get(legacy::get_user_permissions)
                .put(legacy::replace_user_permissions)
                .post(legacy::grant_user_permission),
        )
        .route("/permissions", get(legacy::list_permissions))
}

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .nest("/v1", v1_routes())
        .merge(legacy_routes())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
