//! Member management and the dashboard counters.

use axum::extract::State;
use serde::Deserialize;
use uuid::Uuid;

use super::{ok, ApiResult, Body, Path, Query};
use crate::auth::AdminUser;
use crate::error::ApiError;
use crate::models::{AdminStats, Role, RoleUpdate, UserInfo};
use crate::repo;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct UserSearch {
    search: Option<String>,
}

pub async fn users(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Query(params): Query<UserSearch>,
) -> ApiResult<Vec<UserInfo>> {
    let users = repo::users::list(&state.pool, params.search.as_deref()).await?;
    ok(users.iter().map(|u| u.to_info()).collect())
}

pub async fn set_role(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Body(update): Body<RoleUpdate>,
) -> ApiResult<UserInfo> {
    if id == admin.sub && update.role != Role::Admin {
        return Err(ApiError::Validation(
            "You cannot remove your own admin role".to_string(),
        ));
    }
    let user = repo::users::set_role(&state.pool, id, update.role)
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    tracing::info!(user_id = %id, admin_id = %admin.sub, role = %update.role, "role changed");
    ok(user.to_info())
}

pub async fn delete_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    if id == admin.sub {
        return Err(ApiError::Validation(
            "You cannot delete your own account".to_string(),
        ));
    }
    if !repo::users::delete(&state.pool, id).await? {
        return Err(ApiError::NotFound("User"));
    }
    tracing::info!(user_id = %id, admin_id = %admin.sub, "user deleted");
    ok(())
}

pub async fn stats(State(state): State<AppState>, AdminUser(_): AdminUser) -> ApiResult<AdminStats> {
    ok(repo::users::stats(&state.pool).await?)
}
