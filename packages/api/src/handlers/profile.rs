//! The caller's own profile.

use axum::extract::State;

use super::{check, ok, ApiResult, Body};
use crate::auth::{hash_password_async, verify_password_async, CurrentUser};
use crate::error::ApiError;
use crate::models::{PasswordChange, ProfileUpdate, UserInfo};
use crate::repo;
use crate::state::AppState;
use crate::validate;

pub async fn get(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> ApiResult<UserInfo> {
    let profile = repo::users::find_by_id(&state.pool, user.sub)
        .await?
        .ok_or_else(ApiError::unauthorized)?;
    ok(profile.to_info())
}

pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Body(update): Body<ProfileUpdate>,
) -> ApiResult<UserInfo> {
    check(validate::profile(&update))?;
    let profile = repo::users::update_profile(&state.pool, user.sub, &update)
        .await?
        .ok_or_else(ApiError::unauthorized)?;
    ok(profile.to_info())
}

/// Only accounts with a local password can change it.
pub async fn change_password(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Body(change): Body<PasswordChange>,
) -> ApiResult<()> {
    let profile = repo::users::find_by_id(&state.pool, user.sub)
        .await?
        .ok_or_else(ApiError::unauthorized)?;
    let Some(hash) = profile.password_hash else {
        return Err(ApiError::Validation(
            "This account signs in through an external provider".to_string(),
        ));
    };
    if !verify_password_async(change.current_password, hash).await? {
        return Err(ApiError::Unauthorized(
            "Current password is incorrect".to_string(),
        ));
    }
    check(validate::password(&change.new_password))?;

    let new_hash = hash_password_async(change.new_password).await?;
    repo::users::set_password(&state.pool, user.sub, &new_hash).await?;
    tracing::info!(user_id = %user.sub, "password changed");
    ok(())
}
