//! The caller's inbox, plus admin broadcasts.

use axum::extract::State;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use super::{check, ok, ApiResult, Body, Path, Query};
use crate::auth::{AdminUser, CurrentUser};
use crate::error::ApiError;
use crate::models::{AdminNotification, Broadcast, BroadcastResult, Notification, UnreadCount};
use crate::repo;
use crate::state::AppState;
use crate::validate;

/// How many rows the admin notification list shows.
const ADMIN_RECENT_LIMIT: i64 = 100;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    unread_only: bool,
}

pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<ListParams>,
) -> ApiResult<Vec<Notification>> {
    ok(repo::notifications::list_for_user(&state.pool, user.sub, params.unread_only).await?)
}

pub async fn unread_count(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<UnreadCount> {
    let unread = repo::notifications::unread_count(&state.pool, user.sub).await?;
    ok(UnreadCount { unread })
}

pub async fn mark_read(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    if !repo::notifications::mark_read(&state.pool, id, user.sub).await? {
        return Err(ApiError::NotFound("Notification"));
    }
    ok(())
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<u64> {
    ok(repo::notifications::mark_all_read(&state.pool, user.sub).await?)
}

pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    if !repo::notifications::delete(&state.pool, id, user.sub).await? {
        return Err(ApiError::NotFound("Notification"));
    }
    ok(())
}

pub async fn broadcast(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Body(broadcast): Body<Broadcast>,
) -> ApiResult<BroadcastResult> {
    check(validate::required("Title", &broadcast.title))?;
    check(validate::max_len("Title", broadcast.title.trim(), 160))?;
    check(validate::required("Message", &broadcast.message))?;
    check(validate::max_len("Message", &broadcast.message, 2000))?;

    let created = repo::notifications::broadcast(&state.pool, &broadcast, Utc::now()).await?;
    tracing::info!(admin_id = %admin.sub, created, audience = ?broadcast.audience, "broadcast queued");
    ok(BroadcastResult { created })
}

pub async fn recent(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
) -> ApiResult<Vec<AdminNotification>> {
    ok(repo::notifications::recent(&state.pool, ADMIN_RECENT_LIMIT).await?)
}
