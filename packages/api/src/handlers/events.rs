//! Events and registrations.

use axum::extract::State;
use chrono::{Duration, Utc};
use uuid::Uuid;

use super::{check, ok, ApiResult, Body, Path, Query};
use crate::auth::{AdminUser, CurrentUser, MaybeUser};
use crate::error::ApiError;
use crate::models::{Event, EventFilter, EventInput, MyRegistration, Registrant, Registration};
use crate::repo;
use crate::state::AppState;
use crate::validate;

pub async fn list(
    State(state): State<AppState>,
    MaybeUser(caller): MaybeUser,
    Query(filter): Query<EventFilter>,
) -> ApiResult<Vec<Event>> {
    let include_unpublished = caller.is_some_and(|c| c.is_admin());
    ok(repo::events::list(&state.pool, &filter, include_unpublished, Utc::now()).await?)
}

/// Unpublished events are only visible to admins.
pub async fn get(
    State(state): State<AppState>,
    MaybeUser(caller): MaybeUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Event> {
    let event = repo::events::get(&state.pool, id)
        .await?
        .filter(|e| e.is_published || caller.as_ref().is_some_and(|c| c.is_admin()))
        .ok_or(ApiError::NotFound("Event"))?;
    ok(event)
}

pub async fn register(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Registration> {
    let lead = Duration::hours(state.settings.notifications.reminder_lead_hours);
    let registration = repo::events::register(&state.pool, id, user.sub, lead, Utc::now()).await?;
    ok(registration)
}

pub async fn cancel_registration(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    repo::events::cancel(&state.pool, id, user.sub).await?;
    ok(())
}

pub async fn my_registrations(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Vec<MyRegistration>> {
    ok(repo::events::my_registrations(&state.pool, user.sub).await?)
}

pub async fn create(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Body(input): Body<EventInput>,
) -> ApiResult<Event> {
    check(validate::event(&input))?;
    let event = repo::events::create(&state.pool, &input, admin.sub).await?;
    tracing::info!(event_id = %event.id, admin_id = %admin.sub, "event created");
    ok(event)
}

pub async fn update(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Body(input): Body<EventInput>,
) -> ApiResult<Event> {
    check(validate::event(&input))?;
    let lead = Duration::hours(state.settings.notifications.reminder_lead_hours);
    let (event, notified) = repo::events::update(&state.pool, id, &input, lead, Utc::now()).await?;
    tracing::info!(event_id = %id, admin_id = %admin.sub, notified, "event updated");
    ok(event)
}

pub async fn delete(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    let notified = repo::events::delete(&state.pool, id).await?;
    tracing::info!(event_id = %id, admin_id = %admin.sub, notified, "event deleted");
    ok(())
}

pub async fn registrants(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<Registrant>> {
    if repo::events::get(&state.pool, id).await?.is_none() {
        return Err(ApiError::NotFound("Event"));
    }
    ok(repo::events::registrants(&state.pool, id).await?)
}
