//! Plant library: public reads, admin writes.

use axum::extract::State;
use uuid::Uuid;

use super::{check, ok, ApiResult, Body, Path, Query};
use crate::auth::AdminUser;
use crate::error::ApiError;
use crate::models::{Plant, PlantFilter, PlantInput};
use crate::repo;
use crate::state::AppState;
use crate::validate;

pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<PlantFilter>,
) -> ApiResult<Vec<Plant>> {
    ok(repo::plants::list(&state.pool, &filter).await?)
}

pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Plant> {
    let plant = repo::plants::get(&state.pool, id)
        .await?
        .ok_or(ApiError::NotFound("Plant"))?;
    ok(plant)
}

pub async fn create(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Body(input): Body<PlantInput>,
) -> ApiResult<Plant> {
    check(validate::plant(&input))?;
    let plant = repo::plants::create(&state.pool, &input).await?;
    tracing::info!(plant_id = %plant.id, admin_id = %admin.sub, "plant created");
    ok(plant)
}

pub async fn update(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<Uuid>,
    Body(input): Body<PlantInput>,
) -> ApiResult<Plant> {
    check(validate::plant(&input))?;
    let plant = repo::plants::update(&state.pool, id, &input)
        .await?
        .ok_or(ApiError::NotFound("Plant"))?;
    ok(plant)
}

pub async fn delete(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    if !repo::plants::delete(&state.pool, id).await? {
        return Err(ApiError::NotFound("Plant"));
    }
    tracing::info!(plant_id = %id, admin_id = %admin.sub, "plant deleted");
    ok(())
}
