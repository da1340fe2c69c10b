//! `plants` queries.

use sqlx::PgPool;
use uuid::Uuid;

use super::like_pattern;
use crate::error::Result;
use crate::models::{Plant, PlantFilter, PlantInput};

/// Plants matching `filter`, by common name.
///
/// The season filter mirrors [`Plant::in_season`]: any of the three season
/// columns may match, a `year_round` column matches any season, and asking
/// for `year_round` matches every plant that has a season at all.
pub async fn list(pool: &PgPool, filter: &PlantFilter) -> Result<Vec<Plant>> {
    let plants = sqlx::query_as(
        r#"
        SELECT * FROM plants
        WHERE ($1::text IS NULL OR common_name ILIKE $1 OR scientific_name ILIKE $1)
          AND ($2::text IS NULL OR care_level = $2)
          AND ($3::text IS NULL
               OR ($3 = 'year_round'
                   AND COALESCE(bloom_season, planting_season, harvest_season) IS NOT NULL)
               OR bloom_season IN ($3, 'year_round')
               OR planting_season IN ($3, 'year_round')
               OR harvest_season IN ($3, 'year_round'))
          AND ($4::boolean IS NULL OR is_edible = $4)
        ORDER BY lower(common_name), id
        "#,
    )
    .bind(like_pattern(filter.search.as_deref()))
    .bind(filter.care_level)
    .bind(filter.season)
    .bind(filter.edible)
    .fetch_all(pool)
    .await?;
    Ok(plants)
}

pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<Plant>> {
    let plant = sqlx::query_as("SELECT * FROM plants WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(plant)
}

pub async fn create(pool: &PgPool, input: &PlantInput) -> Result<Plant> {
    let plant = sqlx::query_as(
        r#"
        INSERT INTO plants (
            common_name, scientific_name, family, description, care_level,
            sunlight, watering, bloom_season, planting_season, harvest_season,
            native_region, image_url, is_edible
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING *
        "#,
    )
    .bind(input.common_name.trim())
    .bind(&input.scientific_name)
    .bind(&input.family)
    .bind(&input.description)
    .bind(input.care_level)
    .bind(&input.sunlight)
    .bind(&input.watering)
    .bind(input.bloom_season)
    .bind(input.planting_season)
    .bind(input.harvest_season)
    .bind(&input.native_region)
    .bind(&input.image_url)
    .bind(input.is_edible)
    .fetch_one(pool)
    .await?;
    Ok(plant)
}

pub async fn update(pool: &PgPool, id: Uuid, input: &PlantInput) -> Result<Option<Plant>> {
    let plant = sqlx::query_as(
        r#"
        UPDATE plants SET
            common_name = $2,
            scientific_name = $3,
            family = $4,
            description = $5,
            care_level = $6,
            sunlight = $7,
            watering = $8,
            bloom_season = $9,
            planting_season = $10,
            harvest_season = $11,
            native_region = $12,
            image_url = $13,
            is_edible = $14,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(input.common_name.trim())
    .bind(&input.scientific_name)
    .bind(&input.family)
    .bind(&input.description)
    .bind(input.care_level)
    .bind(&input.sunlight)
    .bind(&input.watering)
    .bind(input.bloom_season)
    .bind(input.planting_season)
    .bind(input.harvest_season)
    .bind(&input.native_region)
    .bind(&input.image_url)
    .bind(input.is_edible)
    .fetch_optional(pool)
    .await?;
    Ok(plant)
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM plants WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
