//! `user_profiles` queries.

use sqlx::PgPool;
use uuid::Uuid;

use super::like_pattern;
use crate::error::Result;
use crate::models::{AdminStats, ProfileUpdate, Role, UserProfile};

/// What an OAuth provider told us about the person logging in.
#[derive(Debug, Clone)]
pub struct OAuthIdentity {
    pub provider: &'static str,
    pub provider_id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UserProfile>> {
    let user = sqlx::query_as("SELECT * FROM user_profiles WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// `email` must already be normalized.
pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<UserProfile>> {
    let user = sqlx::query_as("SELECT * FROM user_profiles WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn role_of(pool: &PgPool, id: Uuid) -> Result<Option<Role>> {
    let role: Option<(Role,)> = sqlx::query_as("SELECT role FROM user_profiles WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(role.map(|(role,)| role))
}

/// Create an email + password account. A taken email surfaces as `Conflict`.
pub async fn insert_local(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
    full_name: &str,
    role: Role,
) -> Result<UserProfile> {
    let user = sqlx::query_as(
        r#"
        INSERT INTO user_profiles (email, password_hash, full_name, role, provider, last_login_at)
        VALUES ($1, $2, $3, $4, 'local', NOW())
        RETURNING *
        "#,
    )
    .bind(email)
    .bind(password_hash)
    .bind(full_name)
    .bind(role)
    .fetch_one(pool)
    .await?;
    Ok(user)
}

/// Find or create the account for an OAuth identity.
///
/// Lookup order: the `(provider, provider_id)` pair, then the email (linking
/// the provider to an existing account), then a fresh insert with `role`.
/// An existing account keeps its role and any profile fields already set.
pub async fn upsert_oauth(pool: &PgPool, identity: &OAuthIdentity, role: Role) -> Result<UserProfile> {
    let email = crate::validate::normalize_email(&identity.email);
    let mut tx = pool.begin().await?;

    let existing: Option<UserProfile> = sqlx::query_as(
        r#"
        SELECT * FROM user_profiles
        WHERE (provider = $1 AND provider_id = $2) OR email = $3
        ORDER BY (provider = $1 AND provider_id = $2) DESC
        LIMIT 1
        FOR UPDATE
        "#,
    )
    .bind(identity.provider)
    .bind(&identity.provider_id)
    .bind(&email)
    .fetch_optional(&mut *tx)
    .await?;

    let user = match existing {
        Some(user) => {
            sqlx::query_as(
                r#"
                UPDATE user_profiles SET
                    provider = $2,
                    provider_id = $3,
                    full_name = COALESCE(full_name, $4),
                    avatar_url = COALESCE(avatar_url, $5),
                    last_login_at = NOW(),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
                "#,
            )
            .bind(user.id)
            .bind(identity.provider)
            .bind(&identity.provider_id)
            .bind(&identity.full_name)
            .bind(&identity.avatar_url)
            .fetch_one(&mut *tx)
            .await?
        }
        None => {
            sqlx::query_as(
                r#"
                INSERT INTO user_profiles
                    (email, full_name, avatar_url, role, provider, provider_id, last_login_at)
                VALUES ($1, $2, $3, $4, $5, $6, NOW())
                RETURNING *
                "#,
            )
            .bind(&email)
            .bind(&identity.full_name)
            .bind(&identity.avatar_url)
            .bind(role)
            .bind(identity.provider)
            .bind(&identity.provider_id)
            .fetch_one(&mut *tx)
            .await?
        }
    };

    tx.commit().await?;
    Ok(user)
}

pub async fn touch_login(pool: &PgPool, id: Uuid) -> Result<()> {
    sqlx::query("UPDATE user_profiles SET last_login_at = NOW() WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Apply a profile update: `None` keeps a field, an empty string clears it.
pub async fn update_profile(
    pool: &PgPool,
    id: Uuid,
    update: &ProfileUpdate,
) -> Result<Option<UserProfile>> {
    let trimmed = |v: &Option<String>| v.as_deref().map(|s| s.trim().to_string());
    let user = sqlx::query_as(
        r#"
        UPDATE user_profiles SET
            full_name = NULLIF(COALESCE($2, full_name), ''),
            phone = NULLIF(COALESCE($3, phone), ''),
            student_id = NULLIF(COALESCE($4, student_id), ''),
            bio = NULLIF(COALESCE($5, bio), ''),
            avatar_url = NULLIF(COALESCE($6, avatar_url), ''),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(trimmed(&update.full_name))
    .bind(trimmed(&update.phone))
    .bind(trimmed(&update.student_id))
    .bind(&update.bio)
    .bind(trimmed(&update.avatar_url))
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn set_password(pool: &PgPool, id: Uuid, password_hash: &str) -> Result<()> {
    sqlx::query("UPDATE user_profiles SET password_hash = $2, updated_at = NOW() WHERE id = $1")
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
    Ok(())
}

/// All members, newest first, optionally filtered by email or name.
pub async fn list(pool: &PgPool, search: Option<&str>) -> Result<Vec<UserProfile>> {
    let users = sqlx::query_as(
        r#"
        SELECT * FROM user_profiles
        WHERE $1::text IS NULL OR email ILIKE $1 OR full_name ILIKE $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(like_pattern(search))
    .fetch_all(pool)
    .await?;
    Ok(users)
}

pub async fn set_role(pool: &PgPool, id: Uuid, role: Role) -> Result<Option<UserProfile>> {
    let user = sqlx::query_as(
        "UPDATE user_profiles SET role = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(role)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

/// Delete a member. Registrations and notifications cascade; the registered
/// counts of their events are released first.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        UPDATE events SET registered_count = registered_count - 1, updated_at = NOW()
        WHERE id IN (
            SELECT event_id FROM event_registrations
            WHERE user_id = $1 AND status = 'registered'
        )
        "#,
    )
    .bind(id)
    .execute(&mut *tx)
    .await?;

    let deleted = sqlx::query("DELETE FROM user_profiles WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;
    Ok(deleted > 0)
}

pub async fn stats(pool: &PgPool) -> Result<AdminStats> {
    let stats = sqlx::query_as(
        r#"
        SELECT
            (SELECT COUNT(*) FROM user_profiles) AS users,
            (SELECT COUNT(*) FROM user_profiles WHERE role = 'admin') AS admins,
            (SELECT COUNT(*) FROM plants) AS plants,
            (SELECT COUNT(*) FROM events WHERE end_time > NOW()) AS upcoming_events,
            (SELECT COUNT(*) FROM event_registrations WHERE status = 'registered') AS active_registrations,
            (SELECT COUNT(*) FROM notifications WHERE is_sent AND NOT is_read) AS unread_notifications
        "#,
    )
    .fetch_one(pool)
    .await?;
    Ok(stats)
}
