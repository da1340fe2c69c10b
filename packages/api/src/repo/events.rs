//! `events` and `event_registrations` queries.
//!
//! Everything that touches `registered_count` locks the event row first
//! (`SELECT ... FOR UPDATE`) so concurrent sign-ups cannot overfill an event.

use chrono::{DateTime, Duration, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::notifications::{self, NewNotification};
use crate::dispatch::reminder_time;
use crate::error::{ApiError, Result};
use crate::models::{
    Event, EventFilter, EventInput, MyRegistration, NotificationType, Registrant, Registration,
    RegistrationStatus,
};

#[derive(sqlx::FromRow)]
struct MyRegistrationRow {
    #[sqlx(flatten)]
    event: Event,
    reg_status: RegistrationStatus,
    reg_registered_at: DateTime<Utc>,
}

pub async fn list(
    pool: &PgPool,
    filter: &EventFilter,
    include_unpublished: bool,
    now: DateTime<Utc>,
) -> Result<Vec<Event>> {
    let events = sqlx::query_as(
        r#"
        SELECT * FROM events
        WHERE ($1 OR is_published)
          AND ($2::text IS NULL OR category = $2)
          AND ($3::text IS NULL OR difficulty = $3)
          AND (NOT $4 OR end_time > $5)
        ORDER BY start_time, id
        "#,
    )
    .bind(include_unpublished)
    .bind(filter.category)
    .bind(filter.difficulty)
    .bind(filter.upcoming)
    .bind(now)
    .fetch_all(pool)
    .await?;
    Ok(events)
}

pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<Event>> {
    let event = sqlx::query_as("SELECT * FROM events WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(event)
}

async fn lock(conn: &mut PgConnection, id: Uuid) -> Result<Event> {
    sqlx::query_as("SELECT * FROM events WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or(ApiError::NotFound("Event"))
}

pub async fn create(pool: &PgPool, input: &EventInput, created_by: Uuid) -> Result<Event> {
    let event = sqlx::query_as(
        r#"
        INSERT INTO events (
            title, description, location, category, difficulty,
            start_time, end_time, capacity, image_url, is_published, created_by
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING *
        "#,
    )
    .bind(input.title.trim())
    .bind(&input.description)
    .bind(&input.location)
    .bind(input.category)
    .bind(input.difficulty)
    .bind(input.start_time)
    .bind(input.end_time)
    .bind(input.capacity)
    .bind(&input.image_url)
    .bind(input.is_published)
    .bind(created_by)
    .fetch_one(pool)
    .await?;
    Ok(event)
}

/// Update an event and tell its registrants. The capacity may not drop below
/// the number of people already registered. A new start time moves the
/// pending reminders with it.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    input: &EventInput,
    reminder_lead: Duration,
    now: DateTime<Utc>,
) -> Result<(Event, u64)> {
    let mut tx = pool.begin().await?;
    let current = lock(&mut *tx, id).await?;

    if input.capacity < current.registered_count {
        return Err(ApiError::Validation(format!(
            "Capacity cannot be below the {} people already registered",
            current.registered_count
        )));
    }

    let event: Event = sqlx::query_as(
        r#"
        UPDATE events SET
            title = $2,
            description = $3,
            location = $4,
            category = $5,
            difficulty = $6,
            start_time = $7,
            end_time = $8,
            capacity = $9,
            image_url = $10,
            is_published = $11,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(input.title.trim())
    .bind(&input.description)
    .bind(&input.location)
    .bind(input.category)
    .bind(input.difficulty)
    .bind(input.start_time)
    .bind(input.end_time)
    .bind(input.capacity)
    .bind(&input.image_url)
    .bind(input.is_published)
    .fetch_one(&mut *tx)
    .await?;

    if event.start_time != current.start_time {
        let at = reminder_time(event.start_time, reminder_lead, now);
        let moved = notifications::reschedule_reminders(&mut *tx, id, at).await?;
        tracing::debug!(event_id = %id, moved, "reminders rescheduled");
    }

    let message = format!(
        "Details of \"{}\" have changed. It now starts {}.",
        event.title,
        event.start_time.format("%Y-%m-%d %H:%M UTC")
    );
    let notified = notifications::insert_for_registrants(
        &mut *tx,
        id,
        &NewNotification {
            event_id: Some(id),
            notification_type: NotificationType::EventUpdated,
            title: "Event updated",
            message: &message,
            scheduled_for: now,
        },
    )
    .await?;

    tx.commit().await?;
    Ok((event, notified))
}

/// Delete an event, telling active registrants first. The cancellation
/// notices carry no event reference so they survive the cascade.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64> {
    let mut tx = pool.begin().await?;
    let event = lock(&mut *tx, id).await?;

    let message = format!("\"{}\" has been cancelled.", event.title);
    let notified = notifications::insert_for_registrants(
        &mut *tx,
        id,
        &NewNotification {
            event_id: None,
            notification_type: NotificationType::EventCancelled,
            title: "Event cancelled",
            message: &message,
            scheduled_for: Utc::now(),
        },
    )
    .await?;

    sqlx::query("DELETE FROM events WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(notified)
}

/// Sign `user_id` up for an event.
///
/// Runs in one transaction: lock the event, check it is open and has room,
/// insert (or reactivate) the registration, bump the count, and queue a
/// confirmation plus a reminder `reminder_lead` before the start.
pub async fn register(
    pool: &PgPool,
    event_id: Uuid,
    user_id: Uuid,
    reminder_lead: Duration,
    now: DateTime<Utc>,
) -> Result<Registration> {
    let mut tx = pool.begin().await?;
    let event = lock(&mut *tx, event_id).await?;

    if !event.is_published || event.has_started(now) {
        return Err(ApiError::Validation(
            "Registration is closed for this event".to_string(),
        ));
    }

    let existing: Option<Registration> = sqlx::query_as(
        "SELECT * FROM event_registrations WHERE event_id = $1 AND user_id = $2 FOR UPDATE",
    )
    .bind(event_id)
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?;

    let registration: Registration = match existing {
        Some(r) if r.status != RegistrationStatus::Cancelled => {
            return Err(ApiError::Conflict(
                "You are already registered for this event".to_string(),
            ));
        }
        _ if event.is_full() => return Err(ApiError::EventFull),
        Some(r) => {
            sqlx::query_as(
                r#"
                UPDATE event_registrations SET status = 'registered', registered_at = $2
                WHERE id = $1
                RETURNING *
                "#,
            )
            .bind(r.id)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?
        }
        None => {
            sqlx::query_as(
                r#"
                INSERT INTO event_registrations (event_id, user_id, status, registered_at)
                VALUES ($1, $2, 'registered', $3)
                RETURNING *
                "#,
            )
            .bind(event_id)
            .bind(user_id)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?
        }
    };

    sqlx::query(
        "UPDATE events SET registered_count = registered_count + 1, updated_at = NOW() WHERE id = $1",
    )
    .bind(event_id)
    .execute(&mut *tx)
    .await?;

    let confirmed = format!("You are registered for \"{}\".", event.title);
    notifications::insert_for_user(
        &mut *tx,
        user_id,
        &NewNotification {
            event_id: Some(event_id),
            notification_type: NotificationType::RegistrationConfirmed,
            title: "Registration confirmed",
            message: &confirmed,
            scheduled_for: now,
        },
    )
    .await?;

    let reminder = format!(
        "\"{}\" starts at {}{}.",
        event.title,
        event.start_time.format("%Y-%m-%d %H:%M UTC"),
        event
            .location
            .as_deref()
            .map(|l| format!(" at {l}"))
            .unwrap_or_default()
    );
    notifications::insert_for_user(
        &mut *tx,
        user_id,
        &NewNotification {
            event_id: Some(event_id),
            notification_type: NotificationType::EventReminder,
            title: "Event reminder",
            message: &reminder,
            scheduled_for: reminder_time(event.start_time, reminder_lead, now),
        },
    )
    .await?;

    tx.commit().await?;
    tracing::info!(%event_id, %user_id, "registered for event");
    Ok(registration)
}

/// Cancel `user_id`'s registration. 404 when there is no active one.
pub async fn cancel(pool: &PgPool, event_id: Uuid, user_id: Uuid) -> Result<()> {
    let mut tx = pool.begin().await?;
    lock(&mut *tx, event_id).await?;

    let cancelled = sqlx::query(
        r#"
        UPDATE event_registrations SET status = 'cancelled'
        WHERE event_id = $1 AND user_id = $2 AND status = 'registered'
        "#,
    )
    .bind(event_id)
    .bind(user_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if cancelled == 0 {
        return Err(ApiError::NotFound("Registration"));
    }

    sqlx::query(
        r#"
        UPDATE events SET registered_count = GREATEST(registered_count - 1, 0), updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(event_id)
    .execute(&mut *tx)
    .await?;

    notifications::delete_unsent_reminders(&mut *tx, event_id, user_id).await?;

    tx.commit().await?;
    tracing::info!(%event_id, %user_id, "registration cancelled");
    Ok(())
}

/// The caller's registrations (any status), soonest event first.
pub async fn my_registrations(pool: &PgPool, user_id: Uuid) -> Result<Vec<MyRegistration>> {
    let rows: Vec<MyRegistrationRow> = sqlx::query_as(
        r#"
        SELECT e.*, r.status AS reg_status, r.registered_at AS reg_registered_at
        FROM event_registrations r
        JOIN events e ON e.id = r.event_id
        WHERE r.user_id = $1
        ORDER BY e.start_time
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| MyRegistration {
            event: row.event,
            status: row.reg_status,
            registered_at: row.reg_registered_at,
        })
        .collect())
}

pub async fn registrants(pool: &PgPool, event_id: Uuid) -> Result<Vec<Registrant>> {
    let rows = sqlx::query_as(
        r#"
        SELECT u.id AS user_id, u.email, u.full_name, u.student_id, r.status, r.registered_at
        FROM event_registrations r
        JOIN user_profiles u ON u.id = r.user_id
        WHERE r.event_id = $1
        ORDER BY r.registered_at
        "#,
    )
    .bind(event_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
