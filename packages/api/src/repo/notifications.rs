//! `notifications` queries.
//!
//! A notification becomes visible to its recipient once the dispatcher has
//! marked it sent; until then it only shows up in the admin list.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::{AdminNotification, Audience, Broadcast, Notification, NotificationType};

/// A notification about to be queued.
#[derive(Debug, Clone)]
pub struct NewNotification<'a> {
    pub event_id: Option<Uuid>,
    pub notification_type: NotificationType,
    pub title: &'a str,
    pub message: &'a str,
    pub scheduled_for: DateTime<Utc>,
}

pub async fn list_for_user(pool: &PgPool, user_id: Uuid, unread_only: bool) -> Result<Vec<Notification>> {
    let notifications = sqlx::query_as(
        r#"
        SELECT * FROM notifications
        WHERE user_id = $1 AND is_sent AND (NOT $2 OR NOT is_read)
        ORDER BY scheduled_for DESC, created_at DESC
        "#,
    )
    .bind(user_id)
    .bind(unread_only)
    .fetch_all(pool)
    .await?;
    Ok(notifications)
}

pub async fn unread_count(pool: &PgPool, user_id: Uuid) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_sent AND NOT is_read",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Returns false when the notification does not exist or is not the caller's.
pub async fn mark_read(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE notifications SET is_read = TRUE WHERE id = $1 AND user_id = $2 AND is_sent",
    )
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn mark_all_read(pool: &PgPool, user_id: Uuid) -> Result<u64> {
    let result = sqlx::query(
        "UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND is_sent AND NOT is_read",
    )
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND user_id = $2 AND is_sent")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn insert_for_user(
    conn: &mut PgConnection,
    user_id: Uuid,
    new: &NewNotification<'_>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO notifications (user_id, event_id, notification_type, title, message, scheduled_for)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(user_id)
    .bind(new.event_id)
    .bind(new.notification_type)
    .bind(new.title)
    .bind(new.message)
    .bind(new.scheduled_for)
    .execute(conn)
    .await?;
    Ok(())
}

/// Queue one notification for every active registrant of `event_id`.
pub async fn insert_for_registrants(
    conn: &mut PgConnection,
    event_id: Uuid,
    new: &NewNotification<'_>,
) -> Result<u64> {
    let result = sqlx::query(
        r#"
        INSERT INTO notifications (user_id, event_id, notification_type, title, message, scheduled_for)
        SELECT user_id, $2, $3, $4, $5, $6
        FROM event_registrations
        WHERE event_id = $1 AND status = 'registered'
        "#,
    )
    .bind(event_id)
    .bind(new.event_id)
    .bind(new.notification_type)
    .bind(new.title)
    .bind(new.message)
    .bind(new.scheduled_for)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

/// Fan a broadcast out to its audience. Unknown event or user targets are 404.
pub async fn broadcast(pool: &PgPool, broadcast: &Broadcast, now: DateTime<Utc>) -> Result<u64> {
    let scheduled_for = broadcast.scheduled_for.unwrap_or(now).max(now);
    let mut tx = pool.begin().await?;

    let created = match broadcast.audience {
        Audience::All => sqlx::query(
            r#"
            INSERT INTO notifications (user_id, notification_type, title, message, scheduled_for)
            SELECT id, $1, $2, $3, $4 FROM user_profiles
            "#,
        )
        .bind(broadcast.notification_type)
        .bind(&broadcast.title)
        .bind(&broadcast.message)
        .bind(scheduled_for)
        .execute(&mut *tx)
        .await?
        .rows_affected(),
        Audience::Event(event_id) => {
            let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM events WHERE id = $1")
                .bind(event_id)
                .fetch_optional(&mut *tx)
                .await?;
            if exists.is_none() {
                return Err(ApiError::NotFound("Event"));
            }
            let new = NewNotification {
                event_id: Some(event_id),
                notification_type: broadcast.notification_type,
                title: &broadcast.title,
                message: &broadcast.message,
                scheduled_for,
            };
            insert_for_registrants(&mut *tx, event_id, &new).await?
        }
        Audience::User(user_id) => {
            let created = sqlx::query(
                r#"
                INSERT INTO notifications (user_id, notification_type, title, message, scheduled_for)
                SELECT id, $2, $3, $4, $5 FROM user_profiles WHERE id = $1
                "#,
            )
            .bind(user_id)
            .bind(broadcast.notification_type)
            .bind(&broadcast.title)
            .bind(&broadcast.message)
            .bind(scheduled_for)
            .execute(&mut *tx)
            .await?
            .rows_affected();
            if created == 0 {
                return Err(ApiError::NotFound("User"));
            }
            created
        }
    };

    tx.commit().await?;
    Ok(created)
}

/// Drop reminders for `user_id` at `event_id` that have not gone out yet.
pub async fn delete_unsent_reminders(conn: &mut PgConnection, event_id: Uuid, user_id: Uuid) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM notifications
        WHERE event_id = $1 AND user_id = $2
          AND notification_type = 'event_reminder' AND NOT is_sent
        "#,
    )
    .bind(event_id)
    .bind(user_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

/// Move the pending reminders of an event to `at`. Returns how many moved.
pub async fn reschedule_reminders(conn: &mut PgConnection, event_id: Uuid, at: DateTime<Utc>) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE notifications SET scheduled_for = $2
        WHERE event_id = $1
          AND notification_type = 'event_reminder' AND NOT is_sent
        "#,
    )
    .bind(event_id)
    .bind(at)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

/// Mark everything due at `now` as sent. Returns how many were released.
pub async fn mark_due_sent(pool: &PgPool, now: DateTime<Utc>) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE notifications SET is_sent = TRUE, sent_at = $1
        WHERE NOT is_sent AND scheduled_for <= $1
        "#,
    )
    .bind(now)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

/// Latest notifications across all members, for the admin panel.
pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<AdminNotification>> {
    let rows = sqlx::query_as(
        r#"
        SELECT n.id, u.email AS recipient_email, n.event_id, n.notification_type,
               n.title, n.scheduled_for, n.is_sent, n.is_read
        FROM notifications n
        JOIN user_profiles u ON u.id = n.user_id
        ORDER BY n.created_at DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
