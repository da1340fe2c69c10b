//! # Notification dispatcher
//!
//! Notifications are written with a `scheduled_for` time and `is_sent = false`.
//! A background task wakes up every `notifications.dispatch_interval_secs` and
//! marks everything due as sent, which is what makes it appear in the
//! recipient's inbox. Delivery is in-app only.

use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::repo;

/// When to remind a registrant: `lead` before `start`, but never before `now`.
pub fn reminder_time(
    start: DateTime<Utc>,
    lead: chrono::Duration,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    (start - lead).max(now)
}

/// Release every notification due at `now`.
pub async fn dispatch_due(pool: &PgPool, now: DateTime<Utc>) -> crate::error::Result<u64> {
    let released = repo::notifications::mark_due_sent(pool, now).await?;
    if released > 0 {
        tracing::info!(released, "dispatched notifications");
    }
    Ok(released)
}

/// Spawn the dispatch loop on the current runtime.
pub fn spawn_dispatcher(pool: PgPool, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(interval_secs = every.as_secs(), "notification dispatcher started");

        loop {
            ticker.tick().await;
            if let Err(e) = dispatch_due(&pool, Utc::now()).await {
                tracing::warn!("notification dispatch failed: {}", e);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn reminder_is_lead_before_start() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let start = Utc.with_ymd_and_hms(2026, 3, 10, 14, 0, 0).unwrap();
        assert_eq!(
            reminder_time(start, Duration::hours(24), now),
            Utc.with_ymd_and_hms(2026, 3, 9, 14, 0, 0).unwrap()
        );
    }

    #[test]
    fn reminder_in_the_past_is_clamped_to_now() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        let start = Utc.with_ymd_and_hms(2026, 3, 10, 14, 0, 0).unwrap();
        assert_eq!(reminder_time(start, Duration::hours(24), now), now);
    }
}
