//! In-app notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

text_enum! {
    pub enum NotificationType {
        EventReminder => "event_reminder",
        RegistrationConfirmed => "registration_confirmed",
        EventUpdated => "event_updated",
        EventCancelled => "event_cancelled",
        Announcement => "announcement",
    }
}

impl NotificationType {
    pub fn label(&self) -> &'static str {
        match self {
            NotificationType::EventReminder => "Reminder",
            NotificationType::RegistrationConfirmed => "Registration",
            NotificationType::EventUpdated => "Event update",
            NotificationType::EventCancelled => "Cancelled",
            NotificationType::Announcement => "Announcement",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Option<Uuid>,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub scheduled_for: DateTime<Utc>,
    pub is_sent: bool,
    pub is_read: bool,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Who an admin broadcast goes to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Audience {
    All,
    Event(Uuid),
    User(Uuid),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Broadcast {
    pub audience: Audience,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    /// Deliver later instead of on the next dispatch tick.
    pub scheduled_for: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BroadcastResult {
    pub created: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnreadCount {
    pub unread: i64,
}

/// Notification row joined with its recipient, for the admin panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct AdminNotification {
    pub id: Uuid,
    pub recipient_email: String,
    pub event_id: Option<Uuid>,
    pub notification_type: NotificationType,
    pub title: String,
    pub scheduled_for: DateTime<Utc>,
    pub is_sent: bool,
    pub is_read: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn audience_wire_shape() {
        let id = Uuid::nil();
        assert_eq!(serde_json::to_value(Audience::All).unwrap(), json!({ "kind": "all" }));
        assert_eq!(
            serde_json::to_value(Audience::Event(id)).unwrap(),
            json!({ "kind": "event", "id": id })
        );
    }

    #[test]
    fn notification_type_text() {
        assert_eq!(NotificationType::EventReminder.as_str(), "event_reminder");
        assert_eq!(
            "announcement".parse::<NotificationType>(),
            Ok(NotificationType::Announcement)
        );
    }
}
