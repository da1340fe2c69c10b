//! Events and event registrations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

text_enum! {
    pub enum EventCategory {
        Workshop => "workshop",
        FieldTrip => "field_trip",
        Social => "social",
        Volunteering => "volunteering",
        Lecture => "lecture",
    }
}

text_enum! {
    pub enum Difficulty {
        Beginner => "beginner",
        Intermediate => "intermediate",
        Advanced => "advanced",
    }
}

text_enum! {
    pub enum RegistrationStatus {
        Registered => "registered",
        Cancelled => "cancelled",
        Attended => "attended",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub category: EventCategory,
    pub difficulty: Difficulty,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub capacity: i32,
    pub registered_count: i32,
    pub image_url: Option<String>,
    pub is_published: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn spots_left(&self) -> i32 {
        (self.capacity - self.registered_count).max(0)
    }

    pub fn is_full(&self) -> bool {
        self.spots_left() == 0
    }

    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        self.start_time <= now
    }

    pub fn to_input(&self) -> EventInput {
        EventInput {
            title: self.title.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
            category: self.category,
            difficulty: self.difficulty,
            start_time: self.start_time,
            end_time: self.end_time,
            capacity: self.capacity,
            image_url: self.image_url.clone(),
            is_published: self.is_published,
        }
    }
}

/// Fields an admin can set on an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventInput {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub category: EventCategory,
    pub difficulty: Difficulty,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub capacity: i32,
    pub image_url: Option<String>,
    pub is_published: bool,
}

/// Query string of `GET /api/events`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventFilter {
    pub category: Option<EventCategory>,
    pub difficulty: Option<Difficulty>,
    /// Only events that have not ended yet. Defaults to true.
    #[serde(default = "default_upcoming")]
    pub upcoming: bool,
}

fn default_upcoming() -> bool {
    true
}

impl Default for EventFilter {
    fn default() -> Self {
        Self {
            category: None,
            difficulty: None,
            upcoming: default_upcoming(),
        }
    }
}

impl EventFilter {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![("upcoming", self.upcoming.to_string())];
        if let Some(category) = self.category {
            query.push(("category", category.to_string()));
        }
        if let Some(difficulty) = self.difficulty {
            query.push(("difficulty", difficulty.to_string()));
        }
        query
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct Registration {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub status: RegistrationStatus,
    pub registered_at: DateTime<Utc>,
}

/// An event the caller has signed up for, with the registration status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MyRegistration {
    pub event: Event,
    pub status: RegistrationStatus,
    pub registered_at: DateTime<Utc>,
}

/// One row of the admin registrant list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct Registrant {
    pub user_id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub student_id: Option<String>,
    pub status: RegistrationStatus,
    pub registered_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn event(capacity: i32, registered: i32) -> Event {
        let now = Utc::now();
        Event {
            id: Uuid::new_v4(),
            title: "Seed swap".into(),
            description: None,
            location: Some("Greenhouse".into()),
            category: EventCategory::Social,
            difficulty: Difficulty::Beginner,
            start_time: now + Duration::days(2),
            end_time: now + Duration::days(2) + Duration::hours(2),
            capacity,
            registered_count: registered,
            image_url: None,
            is_published: true,
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn spots_left_never_negative() {
        assert_eq!(event(10, 3).spots_left(), 7);
        assert!(event(5, 5).is_full());
        assert_eq!(event(5, 9).spots_left(), 0);
    }

    #[test]
    fn has_started_compares_start_time() {
        let e = event(5, 0);
        assert!(!e.has_started(Utc::now()));
        assert!(e.has_started(e.start_time));
    }

    #[test]
    fn filter_defaults_to_upcoming() {
        let filter: EventFilter = serde_json::from_str("{}").unwrap();
        assert!(filter.upcoming);
        let filter = EventFilter {
            category: Some(EventCategory::FieldTrip),
            ..Default::default()
        };
        assert_eq!(
            filter.to_query(),
            vec![
                ("upcoming", "true".to_string()),
                ("category", "field_trip".to_string())
            ]
        );
    }
}
