//! Input validation shared by the UI forms and the server handlers.
//!
//! Every check returns a message meant to be shown to the user as-is.

use chrono::{DateTime, Utc};

use crate::models::{EventInput, PlantInput, ProfileUpdate, SignupRequest};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 128;

pub type Validation = Result<(), String>;

/// Trim and lower-case an email address the way it is stored.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn email(email: &str) -> Validation {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return Err("Invalid email address".to_string());
    };
    if local.is_empty()
        || domain.is_empty()
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || email.chars().any(char::is_whitespace)
    {
        return Err("Invalid email address".to_string());
    }
    max_len("Email", email, 254)
}

pub fn password(password: &str) -> Validation {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        ));
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(format!(
            "Password must be at most {MAX_PASSWORD_LEN} characters"
        ));
    }
    Ok(())
}

pub fn required(field: &str, value: &str) -> Validation {
    if value.trim().is_empty() {
        Err(format!("{field} is required"))
    } else {
        Ok(())
    }
}

pub fn max_len(field: &str, value: &str, max: usize) -> Validation {
    if value.chars().count() > max {
        Err(format!("{field} must be at most {max} characters"))
    } else {
        Ok(())
    }
}

pub fn optional_url(field: &str, value: Option<&str>) -> Validation {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(()),
        Some(url) if url.starts_with("https://") || url.starts_with("http://") => {
            max_len(field, url, 2048)
        }
        Some(_) => Err(format!("{field} must be an http(s) URL")),
    }
}

pub fn event_times(start: DateTime<Utc>, end: DateTime<Utc>) -> Validation {
    if end <= start {
        Err("End time must be after start time".to_string())
    } else {
        Ok(())
    }
}

pub fn capacity(capacity: i32) -> Validation {
    if capacity < 1 {
        Err("Capacity must be at least 1".to_string())
    } else if capacity > 10_000 {
        Err("Capacity must be at most 10000".to_string())
    } else {
        Ok(())
    }
}

pub fn signup(req: &SignupRequest) -> Validation {
    email(&req.email)?;
    password(&req.password)?;
    required("Name", &req.full_name)?;
    max_len("Name", req.full_name.trim(), 120)
}

pub fn plant(input: &PlantInput) -> Validation {
    required("Common name", &input.common_name)?;
    max_len("Common name", input.common_name.trim(), 120)?;
    if let Some(name) = &input.scientific_name {
        max_len("Scientific name", name, 160)?;
    }
    if let Some(description) = &input.description {
        max_len("Description", description, 5000)?;
    }
    optional_url("Image URL", input.image_url.as_deref())
}

pub fn event(input: &EventInput) -> Validation {
    required("Title", &input.title)?;
    max_len("Title", input.title.trim(), 160)?;
    if let Some(description) = &input.description {
        max_len("Description", description, 5000)?;
    }
    if let Some(location) = &input.location {
        max_len("Location", location, 200)?;
    }
    event_times(input.start_time, input.end_time)?;
    capacity(input.capacity)?;
    optional_url("Image URL", input.image_url.as_deref())
}

pub fn profile(update: &ProfileUpdate) -> Validation {
    if let Some(name) = &update.full_name {
        max_len("Name", name.trim(), 120)?;
    }
    if let Some(phone) = &update.phone {
        max_len("Phone", phone.trim(), 32)?;
    }
    if let Some(student_id) = &update.student_id {
        max_len("Student ID", student_id.trim(), 32)?;
    }
    if let Some(bio) = &update.bio {
        max_len("Bio", bio, 1000)?;
    }
    optional_url("Avatar URL", update.avatar_url.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, EventCategory};
    use chrono::Duration;

    #[test]
    fn email_shapes() {
        assert!(email("ada@ytt.org").is_ok());
        assert!(email("  ada@ytt.org ").is_ok());
        assert!(email("ada").is_err());
        assert!(email("@ytt.org").is_err());
        assert!(email("ada@localhost").is_err());
        assert!(email("ada@.org").is_err());
        assert!(email("a da@ytt.org").is_err());
        assert_eq!(normalize_email(" Ada@YTT.org "), "ada@ytt.org");
    }

    #[test]
    fn password_length_bounds() {
        assert!(password("short").is_err());
        assert!(password("longenough").is_ok());
        assert!(password(&"x".repeat(129)).is_err());
    }

    #[test]
    fn urls_must_be_http() {
        assert!(optional_url("Image URL", None).is_ok());
        assert!(optional_url("Image URL", Some("  ")).is_ok());
        assert!(optional_url("Image URL", Some("https://img.example/x.png")).is_ok());
        assert_eq!(
            optional_url("Image URL", Some("javascript:alert(1)")),
            Err("Image URL must be an http(s) URL".to_string())
        );
    }

    #[test]
    fn event_requires_ordered_times_and_capacity() {
        let start = Utc::now();
        let mut input = EventInput {
            title: "Pruning workshop".into(),
            description: None,
            location: None,
            category: EventCategory::Workshop,
            difficulty: Difficulty::Intermediate,
            start_time: start,
            end_time: start + Duration::hours(1),
            capacity: 12,
            image_url: None,
            is_published: true,
        };
        assert!(event(&input).is_ok());

        input.end_time = start;
        assert_eq!(
            event(&input),
            Err("End time must be after start time".to_string())
        );

        input.end_time = start + Duration::hours(1);
        input.capacity = 0;
        assert!(event(&input).is_err());
    }

    #[test]
    fn signup_checks_every_field() {
        let req = SignupRequest {
            email: "ada@ytt.org".into(),
            password: "correct horse".into(),
            full_name: " ".into(),
        };
        assert_eq!(signup(&req), Err("Name is required".to_string()));
    }
}
