//! # User profile model
//!
//! Two representations of a platform member:
//!
//! ## [`UserProfile`] (server only)
//!
//! The complete row from the `user_profiles` table, loaded with [`sqlx::FromRow`]:
//!
//! - `id`: primary key (`UUID v4`).
//! - `email`: unique, stored lower-cased.
//! - `password_hash`: Argon2 PHC string. `None` for accounts that only ever
//!   signed in through GitHub or Google.
//! - `role`: [`Role::User`] or [`Role::Admin`].
//! - `full_name`, `phone`, `student_id`, `bio`, `avatar_url`: profile fields the
//!   member edits on the profile page.
//! - `provider` / `provider_id`: `"local"` for email+password accounts, otherwise
//!   the OAuth provider and its user id.
//! - `created_at`, `updated_at`, `last_login_at`: audit timestamps.
//!
//! ## [`UserInfo`]
//!
//! The client-safe projection. It never carries the password hash and is what
//! every endpoint returns when it talks about a user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

text_enum! {
    /// Authorization level of a member.
    pub enum Role {
        User => "user",
        Admin => "admin",
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

/// Full user record from the database.
#[cfg(feature = "server")]
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub password_hash: Option<String>,
    pub role: Role,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub student_id: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub provider: String,
    pub provider_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

#[cfg(feature = "server")]
impl UserProfile {
    /// Convert to UserInfo for client consumption.
    pub fn to_info(&self) -> UserInfo {
        UserInfo {
            id: self.id,
            email: self.email.clone(),
            role: self.role,
            full_name: self.full_name.clone(),
            phone: self.phone.clone(),
            student_id: self.student_id.clone(),
            bio: self.bio.clone(),
            avatar_url: self.avatar_url.clone(),
            provider: self.provider.clone(),
            has_password: self.password_hash.is_some(),
            created_at: self.created_at,
            last_login_at: self.last_login_at,
        }
    }
}

/// User information safe to send to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub student_id: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub provider: String,
    /// Whether the account can log in with a password (and change it).
    pub has_password: bool,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl UserInfo {
    /// Get display name, falling back to email if name is not set.
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.email)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

/// Editable profile fields. `None` leaves a field alone, an empty string clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub student_id: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

/// Returned by login and signup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(full_name: Option<&str>) -> UserInfo {
        UserInfo {
            id: Uuid::new_v4(),
            email: "ada@ytt.org".to_string(),
            role: Role::User,
            full_name: full_name.map(str::to_string),
            phone: None,
            student_id: None,
            bio: None,
            avatar_url: None,
            provider: "local".to_string(),
            has_password: true,
            created_at: Utc::now(),
            last_login_at: None,
        }
    }

    #[test]
    fn display_name_falls_back_to_email() {
        assert_eq!(info(Some("Ada")).display_name(), "Ada");
        assert_eq!(info(None).display_name(), "ada@ytt.org");
        assert_eq!(info(Some("  ")).display_name(), "ada@ytt.org");
    }

    #[test]
    fn role_text_roundtrip() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert!("root".parse::<Role>().is_err());
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(Role::default(), Role::User);
    }
}
