//! Data models for the application.
//!
//! Row types that only exist on the server (`UserProfile`) are gated behind the
//! `server` feature; everything else crosses the wire and compiles everywhere.

/// Declares a string-backed enum stored in a `TEXT` column.
///
/// Generates `as_str`, `Display`, `FromStr`, serde by the given text and, on
/// the server, sqlx encode/decode against Postgres `TEXT`.
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(format!("invalid {}: '{}'", stringify!($name), other)),
                }
            }
        }

        #[cfg(feature = "server")]
        impl sqlx::Type<sqlx::Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "server")]
        impl<'r> sqlx::Decode<'r, sqlx::Postgres> for $name {
            fn decode(
                value: sqlx::postgres::PgValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let text = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
                Ok(text.parse::<$name>()?)
            }
        }

        #[cfg(feature = "server")]
        impl<'q> sqlx::Encode<'q, sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut sqlx::postgres::PgArgumentBuffer,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <&str as sqlx::Encode<sqlx::Postgres>>::encode(self.as_str(), buf)
            }
        }
    };
}

mod admin;
mod event;
mod notification;
mod plant;
mod user;

pub use admin::{AdminStats, RoleUpdate};
pub use event::{
    Difficulty, Event, EventCategory, EventFilter, EventInput, MyRegistration, Registrant,
    Registration, RegistrationStatus,
};
pub use notification::{
    AdminNotification, Audience, Broadcast, BroadcastResult, Notification, NotificationType,
    UnreadCount,
};
pub use plant::{CareLevel, Plant, PlantFilter, PlantInput, Season};
#[cfg(feature = "server")]
pub use user::UserProfile;
pub use user::{
    AuthSession, LoginRequest, PasswordChange, ProfileUpdate, Role, SignupRequest, UserInfo,
};
