use serde::{Deserialize, Serialize};

use super::Role;

/// Counters on the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct AdminStats {
    pub users: i64,
    pub admins: i64,
    pub plants: i64,
    pub upcoming_events: i64,
    pub active_registrations: i64,
    pub unread_notifications: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoleUpdate {
    pub role: Role,
}
