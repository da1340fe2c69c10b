use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::SessionManager;
use crate::config::Settings;
use crate::crypto::SealingKey;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub settings: Arc<Settings>,
    pub sessions: SessionManager,
}

impl AppState {
    /// Fails only when a configured session key is malformed.
    pub fn new(pool: PgPool, settings: Settings) -> Result<Self, String> {
        let key = if settings.session.key.trim().is_empty() {
            tracing::warn!("session.key not set, using an ephemeral key; sessions end on restart");
            SealingKey::generate()
        } else {
            SealingKey::from_hex(&settings.session.key)?
        };
        let sessions = SessionManager::new(key, chrono::Duration::hours(settings.session.ttl_hours));

        Ok(Self {
            pool,
            settings: Arc::new(settings),
            sessions,
        })
    }
}
