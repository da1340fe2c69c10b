//! # Session tokens
//!
//! A session token is a handcrafted, stateless credential: the claims below,
//! serialized as JSON, sealed with [`SealingKey`] and encoded as unpadded
//! base64url so it fits in a header or a cookie.
//!
//! ```text
//! token = base64url( nonce || AES-256-GCM(key, {"sub","email","role","iat","exp"}) )
//! ```
//!
//! Verification rejects malformed encodings, anything the key did not seal,
//! and tokens whose `exp` is not in the future. There is no server-side
//! session table; logging out only drops the cookie.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::crypto::SealingKey;
use crate::error::ApiError;
use crate::models::{Role, UserProfile};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "ytt_session";

/// Claims carried inside a session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: Uuid,
    pub email: String,
    pub role: Role,
    /// Issued at, unix seconds.
    pub iat: i64,
    /// Expires at, unix seconds.
    pub exp: i64,
}

impl SessionClaims {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0).single().unwrap_or_default()
    }
}

/// Issues and verifies session tokens.
#[derive(Debug, Clone)]
pub struct SessionManager {
    key: SealingKey,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(key: SealingKey, ttl: Duration) -> Self {
        Self { key, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `user`, valid for the configured TTL from `now`.
    pub fn issue(
        &self,
        user: &UserProfile,
        now: DateTime<Utc>,
    ) -> Result<(String, DateTime<Utc>), ApiError> {
        let expires_at = now + self.ttl;
        let claims = SessionClaims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        Ok((self.encode(&claims)?, expires_at))
    }

    pub fn encode(&self, claims: &SessionClaims) -> Result<String, ApiError> {
        let json = serde_json::to_vec(claims).map_err(|e| ApiError::Internal(e.to_string()))?;
        let sealed = self.key.seal(&json).map_err(ApiError::Internal)?;
        Ok(URL_SAFE_NO_PAD.encode(sealed))
    }

    /// Check a token and return its claims.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, ApiError> {
        let invalid = || ApiError::Unauthorized("Invalid session".to_string());

        let sealed = URL_SAFE_NO_PAD
            .decode(token.trim().as_bytes())
            .map_err(|_| invalid())?;
        let json = self.key.open(&sealed).map_err(|_| invalid())?;
        let claims: SessionClaims = serde_json::from_slice(&json).map_err(|_| invalid())?;

        if claims.exp <= now.timestamp() {
            return Err(ApiError::Unauthorized("Session expired".to_string()));
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> UserProfile {
        let now = Utc::now();
        UserProfile {
            id: Uuid::new_v4(),
            email: "fern@ytt.org".into(),
            password_hash: None,
            role,
            full_name: Some("Fern".into()),
            phone: None,
            student_id: None,
            bio: None,
            avatar_url: None,
            provider: "local".into(),
            provider_id: None,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    fn manager() -> SessionManager {
        SessionManager::new(SealingKey::generate(), Duration::hours(24))
    }

    #[test]
    fn issued_token_verifies() {
        let sessions = manager();
        let profile = user(Role::Admin);
        let now = Utc::now();
        let (token, expires_at) = sessions.issue(&profile, now).unwrap();

        let claims = sessions.verify(&token, now).unwrap();
        assert_eq!(claims.sub, profile.id);
        assert_eq!(claims.email, "fern@ytt.org");
        assert!(claims.is_admin());
        assert_eq!(claims.expires_at().timestamp(), expires_at.timestamp());
        assert!(!token.contains('=') && !token.contains('+') && !token.contains('/'));
    }

    #[test]
    fn expired_token_is_rejected() {
        let sessions = manager();
        let now = Utc::now();
        let (token, _) = sessions.issue(&user(Role::User), now).unwrap();

        let err = sessions.verify(&token, now + Duration::hours(25)).unwrap_err();
        assert_eq!(err.to_string(), "Session expired");
        // exactly at expiry counts as expired
        assert!(sessions.verify(&token, now + Duration::hours(24)).is_err());
    }

    #[test]
    fn forged_claims_are_rejected() {
        let sessions = manager();
        let forged = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(&SessionClaims {
                sub: Uuid::new_v4(),
                email: "mallory@ytt.org".into(),
                role: Role::Admin,
                iat: 0,
                exp: i64::MAX,
            })
            .unwrap(),
        );
        assert_eq!(
            sessions.verify(&forged, Utc::now()).unwrap_err().to_string(),
            "Invalid session"
        );
    }

    #[test]
    fn token_from_other_key_is_rejected() {
        let now = Utc::now();
        let (token, _) = manager().issue(&user(Role::User), now).unwrap();
        assert!(manager().verify(&token, now).is_err());
        assert!(manager().verify("%%%not-base64%%%", now).is_err());
        assert!(manager().verify("", now).is_err());
    }
}
