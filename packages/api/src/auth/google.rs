//! # Google OAuth 2.0
//!
//! Same shape as [`super::github`], against Google's endpoints with the
//! `openid`, `email` and `profile` scopes. The profile comes from the
//! `oauth2/v2/userinfo` endpoint; unverified Google emails are refused because
//! the email is what links a Google identity to an existing local account.

use oauth2::{AuthorizationCode, CsrfToken, PkceCodeChallenge, PkceCodeVerifier, Scope, TokenResponse};
use reqwest::Client;
use serde::Deserialize;
use sqlx::PgPool;

use super::config::OAuthConfig;
use super::oauth::{create_client, store_state, take_state, token_http_client, Provider};
use crate::config::Settings;
use crate::error::ApiError;
use crate::models::{Role, UserProfile};
use crate::repo::users::{self, OAuthIdentity};

/// Google user info from API.
#[derive(Debug, Deserialize)]
struct GoogleUser {
    id: String,
    email: String,
    #[serde(default)]
    verified_email: Option<bool>,
    name: Option<String>,
    picture: Option<String>,
}

impl GoogleUser {
    /// Only an explicit `verified_email: true` counts.
    fn is_verified(&self) -> bool {
        self.verified_email == Some(true)
    }
}

pub struct GoogleOAuth {
    config: OAuthConfig,
    bootstrap: crate::config::Admin,
}

impl GoogleOAuth {
    pub fn new(settings: &Settings) -> Result<Self, ApiError> {
        Ok(Self {
            config: OAuthConfig::google(settings)?,
            bootstrap: settings.admin.clone(),
        })
    }

    /// Generate authorization URL with PKCE.
    pub async fn generate_auth_url(&self, pool: &PgPool) -> Result<String, ApiError> {
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let (auth_url, csrf_state) = create_client(&self.config)
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new("openid".to_string()))
            .add_scope(Scope::new("email".to_string()))
            .add_scope(Scope::new("profile".to_string()))
            .set_pkce_challenge(pkce_challenge)
            .url();

        store_state(pool, Provider::Google, csrf_state.secret(), pkce_verifier.secret()).await?;
        Ok(auth_url.to_string())
    }

    /// Exchange authorization code for tokens and get user info.
    pub async fn exchange_code(
        &self,
        pool: &PgPool,
        code: &str,
        state: &str,
    ) -> Result<UserProfile, ApiError> {
        let pkce_verifier = take_state(pool, Provider::Google, state).await?;

        let token_result = create_client(&self.config)
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .set_pkce_verifier(PkceCodeVerifier::new(pkce_verifier))
            .request_async(&token_http_client()?)
            .await
            .map_err(|e| ApiError::OAuth(format!("Token exchange failed: {}", e)))?;

        let google_user: GoogleUser = Client::new()
            .get("https://www.googleapis.com/oauth2/v2/userinfo")
            .bearer_auth(token_result.access_token().secret())
            .send()
            .await
            .map_err(|e| ApiError::OAuth(e.to_string()))?
            .json()
            .await
            .map_err(|e| ApiError::OAuth(e.to_string()))?;

        if !google_user.is_verified() {
            return Err(ApiError::OAuth("Google email is not verified".to_string()));
        }

        let role = if self.bootstrap.is_bootstrap(&google_user.email) {
            Role::Admin
        } else {
            Role::User
        };
        let identity = OAuthIdentity {
            provider: Provider::Google.as_str(),
            provider_id: google_user.id,
            email: google_user.email,
            full_name: google_user.name,
            avatar_url: google_user.picture,
        };
        let user = users::upsert_oauth(pool, &identity, role).await?;
        tracing::info!(user_id = %user.id, "google login");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(json: &str) -> GoogleUser {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn only_explicitly_verified_email_is_accepted() {
        assert!(user(r#"{"id": "1", "email": "a@example.com", "verified_email": true}"#).is_verified());
        assert!(!user(r#"{"id": "2", "email": "b@example.com", "verified_email": false}"#).is_verified());
        assert!(!user(r#"{"id": "3", "email": "c@example.com"}"#).is_verified());
    }
}
