//! # GitHub OAuth 2.0
//!
//! Authorization Code flow with PKCE against GitHub.
//!
//! 1. **[`generate_auth_url`](GitHubOAuth::generate_auth_url)** asks for the
//!    `user:email` and `read:user` scopes and stores the CSRF state + PKCE
//!    verifier through [`super::oauth::store_state`].
//! 2. **[`exchange_code`](GitHubOAuth::exchange_code)** is called from the
//!    `/auth/github/callback` handler. It consumes the state, exchanges the
//!    code, reads `api.github.com/user` (falling back to `/user/emails` for the
//!    primary verified address when the profile email is private) and upserts
//!    the member in `user_profiles`.

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

const USER_AGENT: &str = "YTT-Platform";

/// GitHub user info from API.
#[derive(Debug, Deserialize)]
struct GitHubUser {
    id: i64,
    login: String,
    email: Option<String>,
    name: Option<String>,
    avatar_url: Option<String>,
}

/// GitHub email info from API.
#[derive(Debug, Deserialize)]
struct GitHubEmail {
    email: String,
    primary: bool,
    verified: bool,
}

pub struct GitHubOAuth {
    config: OAuthConfig,
    bootstrap: crate::config::Admin,
}

impl GitHubOAuth {
    pub fn new(settings: &Settings) -> Result<Self, ApiError> {
        Ok(Self {
            config: OAuthConfig::github(settings)?,
            bootstrap: settings.admin.clone(),
        })
    }

    /// Generate authorization URL with PKCE.
    pub async fn generate_auth_url(&self, pool: &PgPool) -> Result<String, ApiError> {
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let (auth_url, csrf_state) = create_client(&self.config)
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new("user:email".to_string()))
            .add_scope(Scope::new("read:user".to_string()))
            .set_pkce_challenge(pkce_challenge)
            .url();

        store_state(pool, Provider::GitHub, csrf_state.secret(), pkce_verifier.secret()).await?;
        Ok(auth_url.to_string())
    }

    /// Exchange authorization code for tokens and get user info.
    pub async fn exchange_code(
        &self,
        pool: &PgPool,
        code: &str,
        state: &str,
    ) -> Result<UserProfile, ApiError> {
        let pkce_verifier = take_state(pool, Provider::GitHub, state).await?;

        let token_result = create_client(&self.config)
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .set_pkce_verifier(PkceCodeVerifier::new(pkce_verifier))
            .request_async(&token_http_client()?)
            .await
            .map_err(|e| ApiError::OAuth(format!("Token exchange failed: {}", e)))?;

        let access_token = token_result.access_token().secret();
        let api_client = Client::new();

        let github_user: GitHubUser = api_client
            .get("https://api.github.com/user")
            .bearer_auth(access_token)
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(oauth_err)?
            .json()
            .await
            .map_err(oauth_err)?;

        let email = match github_user.email {
            Some(email) => email,
            None => {
                let emails: Vec<GitHubEmail> = api_client
                    .get("https://api.github.com/user/emails")
                    .bearer_auth(access_token)
                    .header("User-Agent", USER_AGENT)
                    .send()
                    .await
                    .map_err(oauth_err)?
                    .json()
                    .await
                    .map_err(oauth_err)?;

                primary_verified(emails)
                    .ok_or_else(|| ApiError::OAuth("No verified primary email found".to_string()))?
            }
        };

        let role = if self.bootstrap.is_bootstrap(&email) {
            Role::Admin
        } else {
            Role::User
        };
        let identity = OAuthIdentity {
            provider: Provider::GitHub.as_str(),
            provider_id: github_user.id.to_string(),
            email,
            full_name: github_user.name.or(Some(github_user.login)),
            avatar_url: github_user.avatar_url,
        };
        let user = users::upsert_oauth(pool, &identity, role).await?;
        tracing::info!(user_id = %user.id, "github login");
        Ok(user)
    }
}

fn oauth_err(e: reqwest::Error) -> ApiError {
    ApiError::OAuth(e.to_string())
}

fn primary_verified(emails: Vec<GitHubEmail>) -> Option<String> {
    emails
        .into_iter()
        .find(|e| e.primary && e.verified)
        .map(|e| e.email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_primary_verified_email() {
        let emails: Vec<GitHubEmail> = serde_json::from_str(
            r#"[
                {"email": "old@example.com", "primary": false, "verified": true},
                {"email": "new@example.com", "primary": true, "verified": false},
                {"email": "main@example.com", "primary": true, "verified": true}
            ]"#,
        )
        .unwrap();
        assert_eq!(primary_verified(emails).as_deref(), Some("main@example.com"));
    }

    #[test]
    fn unverified_primary_is_not_used() {
        let emails = vec![GitHubEmail {
            email: "x@example.com".into(),
            primary: true,
            verified: false,
        }];
        assert_eq!(primary_verified(emails), None);
    }
}
