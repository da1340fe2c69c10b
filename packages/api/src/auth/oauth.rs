//! Provider-independent parts of the OAuth flow.
//!
//! The CSRF state and PKCE verifier of a pending login are stored in
//! `oauth_states` for ten minutes and consumed exactly once by the callback.

use std::str::FromStr;

use oauth2::basic::BasicClient;
use oauth2::{EndpointNotSet, EndpointSet};
use sqlx::PgPool;

use super::config::OAuthConfig;
use super::github::GitHubOAuth;
use super::google::GoogleOAuth;
use crate::config::Settings;
use crate::error::ApiError;
use crate::models::UserProfile;

/// OAuth client type with auth URL and token URL set.
pub(crate) type ConfiguredClient = oauth2::Client<
    oauth2::basic::BasicErrorResponse,
    oauth2::basic::BasicTokenResponse,
    oauth2::basic::BasicTokenIntrospectionResponse,
    oauth2::StandardRevocableToken,
    oauth2::basic::BasicRevocationErrorResponse,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

pub(crate) fn create_client(config: &OAuthConfig) -> ConfiguredClient {
    BasicClient::new(config.client_id.clone())
        .set_client_secret(config.client_secret.clone())
        .set_auth_uri(config.auth_url.clone())
        .set_token_uri(config.token_url.clone())
        .set_redirect_uri(config.redirect_url.clone())
}

/// HTTP client for the token exchange. Redirects are disabled to avoid SSRF.
pub(crate) fn token_http_client() -> Result<reqwest::Client, ApiError> {
    reqwest::ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .map_err(|e| ApiError::Internal(e.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    GitHub,
    Google,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::GitHub => "github",
            Provider::Google => "google",
        }
    }
}

impl FromStr for Provider {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "github" => Ok(Provider::GitHub),
            "google" => Ok(Provider::Google),
            other => Err(ApiError::Validation(format!("Unknown provider: {}", other))),
        }
    }
}

/// Build the authorization URL for `provider` and remember its PKCE verifier.
pub async fn login_url(
    provider: Provider,
    settings: &Settings,
    pool: &PgPool,
) -> Result<String, ApiError> {
    match provider {
        Provider::GitHub => GitHubOAuth::new(settings)?.generate_auth_url(pool).await,
        Provider::Google => GoogleOAuth::new(settings)?.generate_auth_url(pool).await,
    }
}

/// Finish a login: validate state, exchange the code, upsert the profile.
pub async fn complete_login(
    provider: Provider,
    settings: &Settings,
    pool: &PgPool,
    code: &str,
    state: &str,
) -> Result<UserProfile, ApiError> {
    match provider {
        Provider::GitHub => GitHubOAuth::new(settings)?.exchange_code(pool, code, state).await,
        Provider::Google => GoogleOAuth::new(settings)?.exchange_code(pool, code, state).await,
    }
}

pub(crate) async fn store_state(
    pool: &PgPool,
    provider: Provider,
    state: &str,
    verifier: &str,
) -> Result<(), ApiError> {
    sqlx::query(
        r#"
        INSERT INTO oauth_states (state, provider, pkce_verifier, expires_at)
        VALUES ($1, $2, $3, NOW() + INTERVAL '10 minutes')
        "#,
    )
    .bind(state)
    .bind(provider.as_str())
    .bind(verifier)
    .execute(pool)
    .await?;

    // Opportunistic cleanup of abandoned logins.
    sqlx::query("DELETE FROM oauth_states WHERE expires_at < NOW()")
        .execute(pool)
        .await?;
    Ok(())
}

/// Retrieve and delete the verifier for `state`. Expired or unknown states fail.
pub(crate) async fn take_state(
    pool: &PgPool,
    provider: Provider,
    state: &str,
) -> Result<String, ApiError> {
    let row: Option<(String,)> = sqlx::query_as(
        r#"
        DELETE FROM oauth_states
        WHERE state = $1 AND provider = $2 AND expires_at > NOW()
        RETURNING pkce_verifier
        "#,
    )
    .bind(state)
    .bind(provider.as_str())
    .fetch_optional(pool)
    .await?;

    row.map(|(verifier,)| verifier)
        .ok_or_else(|| ApiError::OAuth("Invalid or expired OAuth state".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_names() {
        assert_eq!("github".parse::<Provider>().unwrap(), Provider::GitHub);
        assert_eq!(Provider::Google.as_str(), "google");
        assert!(matches!(
            "myspace".parse::<Provider>(),
            Err(ApiError::Validation(_))
        ));
    }
}
