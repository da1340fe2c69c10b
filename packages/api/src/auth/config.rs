//! OAuth provider configuration, read from [`Settings`].

use oauth2::{AuthUrl, ClientId, ClientSecret, RedirectUrl, TokenUrl};

use crate::config::Settings;
use crate::error::ApiError;

/// OAuth provider configuration.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: ClientId,
    pub client_secret: ClientSecret,
    pub auth_url: AuthUrl,
    pub token_url: TokenUrl,
    pub redirect_url: RedirectUrl,
}

impl OAuthConfig {
    /// GitHub OAuth config. Errors if no client id/secret is configured.
    pub fn github(settings: &Settings) -> Result<Self, ApiError> {
        Self::build(
            "github",
            &settings.oauth.github_client_id,
            &settings.oauth.github_client_secret,
            "https://github.com/login/oauth/authorize",
            "https://github.com/login/oauth/access_token",
            &settings.oauth.public_url,
        )
    }

    /// Google OAuth config. Errors if no client id/secret is configured.
    pub fn google(settings: &Settings) -> Result<Self, ApiError> {
        Self::build(
            "google",
            &settings.oauth.google_client_id,
            &settings.oauth.google_client_secret,
            "https://accounts.google.com/o/oauth2/v2/auth",
            "https://oauth2.googleapis.com/token",
            &settings.oauth.public_url,
        )
    }

    fn build(
        provider: &str,
        client_id: &str,
        client_secret: &str,
        auth_url: &str,
        token_url: &str,
        public_url: &str,
    ) -> Result<Self, ApiError> {
        if client_id.trim().is_empty() || client_secret.trim().is_empty() {
            return Err(ApiError::Validation(format!(
                "{provider} login is not configured"
            )));
        }
        let invalid = |e: oauth2::url::ParseError| ApiError::Internal(e.to_string());

        Ok(Self {
            client_id: ClientId::new(client_id.trim().to_string()),
            client_secret: ClientSecret::new(client_secret.trim().to_string()),
            auth_url: AuthUrl::new(auth_url.to_string()).map_err(invalid)?,
            token_url: TokenUrl::new(token_url.to_string()).map_err(invalid)?,
            redirect_url: RedirectUrl::new(callback_url(public_url, provider)).map_err(invalid)?,
        })
    }
}

/// Where a provider sends the browser back to.
pub fn callback_url(public_url: &str, provider: &str) -> String {
    format!("{}/auth/{provider}/callback", public_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_url_trims_trailing_slash() {
        assert_eq!(
            callback_url("https://ytt.example/", "github"),
            "https://ytt.example/auth/github/callback"
        );
    }

    #[test]
    fn unconfigured_provider_is_rejected() {
        let err = OAuthConfig::build("google", "", "", "https://a", "https://b", "http://x")
            .unwrap_err();
        assert_eq!(err.to_string(), "google login is not configured");
    }
}
