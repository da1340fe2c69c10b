//! Authentication context and hooks for the UI.

use api::{ApiClient, UserInfo};
use dioxus::prelude::*;

use crate::client::api_base_url;

/// Authentication state for the application.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub user: Option<UserInfo>,
    pub loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }
}

impl AuthState {
    pub fn signed_in(user: UserInfo) -> Self {
        Self {
            user: Some(user),
            loading: false,
        }
    }

    pub fn signed_out() -> Self {
        Self {
            user: None,
            loading: false,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.is_admin())
    }
}

/// Get the current authentication state.
/// Returns a signal that updates when the user logs in or out.
pub fn use_auth() -> Signal<AuthState> {
    use_context::<Signal<AuthState>>()
}

/// Provides the [`ApiClient`] and the authentication state to its children.
/// The session is checked once on mount.
#[component]
pub fn AuthProvider(children: Element) -> Element {
    let api = use_context_provider(|| ApiClient::new(api_base_url()));
    let mut auth_state = use_context_provider(|| Signal::new(AuthState::default()));

    use_effect(move || {
        let api = api.clone();
        spawn(async move {
            match api.session().await {
                Ok(Some(user)) => auth_state.set(AuthState::signed_in(user)),
                Ok(None) => auth_state.set(AuthState::signed_out()),
                Err(e) => {
                    tracing::warn!("Session check failed: {}", e);
                    auth_state.set(AuthState::signed_out());
                }
            }
        });
    });

    rsx! {
        {children}
    }
}

/// Button to initiate login with a specific provider.
#[component]
pub fn LoginButton(
    provider: String,
    #[props(default = "Login".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
    #[props(default)] on_error: EventHandler<String>,
) -> Element {
    let api = crate::use_api();
    let mut loading = use_signal(|| false);

    let onclick = move |_| {
        let api = api.clone();
        let provider = provider.clone();
        async move {
            loading.set(true);
            match api.oauth_url(&provider).await {
                Ok(url) => {
                    // Redirect to OAuth provider
                    #[cfg(target_arch = "wasm32")]
                    {
                        if let Some(window) = web_sys::window() {
                            let _ = window.location().set_href(&url);
                        }
                    }
                    #[cfg(not(target_arch = "wasm32"))]
                    tracing::info!("OAuth login URL: {}", url);
                }
                Err(e) => {
                    tracing::error!("Failed to get login URL: {}", e);
                    on_error.call(e.to_string());
                    loading.set(false);
                }
            }
        }
    };

    rsx! {
        button {
            class: "{class}",
            disabled: loading(),
            onclick: onclick,
            if loading() {
                "Redirecting..."
            } else {
                "{label}"
            }
        }
    }
}

/// Button to log out the current user.
#[component]
pub fn LogoutButton(
    #[props(default = "Log out".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let api = crate::use_api();
    let mut auth_state = use_auth();

    let onclick = move |_| {
        let api = api.clone();
        async move {
            if let Err(e) = api.logout().await {
                tracing::warn!("Logout request failed: {}", e);
            }
            // The token is stateless; forgetting it locally is what matters.
            auth_state.set(AuthState::signed_out());
            #[cfg(target_arch = "wasm32")]
            {
                if let Some(window) = web_sys::window() {
                    let _ = window.location().set_href("/login");
                }
            }
        }
    };

    rsx! {
        button {
            class: "{class}",
            onclick: onclick,
            "{label}"
        }
    }
}
