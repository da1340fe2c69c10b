//! Access to the shared [`ApiClient`].

use api::ApiClient;
use dioxus::prelude::*;

/// Origin the backend is served from.
///
/// In the browser this is the page's own origin, so the session cookie is
/// sent with every request. Elsewhere it falls back to the dev server address.
pub fn api_base_url() -> String {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(origin) = web_sys::window().and_then(|w| w.location().origin().ok()) {
            return origin;
        }
    }
    "http://localhost:8080".to_string()
}

/// The client provided by [`AuthProvider`](crate::AuthProvider).
pub fn use_api() -> ApiClient {
    use_context::<ApiClient>()
}
