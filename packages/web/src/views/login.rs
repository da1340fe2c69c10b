//! Login page: email and password, or an OAuth provider.

use api::LoginRequest;
use dioxus::prelude::*;
use ui::icons::{FaGithub, FaGoogle};
use ui::{use_api, use_auth, AuthState, ErrorBanner, Icon, LoginButton};

use crate::Route;

/// Text for the `?error=` codes the OAuth callback redirects with.
fn callback_error(code: &str) -> Option<&'static str> {
    match code {
        "" => None,
        "oauth_denied" => Some("Sign-in was cancelled at the provider."),
        "missing_code" => Some("The provider did not return a sign-in code. Please try again."),
        "unknown_provider" => Some("That sign-in provider is not supported."),
        "session_error" => Some("Signed in, but the session could not be started. Please try again."),
        _ => Some("Sign-in with the provider failed. Please try again."),
    }
}

#[component]
pub fn Login(error: String) -> Element {
    let api = use_api();
    let mut auth = use_auth();
    let nav = use_navigator();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut message = use_signal(|| callback_error(&error).map(str::to_string));
    let mut loading = use_signal(|| false);

    // Already signed in
    if !auth().loading && auth().user.is_some() {
        nav.replace(Route::Home {});
    }

    let handle_login = move |evt: FormEvent| {
        evt.prevent_default();
        let api = api.clone();
        async move {
            message.set(None);
            loading.set(true);
            let req = LoginRequest {
                email: email().trim().to_string(),
                password: password(),
            };
            match api.login(&req).await {
                Ok(session) => {
                    auth.set(AuthState::signed_in(session.user));
                    nav.push(Route::Home {});
                }
                Err(e) => message.set(Some(e.to_string())),
            }
            loading.set(false);
        }
    };

    rsx! {
        div {
            class: "page page-auth",
            h1 { "Log in" }
            ErrorBanner { message: message(), on_dismiss: move |_| message.set(None) }

            form {
                class: "form",
                onsubmit: handle_login,
                label {
                    class: "field",
                    span { "Email" }
                    input {
                        r#type: "email",
                        autocomplete: "email",
                        value: "{email}",
                        oninput: move |e| email.set(e.value()),
                    }
                }
                label {
                    class: "field",
                    span { "Password" }
                    input {
                        r#type: "password",
                        autocomplete: "current-password",
                        value: "{password}",
                        oninput: move |e| password.set(e.value()),
                    }
                }
                button {
                    r#type: "submit",
                    class: "btn btn-primary",
                    disabled: loading(),
                    if loading() { "Logging in..." } else { "Log in" }
                }
            }

            div { class: "divider", span { "or" } }

            div {
                class: "oauth-buttons",
                div {
                    class: "oauth-row",
                    Icon { icon: FaGithub, width: 16, height: 16 }
                    LoginButton {
                        provider: "github",
                        label: "Continue with GitHub",
                        class: "btn oauth-btn github-btn",
                        on_error: move |e| message.set(Some(e)),
                    }
                }
                div {
                    class: "oauth-row",
                    Icon { icon: FaGoogle, width: 16, height: 16 }
                    LoginButton {
                        provider: "google",
                        label: "Continue with Google",
                        class: "btn oauth-btn google-btn",
                        on_error: move |e| message.set(Some(e)),
                    }
                }
            }

            p {
                class: "muted",
                "No account yet? "
                Link { to: Route::Signup {}, "Sign up" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_errors_have_messages() {
        assert_eq!(callback_error(""), None);
        assert!(callback_error("oauth_denied").unwrap().contains("cancelled"));
        assert!(callback_error("something_new").is_some());
    }
}
