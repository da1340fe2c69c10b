use api::{validate, SignupRequest};
use dioxus::prelude::*;
use ui::{use_api, use_auth, AuthState, ErrorBanner};

use crate::Route;

#[component]
pub fn Signup() -> Element {
    let api = use_api();
    let mut auth = use_auth();
    let nav = use_navigator();
    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut confirm_password = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    if !auth().loading && auth().user.is_some() {
        nav.replace(Route::Home {});
    }

    let handle_signup = move |evt: FormEvent| {
        evt.prevent_default();
        let api = api.clone();
        async move {
            error.set(None);

            let req = SignupRequest {
                email: email().trim().to_string(),
                password: password(),
                full_name: name().trim().to_string(),
            };
            if let Err(message) = validate::signup(&req) {
                error.set(Some(message));
                return;
            }
            if req.password != confirm_password() {
                error.set(Some("Passwords do not match".to_string()));
                return;
            }

            loading.set(true);
            match api.signup(&req).await {
                Ok(session) => {
                    auth.set(AuthState::signed_in(session.user));
                    nav.push(Route::Home {});
                }
                Err(e) => error.set(Some(e.to_string())),
            }
            loading.set(false);
        }
    };

    rsx! {
        div {
            class: "page page-auth",
            h1 { "Create an account" }
            ErrorBanner { message: error(), on_dismiss: move |_| error.set(None) }

            form {
                class: "form",
                onsubmit: handle_signup,
                label {
                    class: "field",
                    span { "Full name" }
                    input {
                        r#type: "text",
                        autocomplete: "name",
                        value: "{name}",
                        oninput: move |e| name.set(e.value()),
                    }
                }
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
                        autocomplete: "new-password",
                        value: "{password}",
                        oninput: move |e| password.set(e.value()),
                    }
                }
                label {
                    class: "field",
                    span { "Confirm password" }
                    input {
                        r#type: "password",
                        autocomplete: "new-password",
                        value: "{confirm_password}",
                        oninput: move |e| confirm_password.set(e.value()),
                    }
                }
                button {
                    r#type: "submit",
                    class: "btn btn-primary",
                    disabled: loading(),
                    if loading() { "Creating account..." } else { "Sign up" }
                }
            }

            p {
                class: "muted",
                "Already have an account? "
                Link { to: Route::Login { error: String::new() }, "Log in" }
            }
        }
    }
}
