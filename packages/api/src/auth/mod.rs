//! Authentication: local passwords, session tokens, and GitHub/Google OAuth.

mod config;
mod extract;
mod github;
mod google;
mod oauth;
mod password;
mod session;

pub use config::{callback_url, OAuthConfig};
pub use extract::{clear_session_cookie, session_cookie, session_token, AdminUser, CurrentUser, MaybeUser};
pub use github::GitHubOAuth;
pub use google::GoogleOAuth;
pub use oauth::{complete_login, login_url, Provider};
pub use password::{hash_password, hash_password_async, verify_password, verify_password_async};
pub use session::{SessionClaims, SessionManager, SESSION_COOKIE};
