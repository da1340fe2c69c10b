//! # Repositories
//!
//! Parameterized SQL, one submodule per table family. Functions take a
//! [`PgPool`](sqlx::PgPool), or a `&mut PgConnection` when they are meant to
//! run inside a caller's transaction, and return [`crate::error::Result`].
//!
//! | Module | Tables |
//! |--------|--------|
//! | [`users`] | `user_profiles` (plus the admin dashboard counters) |
//! | [`plants`] | `plants` |
//! | [`events`] | `events`, `event_registrations` |
//! | [`notifications`] | `notifications` |

pub mod events;
pub mod notifications;
pub mod plants;
pub mod users;

/// Build an `ILIKE` pattern matching `search` anywhere, with `%`, `_` and `\`
/// taken literally. Blank input yields `None`.
pub(crate) fn like_pattern(search: Option<&str>) -> Option<String> {
    let search = search.map(str::trim).filter(|s| !s.is_empty())?;
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    Some(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern(Some(" basil ")).as_deref(), Some("%basil%"));
        assert_eq!(like_pattern(Some("50%_off")).as_deref(), Some("%50\\%\\_off%"));
        assert_eq!(like_pattern(Some("   ")), None);
        assert_eq!(like_pattern(None), None);
    }
}
