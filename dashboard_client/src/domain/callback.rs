use std::fmt;

use crate::domain::errors::AuthError;

// Fragment key the identity provider appends on its redirect back to us.
pub const SESSION_ID_KEY: &str = "session_id=";

// Trigger check for the callback path. Must run before any route matching.
pub fn is_callback_fragment(fragment: &str) -> bool {
    fragment.contains(SESSION_ID_KEY)
}

/// One-time token handed over by the identity provider in the URL fragment.
///
/// It is consumed by exactly one exchange call and never stored.
#[derive(Clone, PartialEq, Eq)]
pub struct CallbackToken(String);

impl CallbackToken {
    /// Extract the value between `session_id=` and the next `&` (or the end of
    /// the fragment). An occurrence with an empty value is skipped, so the
    /// fragment is malformed only when no occurrence carries a value.
    pub fn from_fragment(fragment: &str) -> Result<Self, AuthError> {
        fragment
            .match_indices(SESSION_ID_KEY)
            .map(|(start, key)| {
                let rest = &fragment[start + key.len()..];
                rest.split('&').next().unwrap_or_default()
            })
            .find(|value| !value.is_empty())
            .map(|value| CallbackToken(value.to_string()))
            .ok_or(AuthError::MalformedCallback)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens are credentials; keep them out of logs.
impl fmt::Debug for CallbackToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CallbackToken(<redacted>)")
    }
}
