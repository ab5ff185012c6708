use std::fmt;

// Failures of the session contract. Every variant ends the same way for the
// user (a redirect to the public entry point); the split exists for logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    // Fragment matched `session_id=` but carried no usable value.
    MalformedCallback,
    // Backend declined the callback token (expired, reused or invalid).
    ExchangeRejected {
        status: u16,
        message: Option<String>,
    },
    // No valid session cookie on the identity check or logout call.
    Unauthorized {
        message: Option<String>,
    },
    Upstream {
        status: u16,
        message: Option<String>,
    },
    Transport(String),
    Decode(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MalformedCallback => write!(f, "malformed session callback"),
            AuthError::ExchangeRejected { status, message } => match message {
                Some(message) => write!(f, "session exchange rejected {status}: {message}"),
                None => write!(f, "session exchange rejected {status}"),
            },
            AuthError::Unauthorized { message } => match message {
                Some(message) => write!(f, "unauthorized: {message}"),
                None => write!(f, "unauthorized"),
            },
            AuthError::Upstream { status, message } => match message {
                Some(message) => write!(f, "auth upstream error {status}: {message}"),
                None => write!(f, "auth upstream error {status}"),
            },
            AuthError::Transport(err) => write!(f, "auth transport error: {err}"),
            AuthError::Decode(err) => write!(f, "auth response decode error: {err}"),
        }
    }
}

impl std::error::Error for AuthError {}

// Failures of the credentialed data calls made by dashboard pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    Unauthorized,
    Upstream {
        status: u16,
        message: Option<String>,
    },
    Transport(String),
    Decode(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized => write!(f, "not authenticated"),
            ApiError::Upstream { status, message } => match message {
                Some(message) => write!(f, "api error {status}: {message}"),
                None => write!(f, "api error {status}"),
            },
            ApiError::Transport(err) => write!(f, "api transport error: {err}"),
            ApiError::Decode(err) => write!(f, "api response decode error: {err}"),
        }
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_upstream_message_is_present_then_display_includes_it() {
        let err = AuthError::ExchangeRejected {
            status: 401,
            message: Some("Invalid session ID".to_string()),
        };

        assert_eq!(
            err.to_string(),
            "session exchange rejected 401: Invalid session ID"
        );
    }

    #[test]
    fn when_api_upstream_has_no_message_then_display_shows_status_only() {
        let err = ApiError::Upstream {
            status: 502,
            message: None,
        };

        assert_eq!(err.to_string(), "api error 502");
    }
}
