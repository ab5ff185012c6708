use serde::{Deserialize, Serialize};

// Body of the session exchange call.
#[derive(Debug, Serialize)]
pub struct SessionExchangeRequest<'a> {
    // One-time token copied out of the callback fragment.
    pub session_id: &'a str,
}

// Error envelope used by the backend for 4xx/5xx responses.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}
