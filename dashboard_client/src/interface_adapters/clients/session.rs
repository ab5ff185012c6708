use async_trait::async_trait;
use reqwest::StatusCode;

use crate::domain::{AuthError, CallbackToken, SessionApi, SessionIdentity};
use crate::interface_adapters::clients::backend::{BackendClient, BackendError};
use crate::interface_adapters::protocol::SessionExchangeRequest;

// Which call failed decides how a non-success status is classified.
#[derive(Clone, Copy)]
enum SessionCall {
    Exchange,
    CurrentIdentity,
    Logout,
}

fn map_backend_error(err: BackendError, call: SessionCall) -> AuthError {
    match err {
        BackendError::Transport(err) => AuthError::Transport(err.to_string()),
        BackendError::Decode(err) => AuthError::Decode(err.to_string()),
        BackendError::Upstream { status, message } => match call {
            SessionCall::Exchange => AuthError::ExchangeRejected {
                status: status.as_u16(),
                message,
            },
            SessionCall::CurrentIdentity | SessionCall::Logout
                if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN =>
            {
                AuthError::Unauthorized { message }
            }
            SessionCall::CurrentIdentity | SessionCall::Logout => AuthError::Upstream {
                status: status.as_u16(),
                message,
            },
        },
    }
}

#[async_trait]
impl SessionApi for BackendClient {
    async fn exchange_session(&self, token: &CallbackToken) -> Result<SessionIdentity, AuthError> {
        // The response sets the session cookie; the cookie store keeps it.
        self.post_json(
            "/auth/session",
            &SessionExchangeRequest {
                session_id: token.as_str(),
            },
        )
        .await
        .map_err(|err| map_backend_error(err, SessionCall::Exchange))
    }

    async fn current_identity(&self) -> Result<SessionIdentity, AuthError> {
        self.get_json("/auth/me")
            .await
            .map_err(|err| map_backend_error(err, SessionCall::CurrentIdentity))
    }

    async fn logout(&self) -> Result<(), AuthError> {
        self.post_empty("/auth/logout")
            .await
            .map_err(|err| map_backend_error(err, SessionCall::Logout))
    }
}
