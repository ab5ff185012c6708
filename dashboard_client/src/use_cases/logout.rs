use crate::domain::{NavigateOptions, Navigator, Route, SessionApi};

// Response returned by the logout use case.
#[derive(Debug, PartialEq, Eq)]
pub struct LogoutResponse {
    // Whether the backend confirmed the session was dropped.
    pub revoked: bool,
}

// Logout use case with injected dependencies.
pub struct LogoutUseCase<A, N> {
    pub api: A,
    pub navigator: N,
}

impl<A, N> LogoutUseCase<A, N>
where
    A: SessionApi,
    N: Navigator,
{
    // Best effort: the client always ends up on the public entry point.
    pub async fn execute(&self) -> LogoutResponse {
        let revoked = match self.api.logout().await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "logout call failed.");
                false
            }
        };
        self.navigator
            .navigate(Route::PUBLIC_ENTRY, NavigateOptions::replace());
        LogoutResponse { revoked }
    }
}
