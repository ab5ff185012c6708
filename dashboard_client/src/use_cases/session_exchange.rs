use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::{
    AuthError, CallbackToken, NavigateOptions, Navigator, Route, SessionApi, SessionIdentity,
};

// Result of one `process` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeOutcome {
    // The latch was already set; nothing was sent.
    Skipped,
    Established(SessionIdentity),
    Failed(AuthError),
    // The exchanger was unmounted before the call resolved.
    Abandoned,
}

/// Turns an identity-provider callback into an established session.
///
/// One instance belongs to one page load. Its latch is flipped before the
/// exchange call is issued, so re-evaluating the callback while the call is
/// pending (a re-render, a second poll) never sends the token twice.
pub struct SessionExchanger<A, N> {
    api: A,
    navigator: N,
    processed: AtomicBool,
    mounted: AtomicBool,
}

impl<A, N> SessionExchanger<A, N>
where
    A: SessionApi,
    N: Navigator,
{
    pub fn new(api: A, navigator: N) -> Self {
        Self {
            api,
            navigator,
            processed: AtomicBool::new(false),
            mounted: AtomicBool::new(true),
        }
    }

    pub fn has_processed(&self) -> bool {
        self.processed.load(Ordering::Acquire)
    }

    // Detach from navigation; a pending exchange resolves into a no-op.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
    }

    #[tracing::instrument(name = "session_exchange", skip_all)]
    pub async fn process(&self) -> ExchangeOutcome {
        // Latch first, before anything can suspend.
        if self.processed.swap(true, Ordering::AcqRel) {
            tracing::debug!("session exchange already started for this page load.");
            return ExchangeOutcome::Skipped;
        }

        let location = self.navigator.location();
        let token = match location.fragment().map(CallbackToken::from_fragment) {
            Some(Ok(token)) => token,
            Some(Err(err)) => return self.fail(err),
            None => return self.fail(AuthError::MalformedCallback),
        };

        let result = self.api.exchange_session(&token).await;

        if !self.mounted.load(Ordering::Acquire) {
            tracing::debug!("session exchange resolved after unmount; ignoring result.");
            return ExchangeOutcome::Abandoned;
        }

        match result {
            Ok(identity) => {
                // Drop the token from the address bar so back/reload cannot replay it.
                self.navigator.replace_url(location.without_fragment());
                self.navigator.navigate(
                    Route::PROTECTED_LANDING,
                    NavigateOptions::replace_with_identity(identity.clone()),
                );
                tracing::info!("session established.");
                ExchangeOutcome::Established(identity)
            }
            Err(err) => self.fail(err),
        }
    }

    fn fail(&self, err: AuthError) -> ExchangeOutcome {
        match &err {
            AuthError::Transport(_) | AuthError::Decode(_) => {
                tracing::error!(error = %err, "session exchange failed.")
            }
            _ => tracing::warn!(error = %err, "session exchange rejected."),
        }
        self.navigator
            .navigate(Route::PUBLIC_ENTRY, NavigateOptions::replace());
        ExchangeOutcome::Failed(err)
    }
}
