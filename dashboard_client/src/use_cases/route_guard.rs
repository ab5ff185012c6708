use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;

use crate::domain::{
    AuthError, AuthStatus, NavigateOptions, Navigator, Route, SessionApi, SessionIdentity,
};

/// Anything that can be shown once a session is verified.
pub trait ProtectedView: Send + Sync {
    type Output;

    fn render(&self, identity: &SessionIdentity) -> Self::Output;
}

impl<F, O> ProtectedView for F
where
    F: Fn(&SessionIdentity) -> O + Send + Sync,
{
    type Output = O;

    fn render(&self, identity: &SessionIdentity) -> O {
        self(identity)
    }
}

// What a guard puts on screen for its current status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardRender<O> {
    // Neutral spinner while the verdict is pending.
    Loading,
    Content(O),
    // Unauthenticated; the redirect has already been issued.
    Nothing,
}

/// Gates a protected view on a verified session.
///
/// A guard lives for one mount of one protected route. It checks the backend
/// at most once, and not at all when the previous navigation handed over an
/// identity: a check racing a fresh exchange can come back unauthenticated on
/// some backends and bounce a logged-in user out again.
pub struct RouteGuard<A, N, V> {
    api: A,
    navigator: N,
    view: V,
    status: watch::Sender<AuthStatus>,
    probing: AtomicBool,
    mounted: AtomicBool,
}

impl<A, N, V> RouteGuard<A, N, V>
where
    A: SessionApi,
    N: Navigator,
    V: ProtectedView,
{
    pub fn mount(api: A, navigator: N, view: V, handoff: Option<SessionIdentity>) -> Self {
        let initial = match handoff {
            Some(identity) => AuthStatus::Authenticated(identity),
            None => AuthStatus::Unknown,
        };
        let (status, _) = watch::channel(initial);
        Self {
            api,
            navigator,
            view,
            status,
            probing: AtomicBool::new(false),
            mounted: AtomicBool::new(true),
        }
    }

    pub fn status(&self) -> AuthStatus {
        self.status.borrow().clone()
    }

    // Presenters can await the verdict instead of polling `status`.
    pub fn subscribe(&self) -> watch::Receiver<AuthStatus> {
        self.status.subscribe()
    }

    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
    }

    #[tracing::instrument(name = "route_guard", skip_all)]
    pub async fn resolve(&self) -> AuthStatus {
        if self.status.borrow().is_resolved() {
            return self.status();
        }
        // One identity check per mount, however often resolution is requested.
        if self.probing.swap(true, Ordering::AcqRel) {
            return self.status();
        }

        let result = self.api.current_identity().await;

        if !self.mounted.load(Ordering::Acquire) {
            tracing::debug!("identity check resolved after unmount; ignoring result.");
            return self.status();
        }

        match result {
            Ok(identity) => {
                self.settle(AuthStatus::Authenticated(identity));
            }
            Err(err) => {
                log_check_failure(&err);
                if self.settle(AuthStatus::Unauthenticated) {
                    self.navigator
                        .navigate(Route::PUBLIC_ENTRY, NavigateOptions::replace());
                }
            }
        }
        self.status()
    }

    pub fn render(&self) -> GuardRender<V::Output> {
        match &*self.status.borrow() {
            AuthStatus::Unknown => GuardRender::Loading,
            AuthStatus::Authenticated(identity) => GuardRender::Content(self.view.render(identity)),
            AuthStatus::Unauthenticated => GuardRender::Nothing,
        }
    }

    // Only `Unknown` may transition; returns whether this call did it.
    fn settle(&self, verdict: AuthStatus) -> bool {
        self.status.send_if_modified(|status| {
            if status.is_resolved() {
                return false;
            }
            *status = verdict;
            true
        })
    }
}

fn log_check_failure(err: &AuthError) {
    match err {
        AuthError::Unauthorized { .. } => tracing::debug!(error = %err, "no active session."),
        AuthError::Transport(_) | AuthError::Decode(_) => {
            tracing::error!(error = %err, "session check failed.")
        }
        _ => tracing::warn!(error = %err, "session check rejected."),
    }
}
