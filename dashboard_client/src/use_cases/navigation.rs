use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::{
    Location, NavigateOptions, Navigator, Route, SessionApi, SessionIdentity, is_callback_fragment,
};
use crate::use_cases::route_guard::{GuardRender, RouteGuard};
use crate::use_cases::session_exchange::SessionExchanger;

// Enough for callback -> landing route -> public entry, with headroom.
const DEFAULT_MAX_HOPS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Callback,
    Public(Route),
    Protected(Route),
    // Unknown path; replaced by the given route.
    Redirect(Route),
}

// Callback detection wins over route matching, whatever the path.
pub fn decide(location: &Location) -> RouteDecision {
    if location.fragment().is_some_and(is_callback_fragment) {
        return RouteDecision::Callback;
    }
    match Route::from_path(location.path()) {
        Some(route) if route.is_protected() => RouteDecision::Protected(route),
        Some(route) => RouteDecision::Public(route),
        None => RouteDecision::Redirect(Route::PUBLIC_ENTRY),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen<O> {
    // Callback in progress (or already handled by this page load).
    Authenticating,
    Landing,
    Protected { route: Route, render: GuardRender<O> },
    Redirecting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    RedirectLoop { hops: usize, last: String },
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationError::RedirectLoop { hops, last } => {
                write!(f, "navigation did not settle after {hops} hops (last at {last})")
            }
        }
    }
}

impl std::error::Error for NavigationError {}

/// Router for one page load.
///
/// A callback location mounts its own exchanger, which stays mounted while
/// the router keeps seeing that same callback. Re-evaluating it (a re-render,
/// a concurrent step) therefore never sends the token twice, while a later,
/// different callback gets a fresh latch. Each protected step mounts a fresh
/// guard seeded with the current entry's handoff state.
pub struct NavigationFlow<A, N> {
    api: A,
    navigator: N,
    callback: Mutex<Option<CallbackMount<A, N>>>,
    max_hops: usize,
}

struct CallbackMount<A, N> {
    location: Location,
    exchanger: Arc<SessionExchanger<A, N>>,
}

impl<A, N> NavigationFlow<A, N>
where
    A: SessionApi + Clone,
    N: Navigator + Clone,
{
    pub fn new(api: A, navigator: N) -> Self {
        Self {
            api,
            navigator,
            callback: Mutex::new(None),
            max_hops: DEFAULT_MAX_HOPS,
        }
    }

    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    // Exchanger of the callback currently mounted, if any.
    pub fn callback_exchanger(&self) -> Option<Arc<SessionExchanger<A, N>>> {
        self.lock_callback()
            .as_ref()
            .map(|mount| Arc::clone(&mount.exchanger))
    }

    fn lock_callback(&self) -> MutexGuard<'_, Option<CallbackMount<A, N>>> {
        self.callback.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Reuse the exchanger mounted for this exact callback, or replace it.
    fn mount_callback(&self, location: &Location) -> Arc<SessionExchanger<A, N>> {
        let mut slot = self.lock_callback();
        if let Some(mount) = slot.as_ref().filter(|mount| mount.location == *location) {
            return Arc::clone(&mount.exchanger);
        }
        if let Some(previous) = slot.take() {
            previous.exchanger.unmount();
        }
        let exchanger = Arc::new(SessionExchanger::new(
            self.api.clone(),
            self.navigator.clone(),
        ));
        *slot = Some(CallbackMount {
            location: location.clone(),
            exchanger: Arc::clone(&exchanger),
        });
        exchanger
    }

    fn unmount_callback(&self) {
        if let Some(mount) = self.lock_callback().take() {
            mount.exchanger.unmount();
        }
    }

    // Evaluate the current location once.
    #[tracing::instrument(name = "navigation_step", skip_all, fields(path = tracing::field::Empty))]
    pub async fn step<F, O>(&self, render: &F) -> Screen<O>
    where
        F: Fn(Route, &SessionIdentity) -> O + Send + Sync,
    {
        let location = self.navigator.location();
        tracing::Span::current().record("path", location.path());

        match decide(&location) {
            RouteDecision::Callback => {
                let exchanger = self.mount_callback(&location);
                exchanger.process().await;
                Screen::Authenticating
            }
            RouteDecision::Public(_) => {
                self.unmount_callback();
                Screen::Landing
            }
            RouteDecision::Redirect(route) => {
                self.unmount_callback();
                tracing::debug!(target_route = %route, "unknown path; redirecting.");
                self.navigator.navigate(route, NavigateOptions::replace());
                Screen::Redirecting
            }
            RouteDecision::Protected(route) => {
                self.unmount_callback();
                let handoff = self.navigator.state().identity;
                let guard = RouteGuard::mount(
                    self.api.clone(),
                    self.navigator.clone(),
                    |identity: &SessionIdentity| render(route, identity),
                    handoff,
                );
                guard.resolve().await;
                Screen::Protected {
                    route,
                    render: guard.render(),
                }
            }
        }
    }

    // Step until a step leaves the location untouched.
    pub async fn settle<F, O>(&self, render: &F) -> Result<Screen<O>, NavigationError>
    where
        F: Fn(Route, &SessionIdentity) -> O + Send + Sync,
    {
        let mut hops = 0;
        loop {
            let before = self.navigator.location();
            let screen = self.step(render).await;
            let after = self.navigator.location();
            if after == before {
                return Ok(screen);
            }

            hops += 1;
            if hops > self.max_hops {
                tracing::error!(hops, last = %after, "navigation did not settle.");
                return Err(NavigationError::RedirectLoop {
                    hops,
                    last: after.href().to_string(),
                });
            }
        }
    }
}
