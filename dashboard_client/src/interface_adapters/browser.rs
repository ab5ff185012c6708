use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;
use url::Url;

use crate::domain::{Location, NavigateOptions, NavigationState, Navigator, Route};

/// Every history mutation the browser has been asked to perform, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserEvent {
    ReplaceUrl(Location),
    Navigate { route: Route, replace: bool },
    External(Url),
}

#[derive(Debug, Clone)]
struct HistoryEntry {
    location: Location,
    state: NavigationState,
}

#[derive(Debug)]
struct BrowserInner {
    entries: Vec<HistoryEntry>,
    index: usize,
    events: Vec<BrowserEvent>,
    external: Option<Url>,
}

impl BrowserInner {
    fn current(&self) -> &HistoryEntry {
        &self.entries[self.index]
    }

    fn current_mut(&mut self) -> &mut HistoryEntry {
        &mut self.entries[self.index]
    }
}

/// History stack for one page load. Clones share the same stack, so the
/// exchanger, the guards and the router all see the same current entry.
#[derive(Debug, Clone)]
pub struct InMemoryBrowser {
    inner: Arc<Mutex<BrowserInner>>,
}

impl InMemoryBrowser {
    pub fn open(location: Location) -> Self {
        Self {
            inner: Arc::new(Mutex::new(BrowserInner {
                entries: vec![HistoryEntry {
                    location,
                    state: NavigationState::default(),
                }],
                index: 0,
                events: Vec::new(),
                external: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BrowserInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn location(&self) -> Location {
        self.lock().current().location.clone()
    }

    pub fn state(&self) -> NavigationState {
        self.lock().current().state.clone()
    }

    // Entries up to and including the current one.
    pub fn history(&self) -> Vec<Location> {
        let inner = self.lock();
        inner.entries[..=inner.index]
            .iter()
            .map(|entry| entry.location.clone())
            .collect()
    }

    pub fn events(&self) -> Vec<BrowserEvent> {
        self.lock().events.clone()
    }

    pub fn external_redirect(&self) -> Option<Url> {
        self.lock().external.clone()
    }

    /// Step back one entry. Returns false when already at the first entry.
    pub fn back(&self) -> bool {
        let mut inner = self.lock();
        if inner.index == 0 {
            return false;
        }
        inner.index -= 1;
        true
    }
}

impl Navigator for InMemoryBrowser {
    fn location(&self) -> Location {
        InMemoryBrowser::location(self)
    }

    fn state(&self) -> NavigationState {
        InMemoryBrowser::state(self)
    }

    fn replace_url(&self, location: Location) {
        let mut inner = self.lock();
        debug!(from = %inner.current().location, to = %location, "history replace url");
        *inner.current_mut() = HistoryEntry {
            location: location.clone(),
            state: NavigationState::default(),
        };
        inner.events.push(BrowserEvent::ReplaceUrl(location));
    }

    fn navigate(&self, route: Route, options: NavigateOptions) {
        let mut inner = self.lock();
        let entry = HistoryEntry {
            location: inner.current().location.at_route(route),
            state: options.state,
        };
        debug!(to = %entry.location, replace = options.replace, "history navigate");

        if options.replace {
            *inner.current_mut() = entry;
        } else {
            // Pushing drops any forward entries.
            let keep = inner.index + 1;
            inner.entries.truncate(keep);
            inner.entries.push(entry);
            inner.index = keep;
        }
        inner.events.push(BrowserEvent::Navigate {
            route,
            replace: options.replace,
        });
    }

    fn redirect_external(&self, url: Url) {
        let mut inner = self.lock();
        debug!(to = %url, "leaving application");
        inner.external = Some(url.clone());
        inner.events.push(BrowserEvent::External(url));
    }
}
