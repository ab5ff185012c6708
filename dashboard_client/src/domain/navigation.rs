use std::fmt;

use url::Url;

use crate::domain::identity::SessionIdentity;

// Client-side routes of the dashboard. `Landing` is the only public one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    Dashboard,
    Invoices,
    EmailScans,
    Attachments,
    Workflow,
    Settings,
}

impl Route {
    // Where every failed or missing session ends up.
    pub const PUBLIC_ENTRY: Route = Route::Landing;
    // Where a freshly established session lands.
    pub const PROTECTED_LANDING: Route = Route::Dashboard;
    // Sidebar order.
    pub const PROTECTED: [Route; 6] = [
        Route::Dashboard,
        Route::Invoices,
        Route::EmailScans,
        Route::Attachments,
        Route::Workflow,
        Route::Settings,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::Dashboard => "/dashboard",
            Route::Invoices => "/invoices",
            Route::EmailScans => "/email-scans",
            Route::Attachments => "/attachments",
            Route::Workflow => "/workflow",
            Route::Settings => "/settings",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Route::Landing => "Home",
            Route::Dashboard => "Dashboard",
            Route::Invoices => "Invoices",
            Route::EmailScans => "Email Scans",
            Route::Attachments => "Attachments",
            Route::Workflow => "Workflow",
            Route::Settings => "Settings",
        }
    }

    // Match a location path; a single trailing slash is tolerated.
    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = match path.strip_suffix('/') {
            Some(rest) if !rest.is_empty() => rest,
            _ => path,
        };
        std::iter::once(Route::Landing)
            .chain(Route::PROTECTED)
            .find(|route| route.path() == trimmed)
    }

    pub fn is_protected(self) -> bool {
        self != Route::PUBLIC_ENTRY
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Absolute address of the current history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    url: Url,
}

impl Location {
    pub fn parse(href: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            url: Url::parse(href)?,
        })
    }

    pub fn href(&self) -> &str {
        self.url.as_str()
    }

    // Scheme, host and port; computed from the live location, never configured.
    pub fn origin(&self) -> String {
        self.url.origin().ascii_serialization()
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    pub fn fragment(&self) -> Option<&str> {
        self.url.fragment()
    }

    pub fn without_fragment(&self) -> Location {
        let mut url = self.url.clone();
        url.set_fragment(None);
        Location { url }
    }

    // Same origin, new path; query and fragment are dropped.
    pub fn at_route(&self, route: Route) -> Location {
        let mut url = self.url.clone();
        url.set_path(route.path());
        url.set_query(None);
        url.set_fragment(None);
        Location { url }
    }

    pub fn as_url(&self) -> &Url {
        &self.url
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.href())
    }
}

// State attached to a history entry. The exchanger uses it to hand the
// resolved identity to the guard of the next route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    pub identity: Option<SessionIdentity>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigateOptions {
    // Replace the current history entry instead of pushing a new one.
    pub replace: bool,
    pub state: NavigationState,
}

impl NavigateOptions {
    pub fn replace() -> Self {
        Self {
            replace: true,
            state: NavigationState::default(),
        }
    }

    pub fn replace_with_identity(identity: SessionIdentity) -> Self {
        Self {
            replace: true,
            state: NavigationState {
                identity: Some(identity),
            },
        }
    }
}
