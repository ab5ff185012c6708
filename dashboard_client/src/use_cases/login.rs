use url::Url;

use crate::domain::{Location, Navigator, Route};

/// Identity-provider login URL for the page the user is on.
///
/// The `redirect` target is this app's own origin plus the protected landing
/// path, taken from the live location. A configured or fallback value would
/// send the provider's callback somewhere this client never sees.
pub fn login_url(provider: &Url, location: &Location) -> Url {
    let redirect = format!("{}{}", location.origin(), Route::PROTECTED_LANDING.path());
    let mut url = provider.clone();
    url.set_query(None);
    url.query_pairs_mut().append_pair("redirect", &redirect);
    url
}

// Sends the whole browser to the identity provider.
pub struct LoginUseCase<N> {
    pub navigator: N,
    pub provider: Url,
}

impl<N> LoginUseCase<N>
where
    N: Navigator,
{
    pub fn execute(&self) -> Url {
        let url = login_url(&self.provider, &self.navigator.location());
        tracing::info!(provider = %self.provider, "redirecting to identity provider.");
        self.navigator.redirect_external(url.clone());
        url
    }
}
