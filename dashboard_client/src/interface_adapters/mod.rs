// Interface adapters: backend HTTP clients, browser history and text views.

pub mod browser;
pub mod clients;
pub mod protocol;
pub mod views;

pub use browser::{BrowserEvent, InMemoryBrowser};
pub use clients::{BackendClient, BackendError};
