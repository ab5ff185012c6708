// Domain layer: session contract, navigation model and dashboard records.

pub mod auth_status;
pub mod callback;
pub mod errors;
pub mod identity;
pub mod navigation;
pub mod ports;
pub mod records;

// Re-export the domain boundary types and ports.
pub use auth_status::AuthStatus;
pub use callback::{CallbackToken, SESSION_ID_KEY, is_callback_fragment};
pub use errors::{ApiError, AuthError};
pub use identity::SessionIdentity;
pub use navigation::{Location, NavigateOptions, NavigationState, Route};
pub use ports::{DashboardApi, Navigator, SessionApi};
