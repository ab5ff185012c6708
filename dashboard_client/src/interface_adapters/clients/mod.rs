// Outbound HTTP clients.

pub mod backend;
pub mod dashboard;
pub mod session;

pub use backend::{BackendClient, BackendError};
