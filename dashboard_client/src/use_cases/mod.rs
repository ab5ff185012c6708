// Use cases layer: session establishment, route gating and page workflows.

pub mod login;
pub mod logout;
pub mod navigation;
pub mod pages;
pub mod route_guard;
pub mod session_exchange;

#[cfg(test)]
pub(crate) mod test_support;

pub use login::{LoginUseCase, login_url};
pub use logout::{LogoutResponse, LogoutUseCase};
pub use navigation::{NavigationError, NavigationFlow, RouteDecision, Screen, decide};
pub use pages::{
    PageData, export_workflow, filter_invoices, load_page, parse_status_filter, save_settings,
    trigger_workflow,
};
pub use route_guard::{GuardRender, ProtectedView, RouteGuard};
pub use session_exchange::{ExchangeOutcome, SessionExchanger};
