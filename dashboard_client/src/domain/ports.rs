use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::domain::callback::CallbackToken;
use crate::domain::errors::{ApiError, AuthError};
use crate::domain::identity::SessionIdentity;
use crate::domain::navigation::{Location, NavigateOptions, NavigationState, Route};
use crate::domain::records::{
    Attachment, DashboardStats, EmailScan, Invoice, InvoiceStats, SettingsUpdate, UserSettings,
    WorkflowRun, WorkflowTriggerResult,
};

// The use cases depend on these traits, not the concrete reqwest client.
// Every call carries the ambient session cookie; none of them ever sees it.
#[async_trait]
pub trait SessionApi: Send + Sync {
    // Trade a one-time callback token for a session cookie and the identity.
    async fn exchange_session(&self, token: &CallbackToken) -> Result<SessionIdentity, AuthError>;
    // Look up who the current cookie belongs to.
    async fn current_identity(&self) -> Result<SessionIdentity, AuthError>;
    async fn logout(&self) -> Result<(), AuthError>;
}

// Port over browser history. Implementations are shared by the exchanger,
// the guards and the router of one page load.
pub trait Navigator: Send + Sync {
    fn location(&self) -> Location;
    // State attached to the current history entry.
    fn state(&self) -> NavigationState;
    // Rewrite the current entry's URL in place; clears its state.
    fn replace_url(&self, location: Location);
    fn navigate(&self, route: Route, options: NavigateOptions);
    // Leave the application entirely (identity provider login).
    fn redirect_external(&self, url: Url);
}

#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError>;
    async fn invoices(&self) -> Result<Vec<Invoice>, ApiError>;
    async fn invoice_stats(&self) -> Result<InvoiceStats, ApiError>;
    async fn email_scans(&self) -> Result<Vec<EmailScan>, ApiError>;
    async fn attachments(&self) -> Result<Vec<Attachment>, ApiError>;
    async fn workflow_runs(&self) -> Result<Vec<WorkflowRun>, ApiError>;
    async fn trigger_workflow(&self) -> Result<WorkflowTriggerResult, ApiError>;
    // n8n workflow document built from the user's settings.
    async fn workflow_export(&self) -> Result<Value, ApiError>;
    async fn settings(&self) -> Result<UserSettings, ApiError>;
    async fn update_settings(&self, update: SettingsUpdate) -> Result<UserSettings, ApiError>;
}
