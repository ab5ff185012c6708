use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::Notify;

use crate::domain::records::{
    Attachment, DashboardStats, EmailScan, Invoice, InvoiceStats, RunStatus, SettingsUpdate,
    UserSettings, WorkflowRun, WorkflowTriggerResult,
};
use crate::domain::{ApiError, AuthError, CallbackToken, DashboardApi, SessionApi, SessionIdentity};

pub(crate) fn identity_a() -> SessionIdentity {
    SessionIdentity::new("A", "a@x.com")
}

// Calls observed by the fake, in order.
#[derive(Clone, Debug, Default)]
pub(crate) struct CallLog {
    pub exchanged_tokens: Vec<String>,
    pub identity_checks: usize,
    pub logouts: usize,
}

// Scripted session backend. Every call suspends at least once so tests see
// the same interleavings a real request would produce.
#[derive(Clone)]
pub(crate) struct FakeSessionApi {
    exchange: Arc<Mutex<Result<SessionIdentity, AuthError>>>,
    current: Arc<Mutex<Result<SessionIdentity, AuthError>>>,
    logout: Arc<Mutex<Result<(), AuthError>>>,
    calls: Arc<Mutex<CallLog>>,
    // When set, calls stay pending until the test releases the gate.
    gate: Option<Arc<Notify>>,
}

impl FakeSessionApi {
    pub(crate) fn new() -> Self {
        Self {
            exchange: Arc::new(Mutex::new(Err(AuthError::ExchangeRejected {
                status: 401,
                message: None,
            }))),
            current: Arc::new(Mutex::new(Err(AuthError::Unauthorized { message: None }))),
            logout: Arc::new(Mutex::new(Ok(()))),
            calls: Arc::new(Mutex::new(CallLog::default())),
            gate: None,
        }
    }

    pub(crate) fn with_exchange(self, result: Result<SessionIdentity, AuthError>) -> Self {
        *self.exchange.lock().expect("exchange mutex poisoned") = result;
        self
    }

    pub(crate) fn with_current_identity(self, result: Result<SessionIdentity, AuthError>) -> Self {
        *self.current.lock().expect("current identity mutex poisoned") = result;
        self
    }

    pub(crate) fn with_logout(self, result: Result<(), AuthError>) -> Self {
        *self.logout.lock().expect("logout mutex poisoned") = result;
        self
    }

    pub(crate) fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub(crate) fn calls(&self) -> CallLog {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    async fn suspend(&self) {
        match &self.gate {
            Some(gate) => gate.notified().await,
            None => tokio::task::yield_now().await,
        }
    }
}

#[async_trait]
impl SessionApi for FakeSessionApi {
    async fn exchange_session(&self, token: &CallbackToken) -> Result<SessionIdentity, AuthError> {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .exchanged_tokens
            .push(token.as_str().to_string());
        self.suspend().await;
        self.exchange.lock().expect("exchange mutex poisoned").clone()
    }

    async fn current_identity(&self) -> Result<SessionIdentity, AuthError> {
        self.calls.lock().expect("calls mutex poisoned").identity_checks += 1;
        self.suspend().await;
        self.current.lock().expect("current identity mutex poisoned").clone()
    }

    async fn logout(&self) -> Result<(), AuthError> {
        self.calls.lock().expect("calls mutex poisoned").logouts += 1;
        self.suspend().await;
        self.logout.lock().expect("logout mutex poisoned").clone()
    }
}

// Canned dashboard backend with a switch for the unauthorized path.
#[derive(Clone, Default)]
pub(crate) struct FakeDashboardApi {
    pub unauthorized: bool,
    pub sheet_configured: bool,
    pub export_unavailable: bool,
}

impl FakeDashboardApi {
    fn guard(&self) -> Result<(), ApiError> {
        if self.unauthorized {
            return Err(ApiError::Unauthorized);
        }
        Ok(())
    }

    pub(crate) fn sample_run() -> WorkflowRun {
        WorkflowRun {
            run_id: "run_1".to_string(),
            status: RunStatus::Completed,
            started_at: Some("2025-01-01T00:00:00Z".to_string()),
            completed_at: Some("2025-01-01T00:01:00Z".to_string()),
            invoices_processed: 6,
            emails_scanned: 6,
            attachments_downloaded: 4,
            errors: Vec::new(),
        }
    }
}

#[async_trait]
impl DashboardApi for FakeDashboardApi {
    async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.guard()?;
        Ok(DashboardStats {
            invoice_stats: InvoiceStats {
                total: 6,
                not_updated: 0,
                matched: 0,
                downloaded: 4,
                not_matched: 2,
            },
            recent_runs: vec![Self::sample_run()],
            recent_attachments: Vec::new(),
            total_runs: 1,
            total_attachments: 4,
        })
    }

    async fn invoices(&self) -> Result<Vec<Invoice>, ApiError> {
        self.guard()?;
        Ok(Vec::new())
    }

    async fn invoice_stats(&self) -> Result<InvoiceStats, ApiError> {
        self.guard()?;
        Ok(InvoiceStats::default())
    }

    async fn email_scans(&self) -> Result<Vec<EmailScan>, ApiError> {
        self.guard()?;
        Ok(Vec::new())
    }

    async fn attachments(&self) -> Result<Vec<Attachment>, ApiError> {
        self.guard()?;
        Ok(Vec::new())
    }

    async fn workflow_runs(&self) -> Result<Vec<WorkflowRun>, ApiError> {
        self.guard()?;
        Ok(vec![Self::sample_run()])
    }

    async fn trigger_workflow(&self) -> Result<WorkflowTriggerResult, ApiError> {
        self.guard()?;
        if !self.sheet_configured {
            return Err(ApiError::Upstream {
                status: 400,
                message: Some("Please configure Google Sheet URL in settings first".to_string()),
            });
        }
        Ok(WorkflowTriggerResult {
            run_id: "run_2".to_string(),
            status: RunStatus::Completed,
            invoices_processed: 6,
            emails_scanned: 6,
            attachments_downloaded: 4,
        })
    }

    async fn workflow_export(&self) -> Result<Value, ApiError> {
        self.guard()?;
        if self.export_unavailable {
            return Err(ApiError::Upstream {
                status: 500,
                message: None,
            });
        }
        Ok(json!({"name": "Invoice Email Matcher", "nodes": []}))
    }

    async fn settings(&self) -> Result<UserSettings, ApiError> {
        self.guard()?;
        Ok(UserSettings::default())
    }

    async fn update_settings(&self, update: SettingsUpdate) -> Result<UserSettings, ApiError> {
        self.guard()?;
        Ok(UserSettings {
            google_sheet_url: update.google_sheet_url,
            google_drive_folder_id: update.google_drive_folder_id,
            updated_at: None,
        })
    }
}
