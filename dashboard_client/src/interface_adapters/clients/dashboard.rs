use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{Value, json};

use crate::domain::records::{
    Attachment, DashboardStats, EmailScan, Invoice, InvoiceStats, SettingsUpdate, UserSettings,
    WorkflowRun, WorkflowTriggerResult,
};
use crate::domain::{ApiError, DashboardApi};
use crate::interface_adapters::clients::backend::{BackendClient, BackendError};

impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Transport(err) => ApiError::Transport(err.to_string()),
            BackendError::Decode(err) => ApiError::Decode(err.to_string()),
            BackendError::Upstream { status, .. } if status == StatusCode::UNAUTHORIZED => {
                ApiError::Unauthorized
            }
            BackendError::Upstream { status, message } => ApiError::Upstream {
                status: status.as_u16(),
                message,
            },
        }
    }
}

// Page data calls ride on the cookie set by the session exchange.
#[async_trait]
impl DashboardApi for BackendClient {
    async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        Ok(self.get_json("/dashboard/stats").await?)
    }

    async fn invoices(&self) -> Result<Vec<Invoice>, ApiError> {
        Ok(self.get_json("/invoices").await?)
    }

    async fn invoice_stats(&self) -> Result<InvoiceStats, ApiError> {
        Ok(self.get_json("/invoices/stats").await?)
    }

    async fn email_scans(&self) -> Result<Vec<EmailScan>, ApiError> {
        Ok(self.get_json("/email-scans").await?)
    }

    async fn attachments(&self) -> Result<Vec<Attachment>, ApiError> {
        Ok(self.get_json("/attachments").await?)
    }

    async fn workflow_runs(&self) -> Result<Vec<WorkflowRun>, ApiError> {
        Ok(self.get_json("/workflow/runs").await?)
    }

    async fn trigger_workflow(&self) -> Result<WorkflowTriggerResult, ApiError> {
        Ok(self.post_json("/workflow/trigger", &json!({})).await?)
    }

    async fn workflow_export(&self) -> Result<Value, ApiError> {
        Ok(self.get_json("/workflow/n8n-json").await?)
    }

    async fn settings(&self) -> Result<UserSettings, ApiError> {
        Ok(self.get_json("/settings").await?)
    }

    async fn update_settings(&self, update: SettingsUpdate) -> Result<UserSettings, ApiError> {
        Ok(self.put_json("/settings", &update).await?)
    }
}
