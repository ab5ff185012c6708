use serde_json::Value;

use crate::domain::records::{
    Attachment, DashboardStats, EmailScan, Invoice, InvoiceStats, InvoiceStatus, SettingsUpdate,
    UserSettings, WorkflowRun, WorkflowTriggerResult,
};
use crate::domain::{ApiError, DashboardApi, NavigateOptions, Navigator, Route};

// Data behind each protected page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageData {
    Dashboard(DashboardStats),
    Invoices {
        invoices: Vec<Invoice>,
        stats: InvoiceStats,
    },
    EmailScans(Vec<EmailScan>),
    Attachments(Vec<Attachment>),
    Workflow {
        runs: Vec<WorkflowRun>,
        // n8n document for the export panel; absent when it failed to load.
        export: Option<Value>,
    },
    Settings(UserSettings),
    // The public landing page has no backend data.
    Empty,
}

#[tracing::instrument(name = "load_page", skip_all, fields(route = %route))]
pub async fn load_page<D>(api: &D, route: Route) -> Result<PageData, ApiError>
where
    D: DashboardApi + ?Sized,
{
    let data = match route {
        Route::Landing => PageData::Empty,
        Route::Dashboard => PageData::Dashboard(api.dashboard_stats().await?),
        Route::Invoices => {
            let invoices = api.invoices().await?;
            let stats = api.invoice_stats().await?;
            PageData::Invoices { invoices, stats }
        }
        Route::EmailScans => PageData::EmailScans(api.email_scans().await?),
        Route::Attachments => PageData::Attachments(api.attachments().await?),
        Route::Workflow => {
            let runs = api.workflow_runs().await?;
            // The run list still shows when the export cannot be built.
            let export = api
                .workflow_export()
                .await
                .inspect_err(|err| tracing::warn!(error = %err, "workflow export unavailable."))
                .ok();
            PageData::Workflow { runs, export }
        }
        Route::Settings => PageData::Settings(api.settings().await?),
    };
    Ok(data)
}

/// Invoices whose number or email subject contains `search` (case-insensitive)
/// and, when `status` is set, whose status matches it.
pub fn filter_invoices(
    invoices: &[Invoice],
    search: &str,
    status: Option<InvoiceStatus>,
) -> Vec<Invoice> {
    let needle = search.to_lowercase();
    invoices
        .iter()
        .filter(|invoice| {
            invoice.invoice_number.to_lowercase().contains(&needle)
                || invoice
                    .email_subject
                    .as_deref()
                    .is_some_and(|subject| subject.to_lowercase().contains(&needle))
        })
        .filter(|invoice| status.is_none_or(|wanted| invoice.status == wanted))
        .cloned()
        .collect()
}

// "all" or a single status key, as the invoice list filter takes them.
pub fn parse_status_filter(value: &str) -> Result<Option<InvoiceStatus>, String> {
    match value {
        "all" => Ok(None),
        "not_updated" => Ok(Some(InvoiceStatus::NotUpdated)),
        "matched" => Ok(Some(InvoiceStatus::Matched)),
        "not_matched" => Ok(Some(InvoiceStatus::NotMatched)),
        "downloaded" => Ok(Some(InvoiceStatus::Downloaded)),
        other => Err(format!("unknown invoice status filter: {other}")),
    }
}

/// Kick off the external workflow; the backend answers once the run is done.
///
/// A 400 means the sheet is not configured yet, so the user is sent to the
/// settings page (a push, so back returns to the dashboard).
#[tracing::instrument(name = "trigger_workflow", skip_all)]
pub async fn trigger_workflow<D, N>(
    api: &D,
    navigator: &N,
) -> Result<WorkflowTriggerResult, ApiError>
where
    D: DashboardApi + ?Sized,
    N: Navigator + ?Sized,
{
    let result = api.trigger_workflow().await.inspect_err(|err| {
        tracing::warn!(error = %err, "workflow trigger failed.");
        if matches!(err, ApiError::Upstream { status: 400, .. }) {
            navigator.navigate(Route::Settings, NavigateOptions::default());
        }
    })?;
    tracing::info!(
        run_id = %result.run_id,
        invoices_processed = result.invoices_processed,
        attachments_downloaded = result.attachments_downloaded,
        "workflow run finished."
    );
    Ok(result)
}

// Nothing is sent when the update carries no field.
pub async fn save_settings<D>(api: &D, update: SettingsUpdate) -> Result<UserSettings, ApiError>
where
    D: DashboardApi + ?Sized,
{
    if update == SettingsUpdate::default() {
        return api.settings().await;
    }
    let saved = api.update_settings(update).await?;
    tracing::info!("settings saved.");
    Ok(saved)
}

pub async fn export_workflow<D>(api: &D) -> Result<Value, ApiError>
where
    D: DashboardApi + ?Sized,
{
    api.workflow_export().await
}
