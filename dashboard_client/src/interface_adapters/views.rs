// Plain-text rendering of the dashboard screens.

use std::fmt::Write;

use serde_json::Value;

use crate::domain::records::{
    DashboardStats, InvoiceStats, RunStatus, UserSettings, WorkflowRun, WorkflowTriggerResult,
};
use crate::domain::{Route, SessionIdentity};
use crate::use_cases::{GuardRender, PageData, Screen};

pub const LOADING: &str = "Loading...";

pub fn render_landing() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "InvoiceSync");
    let _ = writeln!(out, "Automate invoice matching between your inbox and your sheet.");
    let _ = writeln!(out);
    let _ = writeln!(out, "  - Scan Gmail for invoice emails");
    let _ = writeln!(out, "  - Match invoice numbers against Google Sheets");
    let _ = writeln!(out, "  - Save attachments to Google Drive");
    let _ = writeln!(out);
    let _ = write!(out, "Sign in with Google: dashboard login <url>");
    out
}

/// Navigation bar and user card around a protected page body.
pub fn render_layout(route: Route, identity: &SessionIdentity, body: &str) -> String {
    let mut out = String::new();
    let nav: Vec<String> = Route::PROTECTED
        .iter()
        .map(|item| {
            if *item == route {
                format!("[{}]", item.label())
            } else {
                item.label().to_string()
            }
        })
        .collect();
    let _ = writeln!(out, "{}", nav.join(" | "));
    let _ = writeln!(
        out,
        "({}) {} <{}>",
        identity.initial(),
        identity.name,
        identity.email
    );
    let _ = writeln!(out, "{}", "-".repeat(40));
    out.push_str(body);
    out
}

pub fn render_page(data: &PageData) -> String {
    match data {
        PageData::Dashboard(stats) => render_dashboard(stats),
        PageData::Invoices { invoices, stats } => {
            let mut out = render_invoice_stats(stats);
            let _ = writeln!(out, "({} invoices)", invoices.len());
            if invoices.is_empty() {
                out.push_str("No invoices found.\n");
            }
            for invoice in invoices {
                let _ = writeln!(
                    out,
                    "{:<16} {:?}{}",
                    invoice.invoice_number,
                    invoice.status,
                    invoice
                        .drive_link
                        .as_deref()
                        .map(|link| format!("  {link}"))
                        .unwrap_or_default()
                );
            }
            out
        }
        PageData::EmailScans(scans) => {
            if scans.is_empty() {
                return "No email scans yet.\n".to_string();
            }
            let mut out = String::new();
            for scan in scans {
                let _ = writeln!(
                    out,
                    "{} {:?} {} ({})",
                    scan.date, scan.status, scan.subject, scan.sender
                );
            }
            out
        }
        PageData::Attachments(attachments) => {
            if attachments.is_empty() {
                return "No attachments downloaded yet.\n".to_string();
            }
            let mut out = String::new();
            for attachment in attachments {
                let _ = writeln!(
                    out,
                    "{:<16} {}",
                    attachment.invoice_number, attachment.filename
                );
            }
            out
        }
        PageData::Workflow { runs, export } => {
            let mut out: String = if runs.is_empty() {
                "No workflow runs yet.\n".to_string()
            } else {
                runs.iter().map(render_run).collect()
            };
            if let Some(export) = export {
                out.push_str(&render_export_preview(export));
            }
            out
        }
        PageData::Settings(settings) => render_settings(settings),
        PageData::Empty => String::new(),
    }
}

fn render_dashboard(stats: &DashboardStats) -> String {
    let mut out = render_invoice_stats(&stats.invoice_stats);
    let _ = writeln!(
        out,
        "Workflow runs: {}  Attachments: {}",
        stats.total_runs, stats.total_attachments
    );
    if let Some(run) = stats.recent_runs.first() {
        out.push_str("Last run: ");
        out.push_str(&render_run(run));
    }
    out
}

fn render_invoice_stats(stats: &InvoiceStats) -> String {
    format!(
        "Invoices: {} total, {} downloaded, {} matched, {} not matched, {} pending\n",
        stats.total, stats.downloaded, stats.matched, stats.not_matched, stats.not_updated
    )
}

fn render_run(run: &WorkflowRun) -> String {
    let mut line = format!(
        "{} {} scanned={} processed={} downloaded={}",
        run.run_id,
        run_status_label(run.status),
        run.emails_scanned,
        run.invoices_processed,
        run.attachments_downloaded
    );
    if !run.errors.is_empty() {
        let _ = write!(line, " errors={}", run.errors.len());
    }
    line.push('\n');
    line
}

// Export panels show the first part of the document only.
const EXPORT_PREVIEW_CHARS: usize = 1000;

fn render_export_preview(export: &Value) -> String {
    let pretty = serde_json::to_string_pretty(export).unwrap_or_default();
    let mut out = String::from("n8n workflow JSON (dashboard workflow export <url>):\n");
    if pretty.chars().count() > EXPORT_PREVIEW_CHARS {
        out.extend(pretty.chars().take(EXPORT_PREVIEW_CHARS));
        out.push_str("...");
    } else {
        out.push_str(&pretty);
    }
    out.push('\n');
    out
}

fn render_settings(settings: &UserSettings) -> String {
    format!(
        "Google Sheet URL: {}\nDrive folder: {}\n",
        settings.google_sheet_url.as_deref().unwrap_or("(not set)"),
        settings
            .google_drive_folder_id
            .as_deref()
            .unwrap_or("(root)")
    )
}

pub fn render_trigger_result(result: &WorkflowTriggerResult) -> String {
    format!(
        "Workflow {} {}: {} emails scanned, {} invoices processed, {} attachments downloaded\n",
        result.run_id,
        run_status_label(result.status),
        result.emails_scanned,
        result.invoices_processed,
        result.attachments_downloaded
    )
}

fn run_status_label(status: RunStatus) -> &'static str {
    match status {
        RunStatus::Pending => "pending",
        RunStatus::Running => "running",
        RunStatus::Completed => "completed",
        RunStatus::Failed => "failed",
        RunStatus::Unknown => "unknown",
    }
}

/// Text for a settled screen. `None` means nothing is shown.
pub fn render_screen<O>(screen: &Screen<O>, content: impl FnOnce(&O) -> String) -> Option<String> {
    match screen {
        Screen::Authenticating | Screen::Redirecting => Some(LOADING.to_string()),
        Screen::Landing => Some(render_landing()),
        Screen::Protected { render, .. } => match render {
            GuardRender::Loading => Some(LOADING.to_string()),
            GuardRender::Content(output) => Some(content(output)),
            GuardRender::Nothing => None,
        },
    }
}
