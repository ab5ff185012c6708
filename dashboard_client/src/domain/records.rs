use serde::{Deserialize, Serialize};

// Read models for the dashboard pages. Timestamps stay as the ISO-8601
// strings the backend sends; the client only displays them.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    NotUpdated,
    Matched,
    NotMatched,
    Downloaded,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub invoice_id: String,
    pub invoice_number: String,
    pub status: InvoiceStatus,
    #[serde(default)]
    pub email_subject: Option<String>,
    #[serde(default)]
    pub email_from: Option<String>,
    #[serde(default)]
    pub email_date: Option<String>,
    #[serde(default)]
    pub attachment_name: Option<String>,
    #[serde(default)]
    pub drive_link: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceStats {
    pub total: u64,
    pub not_updated: u64,
    pub matched: u64,
    pub downloaded: u64,
    pub not_matched: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    Scanned,
    Matched,
    Downloaded,
    Error,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailScan {
    pub scan_id: String,
    pub email_id: String,
    pub subject: String,
    pub sender: String,
    pub date: String,
    pub has_attachment: bool,
    #[serde(default)]
    pub extracted_invoice_numbers: Vec<String>,
    #[serde(default)]
    pub matched_invoice: Option<String>,
    pub status: ScanStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub attachment_id: String,
    pub invoice_number: String,
    pub filename: String,
    #[serde(default)]
    pub drive_file_id: Option<String>,
    #[serde(default)]
    pub drive_link: Option<String>,
    pub email_subject: String,
    #[serde(default)]
    pub downloaded_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Pending,
    Running,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowRun {
    pub run_id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub invoices_processed: u64,
    #[serde(default)]
    pub emails_scanned: u64,
    #[serde(default)]
    pub attachments_downloaded: u64,
    #[serde(default)]
    pub errors: Vec<String>,
}

// Summary returned by the trigger call once the external workflow finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowTriggerResult {
    pub run_id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub invoices_processed: u64,
    #[serde(default)]
    pub emails_scanned: u64,
    #[serde(default)]
    pub attachments_downloaded: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(default)]
    pub google_sheet_url: Option<String>,
    #[serde(default)]
    pub google_drive_folder_id: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

// Partial update; absent fields are left untouched by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_sheet_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_drive_folder_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub invoice_stats: InvoiceStats,
    #[serde(default)]
    pub recent_runs: Vec<WorkflowRun>,
    #[serde(default)]
    pub recent_attachments: Vec<Attachment>,
    #[serde(default)]
    pub total_runs: u64,
    #[serde(default)]
    pub total_attachments: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_status_is_unrecognized_then_it_decodes_as_unknown() {
        let run: WorkflowRun =
            serde_json::from_str(r#"{"run_id":"run_1","status":"paused"}"#).expect("valid run");

        assert_eq!(run.status, RunStatus::Unknown);
        assert!(run.errors.is_empty());
    }

    #[test]
    fn when_invoice_status_is_snake_case_then_it_maps_to_variant() {
        let invoice: Invoice = serde_json::from_value(serde_json::json!({
            "invoice_id": "inv_1",
            "invoice_number": "INV-001",
            "status": "not_matched",
            "user_id": "u",
        }))
        .expect("valid invoice");

        assert_eq!(invoice.status, InvoiceStatus::NotMatched);
        assert_eq!(invoice.drive_link, None);
    }

    #[test]
    fn when_settings_update_has_one_field_then_only_that_field_is_sent() {
        let update = SettingsUpdate {
            google_sheet_url: Some("https://sheets/1".to_string()),
            google_drive_folder_id: None,
        };

        let body = serde_json::to_value(&update).expect("serializable");

        assert_eq!(body, serde_json::json!({"google_sheet_url": "https://sheets/1"}));
    }
}
