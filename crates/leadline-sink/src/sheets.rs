use crate::sink::EventSink;
use async_trait::async_trait;
use leadline_core::{display_phone, LeadlineError, LeadlineResult, LogEvent};
use serde::{Deserialize, Serialize};
use tracing::debug;

const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com";

/// Google Sheets lead log.
///
/// Appends one row per event through the `values:append` endpoint. The
/// column layout is fixed: phone, name, choice label, detail, timestamp,
/// status. Reporting built on the sheet depends on that order.
pub struct SheetsSink {
    access_token: String,
    spreadsheet_id: String,
    range: String,
    api_base: Option<String>,
    client: reqwest::Client,
}

// ── Sheets API types ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct AppendRequest {
    values: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct AppendResponse {
    #[serde(default)]
    updates: Option<AppendUpdates>,
    #[serde(default)]
    error: Option<SheetsError>,
}

#[derive(Debug, Deserialize)]
struct AppendUpdates {
    #[serde(rename = "updatedRange", default)]
    updated_range: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SheetsError {
    message: String,
    #[serde(default)]
    code: Option<i64>,
}

// ── Implementation ──────────────────────────────────────────────────────────

impl SheetsSink {
    /// Create a new `SheetsSink`.
    ///
    /// * `access_token` – An OAuth token with spreadsheet write scope.
    /// * `spreadsheet_id` – The target spreadsheet id.
    /// * `range` – The append range, e.g. `Sheet1!A:F`.
    pub fn new(
        access_token: impl Into<String>,
        spreadsheet_id: impl Into<String>,
        range: impl Into<String>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            spreadsheet_id: spreadsheet_id.into(),
            range: range.into(),
            api_base: None,
            client: reqwest::Client::new(),
        }
    }

    /// Override the Sheets API base URL (used by tests to point at a mock).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    fn api_url(&self) -> String {
        let base = self.api_base.as_deref().unwrap_or(DEFAULT_API_BASE);
        format!(
            "{}/v4/spreadsheets/{}/values/{}:append",
            base, self.spreadsheet_id, self.range
        )
    }

    fn row(event: &LogEvent) -> Vec<String> {
        vec![
            display_phone(&event.sender).to_string(),
            event
                .display_name
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            event.choice_label.clone(),
            event.detail.clone(),
            event.timestamp.to_rfc3339(),
            event.status.to_string(),
        ]
    }
}

#[async_trait]
impl EventSink for SheetsSink {
    async fn record(&self, event: &LogEvent) -> LeadlineResult<()> {
        let url = self.api_url();

        let payload = AppendRequest {
            values: vec![Self::row(event)],
        };

        let response = self
            .client
            .post(&url)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .bearer_auth(&self.access_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| LeadlineError::Sink(format!("Sheets append error: {e}")))?;

        let body: AppendResponse = response
            .json()
            .await
            .map_err(|e| LeadlineError::Sink(format!("Sheets parse error: {e}")))?;

        if let Some(err) = body.error {
            return Err(LeadlineError::Sink(format!(
                "Sheets append failed (code {}): {}",
                err.code.unwrap_or_default(),
                err.message
            )));
        }

        if let Some(range) = body.updates.and_then(|u| u.updated_range) {
            debug!(range = %range, "Lead row appended");
        }

        Ok(())
    }
}
