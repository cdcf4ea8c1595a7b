use crate::sink::EventSink;
use async_trait::async_trait;
use leadline_core::{LeadlineResult, LogEvent};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Append-only JSONL lead log.
///
/// Writes one self-contained JSON line per event to `leads.jsonl` under the
/// configured directory, so the file can be tailed or bulk-imported.
pub struct FileEventSink {
    path: PathBuf,
}

impl FileEventSink {
    /// Create the sink, creating `dir` if it does not exist yet.
    pub async fn new(dir: PathBuf) -> LeadlineResult<Self> {
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self {
            path: dir.join("leads.jsonl"),
        })
    }

    /// Path of the JSONL file events are appended to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl EventSink for FileEventSink {
    async fn record(&self, event: &LogEvent) -> LeadlineResult<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        let mut line = serde_json::to_string(event)?;
        line.push('\n');
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use leadline_core::StatusTag;
    use tempfile::TempDir;

    fn make_event(label: &str) -> LogEvent {
        LogEvent::new(
            "15550001111@c.us",
            None,
            label,
            "User received main menu",
            StatusTag::Engaged,
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn record_appends_parseable_lines() {
        let tmp = TempDir::new().unwrap();
        let sink = FileEventSink::new(tmp.path().to_path_buf()).await.unwrap();

        sink.record(&make_event("Main Menu Sent")).await.unwrap();
        sink.record(&make_event("Pricing Requested")).await.unwrap();

        let data = std::fs::read_to_string(tmp.path().join("leads.jsonl")).unwrap();
        let lines: Vec<&str> = data.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: LogEvent = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.choice_label, "Main Menu Sent");
        let second: LogEvent = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second.choice_label, "Pricing Requested");
    }

    #[tokio::test]
    async fn records_survive_sink_reconstruction() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().to_path_buf();

        {
            let sink = FileEventSink::new(dir.clone()).await.unwrap();
            sink.record(&make_event("Main Menu Sent")).await.unwrap();
        }
        {
            let sink = FileEventSink::new(dir.clone()).await.unwrap();
            sink.record(&make_event("Demo Requested")).await.unwrap();
        }

        let data = std::fs::read_to_string(dir.join("leads.jsonl")).unwrap();
        assert_eq!(data.lines().count(), 2);
    }
}
