use leadline_core::{LeadlineError, LeadlineResult};
use regex::Regex;

/// Parses "my name is X" / "i am X" introductions.
///
/// The trigger phrase matches case-insensitively, but the capture runs on
/// the raw text so the name keeps the sender's original casing. A failed
/// capture is a non-match, never an error.
#[derive(Debug)]
pub struct NameParser {
    pattern: Regex,
}

impl NameParser {
    pub fn new() -> LeadlineResult<Self> {
        let pattern = Regex::new(r"(?i)(?:name is|i am) ([a-zA-Z\s]+)")
            .map_err(|e| LeadlineError::Engine(format!("name pattern: {e}")))?;
        Ok(Self { pattern })
    }

    /// Extract the introduced name from raw trimmed text, if any.
    pub fn parse(&self, raw: &str) -> Option<String> {
        let caps = self.pattern.captures(raw)?;
        let name = caps.get(1)?.as_str().trim();
        if name.is_empty() {
            return None;
        }
        Some(name.to_string())
    }
}

/// A parsed demo-booking request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoBooking {
    /// Requested date, `DD-MM-YYYY` as typed.
    pub date: String,
    /// Requested time, `HH:MM` as typed.
    pub time: String,
    /// Optional trailing name, original casing.
    pub name: Option<String>,
}

/// Parses `DD-MM-YYYY HH:MM [name]` demo bookings.
#[derive(Debug)]
pub struct DemoParser {
    pattern: Regex,
}

impl DemoParser {
    pub fn new() -> LeadlineResult<Self> {
        let pattern = Regex::new(r"(\d{1,2}-\d{1,2}-\d{4})\s+(\d{1,2}:\d{2})\s*(.+)?")
            .map_err(|e| LeadlineError::Engine(format!("demo pattern: {e}")))?;
        Ok(Self { pattern })
    }

    /// Extract a demo booking from raw trimmed text, if any.
    pub fn parse(&self, raw: &str) -> Option<DemoBooking> {
        let caps = self.pattern.captures(raw)?;
        let date = caps.get(1)?.as_str().to_string();
        let time = caps.get(2)?.as_str().to_string();
        let name = caps
            .get(3)
            .map(|m| m.as_str().trim())
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        Some(DemoBooking { date, time, name })
    }
}
