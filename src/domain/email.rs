use std::fmt;

pub const NO_SUBJECT: &str = "No Subject";
pub const UNKNOWN_SENDER: &str = "Unknown";

/// Read-only view of one fetched message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailSummary {
    pub sender: String,
    pub subject: String,
    pub snippet: String,
}

impl EmailSummary {
    /// Missing headers fall back to the placeholder strings.
    pub fn new(sender: Option<String>, subject: Option<String>, snippet: String) -> Self {
        Self {
            sender: sender.unwrap_or_else(|| UNKNOWN_SENDER.to_string()),
            subject: subject.unwrap_or_else(|| NO_SUBJECT.to_string()),
            snippet,
        }
    }
}

/// The single prompt line: `From: .. | Subject: .. | Body: ..`
impl fmt::Display for EmailSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "From: {} | Subject: {} | Body: {}",
            self.sender, self.subject, self.snippet
        )
    }
}
