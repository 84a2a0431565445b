pub mod openai;
pub mod prompt;

pub use openai::OpenAiClient;

use crate::domain::briefing::Briefing;
use crate::domain::email::EmailSummary;

#[derive(Debug, thiserror::Error)]
pub enum BriefingError {
    #[error("HTTP: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("The model returned no content")]
    EmptyResponse,
    #[error("Malformed briefing: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A JSON-mode chat completion endpoint.
pub trait CompletionClient {
    fn complete_json(&self, system: &str, user: &str) -> Result<String, BriefingError>;
}

/// Ask the model for a briefing of `emails`.
///
/// Returns `Ok(None)` without calling the model when there is nothing to
/// summarize. Any failure is an `Err`; callers skip rendering on it.
pub fn summarize(
    emails: &[EmailSummary],
    client: &dyn CompletionClient,
) -> Result<Option<Briefing>, BriefingError> {
    if emails.is_empty() {
        return Ok(None);
    }

    log::info!("Summarizing {} emails", emails.len());
    let content = client.complete_json(prompt::SYSTEM_INSTRUCTION, &prompt::user_message(emails))?;
    let briefing = Briefing::from_json(&content)?;

    if briefing.hot_takes.len() != briefing.drafts.len() {
        log::debug!(
            "Model returned {} hot takes but {} drafts",
            briefing.hot_takes.len(),
            briefing.drafts.len()
        );
    }
    Ok(Some(briefing))
}
