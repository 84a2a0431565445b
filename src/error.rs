use std::path::PathBuf;

/// Errors that halt the current action and are shown to the user verbatim.
#[derive(Debug, thiserror::Error)]
pub enum FatalError {
    #[error("Missing '{}'! Download the OAuth client file for a desktop app and place it there.", .0.display())]
    MissingClientSecret(PathBuf),
    #[error(
        "API Key not found! Run `daily_briefing set-api-key` or set the OPENAI_API_KEY environment variable."
    )]
    MissingApiKey,
}
