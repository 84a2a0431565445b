use anyhow::Result;

use crate::ai::{self, CompletionClient, OpenAiClient};
use crate::auth::{CredentialProvider, FileCredentialStore, GoogleOAuth};
use crate::config::Settings;
use crate::domain::briefing::Briefing;
use crate::error::FatalError;
use crate::mail::{self, GmailClient, MailQuery, MailService};
use crate::render::{NO_EMAILS_MESSAGE, Page};

/// Result of one press of the run button.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    NoEmails,
    Failed(String),
    Ready { briefing: Briefing, skipped: usize },
}

impl RunOutcome {
    pub fn page(&self) -> Page<'_> {
        match self {
            RunOutcome::NoEmails => Page::Info(NO_EMAILS_MESSAGE),
            RunOutcome::Failed(msg) => Page::Error(msg),
            RunOutcome::Ready { briefing, skipped } => Page::Dashboard {
                briefing,
                skipped: *skipped,
            },
        }
    }
}

/// Fetch and summarize with already-authenticated services.
pub fn analyse(
    mail_service: &dyn MailService,
    model: &dyn CompletionClient,
    query: &MailQuery,
) -> RunOutcome {
    let report = match mail::fetch(mail_service, query) {
        Ok(r) => r,
        Err(e) => {
            log::error!("Listing messages failed: {e:#}");
            return RunOutcome::Failed(format!("Error fetching emails: {e}"));
        }
    };

    let skipped = report.failed();
    let emails = report.into_summaries();

    match ai::summarize(&emails, model) {
        Ok(Some(briefing)) => RunOutcome::Ready { briefing, skipped },
        Ok(None) => RunOutcome::NoEmails,
        Err(e) => {
            log::error!("Briefing request failed: {e}");
            RunOutcome::Failed(format!("Error connecting to OpenAI: {e}"))
        }
    }
}

/// The full action: secret check, credentials, fetch, summarize.
///
/// Fatal problems (missing API key or client secret file) come back as a
/// [`FatalError`] inside the `Err`; degraded runs are an `Ok` outcome.
pub fn run_daily_analysis(settings: &Settings) -> Result<RunOutcome> {
    let cfg = &settings.config;
    let api_key = settings
        .secrets
        .api_key
        .clone()
        .ok_or(FatalError::MissingApiKey)?;

    let provider = CredentialProvider::new(
        FileCredentialStore::new(cfg.token_path()),
        GoogleOAuth::new(cfg.oauth_port, cfg.open_browser),
        cfg.client_secret_path(),
    );
    let auth = provider.acquire()?;

    let gmail = GmailClient::new(&auth)?;
    let model = OpenAiClient::new(api_key, cfg.model.clone())?;
    let query = MailQuery {
        filter: cfg.query.clone(),
        max_results: cfg.max_results,
    };

    Ok(analyse(&gmail, &model, &query))
}
