use anyhow::Result;

use crate::domain::email::EmailSummary;
use crate::mail::gmail::{MailService, MessageDetail};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailQuery {
    pub filter: String,
    pub max_results: u32,
}

/// Outcome for a single matched message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageFetch {
    Fetched(EmailSummary),
    Failed { id: String, reason: String },
}

/// Per-message results in provider order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    pub items: Vec<MessageFetch>,
}

impl FetchReport {
    pub fn matched(&self) -> usize {
        self.items.len()
    }

    pub fn summaries(&self) -> impl Iterator<Item = &EmailSummary> {
        self.items.iter().filter_map(|it| match it {
            MessageFetch::Fetched(s) => Some(s),
            MessageFetch::Failed { .. } => None,
        })
    }

    pub fn failed(&self) -> usize {
        self.items
            .iter()
            .filter(|it| matches!(it, MessageFetch::Failed { .. }))
            .count()
    }

    /// Nothing to report: no match, or every message failed.
    pub fn is_empty(&self) -> bool {
        self.summaries().next().is_none()
    }

    pub fn into_summaries(self) -> Vec<EmailSummary> {
        self.items
            .into_iter()
            .filter_map(|it| match it {
                MessageFetch::Fetched(s) => Some(s),
                MessageFetch::Failed { .. } => None,
            })
            .collect()
    }
}

/// List matching messages and fetch each one in turn. A failed
/// per-message fetch is recorded and skipped; a failed list call is an error.
pub fn fetch(service: &dyn MailService, query: &MailQuery) -> Result<FetchReport> {
    let ids = service.list_message_ids(&query.filter, query.max_results)?;
    log::info!("{} messages match '{}'", ids.len(), query.filter);

    let mut items = Vec::with_capacity(ids.len());
    for id in ids {
        match service.get_message(&id) {
            Ok(detail) => items.push(MessageFetch::Fetched(summarize_message(&detail))),
            Err(e) => {
                log::debug!("Skipping message {id}: {e}");
                items.push(MessageFetch::Failed {
                    id,
                    reason: e.to_string(),
                });
            }
        }
    }

    let report = FetchReport { items };
    if report.failed() > 0 {
        log::warn!(
            "{} of {} messages could not be fetched",
            report.failed(),
            report.matched()
        );
    }
    Ok(report)
}

fn summarize_message(detail: &MessageDetail) -> EmailSummary {
    EmailSummary::new(
        detail.header("From").map(str::to_string),
        detail.header("Subject").map(str::to_string),
        detail.snippet.clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::gmail::{Header, MessagePayload};
    use anyhow::anyhow;
    use std::cell::RefCell;

    struct FakeMailbox {
        ids: Vec<&'static str>,
        broken: Vec<&'static str>,
        list_fails: bool,
        requested: RefCell<Vec<(String, u32)>>,
    }

    impl FakeMailbox {
        fn new(ids: Vec<&'static str>, broken: Vec<&'static str>) -> Self {
            Self {
                ids,
                broken,
                list_fails: false,
                requested: RefCell::new(Vec::new()),
            }
        }
    }

    impl MailService for FakeMailbox {
        fn list_message_ids(&self, query: &str, max_results: u32) -> Result<Vec<String>> {
            self.requested
                .borrow_mut()
                .push((query.to_string(), max_results));
            if self.list_fails {
                return Err(anyhow!("Gmail API error 401"));
            }
            Ok(self.ids.iter().map(|s| s.to_string()).collect())
        }

        fn get_message(&self, id: &str) -> Result<MessageDetail> {
            if self.broken.iter().any(|b| *b == id) {
                return Err(anyhow!("Gmail API error 404"));
            }
            Ok(MessageDetail {
                id: id.to_string(),
                snippet: format!("snippet {id}"),
                payload: Some(MessagePayload {
                    headers: vec![Header {
                        name: "Subject".into(),
                        value: format!("subject {id}"),
                    }],
                }),
            })
        }
    }

    fn query() -> MailQuery {
        MailQuery {
            filter: "newer_than:1d".into(),
            max_results: 100,
        }
    }

    #[test]
    fn failures_are_dropped_and_order_kept() {
        let mailbox = FakeMailbox::new(vec!["m1", "m2", "m3", "m4", "m5"], vec!["m2", "m4"]);

        let report = fetch(&mailbox, &query()).unwrap();

        assert_eq!(report.matched(), 5);
        assert_eq!(report.failed(), 2);
        let subjects: Vec<_> = report.summaries().map(|s| s.subject.as_str()).collect();
        assert_eq!(subjects, vec!["subject m1", "subject m3", "subject m5"]);
        assert_eq!(report.into_summaries().len(), 3);
    }

    #[test]
    fn uses_configured_query() {
        let mailbox = FakeMailbox::new(vec![], vec![]);
        fetch(&mailbox, &query()).unwrap();
        assert_eq!(
            mailbox.requested.borrow().as_slice(),
            &[("newer_than:1d".to_string(), 100)]
        );
    }

    #[test]
    fn no_matches_is_empty_not_error() {
        let mailbox = FakeMailbox::new(vec![], vec![]);
        let report = fetch(&mailbox, &query()).unwrap();
        assert!(report.is_empty());
        assert_eq!(report.matched(), 0);
    }

    #[test]
    fn missing_from_header_uses_placeholder() {
        let mailbox = FakeMailbox::new(vec!["m1"], vec![]);
        let report = fetch(&mailbox, &query()).unwrap();
        let first = report.summaries().next().unwrap();
        assert_eq!(first.sender, "Unknown");
        assert_eq!(first.snippet, "snippet m1");
    }

    #[test]
    fn list_failure_propagates() {
        let mut mailbox = FakeMailbox::new(vec!["m1"], vec![]);
        mailbox.list_fails = true;
        assert!(fetch(&mailbox, &query()).is_err());
    }

    #[test]
    fn all_failed_counts_as_empty() {
        let mailbox = FakeMailbox::new(vec!["m1"], vec!["m1"]);
        let report = fetch(&mailbox, &query()).unwrap();
        assert!(report.is_empty());
        assert_eq!(report.failed(), 1);
    }
}
