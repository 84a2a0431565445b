pub mod fetcher;
pub mod gmail;

pub use fetcher::{FetchReport, MailQuery, MessageFetch, fetch};
pub use gmail::{GmailClient, MailService};
