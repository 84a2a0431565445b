//! Gmail API v1 over blocking reqwest.

use anyhow::{Result, anyhow};
use serde::Deserialize;
use std::time::Duration;

use crate::auth::AuthHandle;

const API_BASE: &str = "https://gmail.googleapis.com/gmail/v1/users/me";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageListResponse {
    #[serde(default)]
    messages: Vec<MessageStub>,
}

#[derive(Debug, Deserialize)]
struct MessageStub {
    id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageDetail {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub payload: Option<MessagePayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessagePayload {
    #[serde(default)]
    pub headers: Vec<Header>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Header {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl MessageDetail {
    /// First header with this name, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.payload
            .as_ref()?
            .headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }
}

/// What the fetcher needs from a mail provider.
pub trait MailService {
    fn list_message_ids(&self, query: &str, max_results: u32) -> Result<Vec<String>>;
    fn get_message(&self, id: &str) -> Result<MessageDetail>;
}

pub struct GmailClient {
    http: reqwest::blocking::Client,
    access_token: String,
}

impl GmailClient {
    pub fn new(auth: &AuthHandle) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            access_token: auth.access_token().to_string(),
        })
    }

    fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let resp = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .query(query)
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(anyhow!("Gmail API error {}: {}", status.as_u16(), body));
        }
        Ok(resp.json()?)
    }
}

impl MailService for GmailClient {
    fn list_message_ids(&self, query: &str, max_results: u32) -> Result<Vec<String>> {
        let max = max_results.to_string();
        let list: MessageListResponse = self.get_json(
            &format!("{API_BASE}/messages"),
            &[("q", query), ("maxResults", max.as_str())],
        )?;
        Ok(list.messages.into_iter().map(|m| m.id).collect())
    }

    fn get_message(&self, id: &str) -> Result<MessageDetail> {
        self.get_json(
            &format!("{API_BASE}/messages/{id}"),
            &[
                ("format", "metadata"),
                ("metadataHeaders", "From"),
                ("metadataHeaders", "Subject"),
            ],
        )
    }
}
