use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ai::{BriefingError, CompletionClient};
use crate::auth::ApiKey;

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    response_format: ResponseFormat,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat completions in JSON-object mode; one attempt per call.
pub struct OpenAiClient {
    http: reqwest::blocking::Client,
    api_key: ApiKey,
    model: String,
    endpoint: String,
}

impl OpenAiClient {
    pub fn new(api_key: ApiKey, model: impl Into<String>) -> Result<Self, BriefingError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;
        Ok(Self {
            http,
            api_key,
            model: model.into(),
            endpoint: CHAT_COMPLETIONS_URL.to_string(),
        })
    }
}

fn request_body<'a>(model: &'a str, system: &'a str, user: &'a str) -> ChatRequest<'a> {
    ChatRequest {
        model,
        response_format: ResponseFormat {
            kind: "json_object",
        },
        messages: [
            ChatMessage {
                role: "system",
                content: system,
            },
            ChatMessage {
                role: "user",
                content: user,
            },
        ],
    }
}

fn first_content(body: &str) -> Result<String, BriefingError> {
    let resp: ChatResponse = serde_json::from_str(body)?;
    resp.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or(BriefingError::EmptyResponse)
}

impl CompletionClient for OpenAiClient {
    fn complete_json(&self, system: &str, user: &str) -> Result<String, BriefingError> {
        log::debug!("Requesting completion from {} ({})", self.endpoint, self.model);
        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose())
            .json(&request_body(&self.model, system, user))
            .send()?;

        let status = resp.status();
        let body = resp.text()?;
        if !status.is_success() {
            return Err(BriefingError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        first_content(&body)
    }
}
