//! Language-model oracle: chat-completions transport and the value-proposing
//! capability the grounding loop talks to.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::proposal::{extract_proposal, strip_proposal_lines, Proposal};

pub const GROUNDING_SYSTEM_PROMPT: &str = "You are helping the user convert a concept into a single numeric value. \
Use concise, friendly English. Ask clarifying questions until you have enough information. \
When you can propose a final value, include these exact lines at the end of your message:\n\
FINAL_NUMBER=<plain numeric literal, optionally scientific notation>\n\
FINAL_UNIT=<short unit label>\n\
Do not stop asking questions until a meaningful number is possible.";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Stateless request/response access to a chat model.
#[async_trait]
pub trait ChatOracle: Send + Sync {
    /// Sends `[system] + history` and returns the reply text.
    async fn ask(&self, system_prompt: &str, history: &[ChatMessage]) -> Result<String>;
}

/// OpenAI-compatible `/chat/completions` client.
pub struct OpenAiOracle {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl OpenAiOracle {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            endpoint: format!("{}/chat/completions", config.base_url),
        }
    }
}

fn build_messages(system_prompt: &str, history: &[ChatMessage]) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(ChatMessage::system(system_prompt));
    messages.extend_from_slice(history);
    messages
}

fn reply_text(response: ChatCompletionResponse) -> String {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .unwrap_or_default()
}

fn provider_error_message(body: &str) -> Option<String> {
    let v: Value = serde_json::from_str(body).ok()?;
    v.get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
        .map(str::to_string)
}

#[async_trait]
impl ChatOracle for OpenAiOracle {
    #[instrument(skip_all, fields(model = %self.model, turns = history.len()))]
    async fn ask(&self, system_prompt: &str, history: &[ChatMessage]) -> Result<String> {
        let request_body = ChatRequest {
            model: &self.model,
            messages: build_messages(system_prompt, history),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .context("Oracle request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = provider_error_message(&body).unwrap_or(body);
            return Err(anyhow!("Oracle returned {status}: {detail}"));
        }

        let parsed = response
            .json::<ChatCompletionResponse>()
            .await
            .context("Could not parse oracle response as JSON")?;
        let text = reply_text(parsed);
        debug!(chars = text.len(), "oracle replied");
        Ok(text)
    }
}

/// One oracle turn, split into what is kept, what is shown, and what is proposed.
#[derive(Debug, Clone, PartialEq)]
pub struct OracleReply {
    /// Verbatim reply, kept in the conversation history.
    pub raw: String,
    /// Reply with the sentinel lines removed.
    pub display: String,
    pub proposal: Option<Proposal>,
}

impl OracleReply {
    pub fn from_raw(raw: String) -> Self {
        Self {
            display: strip_proposal_lines(&raw),
            proposal: extract_proposal(&raw),
            raw,
        }
    }
}

/// Something that can propose a value for a conversation so far.
#[async_trait]
pub trait ValueOracle: Send + Sync {
    async fn propose(&self, history: &[ChatMessage]) -> Result<OracleReply>;
}

/// [`ValueOracle`] over a chat model using the `FINAL_NUMBER=` marker protocol.
pub struct MarkerOracle<C> {
    chat: C,
    system_prompt: String,
}

impl<C: ChatOracle> MarkerOracle<C> {
    pub fn new(chat: C) -> Self {
        Self {
            chat,
            system_prompt: GROUNDING_SYSTEM_PROMPT.to_string(),
        }
    }
}

#[async_trait]
impl<C: ChatOracle> ValueOracle for MarkerOracle<C> {
    async fn propose(&self, history: &[ChatMessage]) -> Result<OracleReply> {
        let raw = self.chat.ask(&self.system_prompt, history).await?;
        Ok(OracleReply::from_raw(raw))
    }
}
