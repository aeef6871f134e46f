//! Client for a DIAL/OpenAI-compatible `/chat/completions` endpoint.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use ragkit_pipeline::prompt::Message;

pub const DEFAULT_CHAT_ENDPOINT: &str =
    "https://ai-proxy.lab.epam.com/openai/deployments/{deployment}/chat/completions";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    pub endpoint: String,
    pub deployment: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_CHAT_ENDPOINT.to_string(),
            deployment: "gpt-4o".to_string(),
            api_key: None,
            timeout_secs: 60,
        }
    }
}

impl ChatSettings {
    pub fn url(&self) -> String {
        self.endpoint.replace("{deployment}", &self.deployment)
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    messages: &'a [Message],
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct ChatClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl ChatClient {
    /// `None` when no API key is configured.
    pub fn from_settings(settings: &ChatSettings) -> Result<Option<Self>> {
        let Some(api_key) = settings.api_key() else {
            return Ok(None);
        };
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("building chat HTTP client")?;
        Ok(Some(Self { client, url: settings.url(), api_key: api_key.to_string() }))
    }

    pub async fn complete(&self, messages: &[Message]) -> Result<String> {
        debug!(url = %self.url, messages = messages.len(), "chat completion request");
        let response = self
            .client
            .post(&self.url)
            .header("Api-Key", &self.api_key)
            .json(&CompletionRequest { messages })
            .send()
            .await
            .context("chat completion request failed")?;
        let status = response.status();
        let body = response.text().await.context("reading chat completion response")?;
        if !status.is_success() {
            bail!("HTTP {status}: {body}");
        }
        parse_completion(&body)
    }
}

fn parse_completion(body: &str) -> Result<String> {
    let parsed: CompletionResponse = serde_json::from_str(body).context("malformed chat completion response")?;
    let choice = parsed.choices.into_iter().next().context("no choice in the chat completion response")?;
    Ok(choice.message.content.unwrap_or_default())
}
