#[cfg(test)]
#[path = "huggingface_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Completion;
use crate::domain::models::CompletionError;
use crate::domain::models::CompletionPrompt;
use crate::domain::models::Turn;
use crate::domain::models::MAX_TOKENS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<Turn>,
    max_tokens: u32,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CompletionMessageResponse {
    content: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CompletionChoiceResponse {
    message: CompletionMessageResponse,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoiceResponse>,
}

fn extract_reply(body: &str) -> Result<String, CompletionError> {
    let res: CompletionResponse = serde_json::from_str(body).map_err(|err| {
        return CompletionError::Format {
            body: body.to_string(),
            reason: err.to_string(),
        };
    })?;

    if let Some(choice) = res.choices.into_iter().next() {
        return Ok(choice.message.content);
    }

    return Err(CompletionError::Format {
        body: body.to_string(),
        reason: "response has no completion choices".to_string(),
    });
}

/// Chat completions against the Hugging Face router, or any other endpoint
/// speaking the OpenAI `chat/completions` format.
pub struct HuggingFace {
    url: String,
    token: String,
    model: String,
    timeout: String,
}

impl Default for HuggingFace {
    fn default() -> HuggingFace {
        return HuggingFace {
            url: Config::get(ConfigKey::CompletionURL),
            token: Config::get(ConfigKey::CompletionToken),
            model: Config::get(ConfigKey::Model),
            timeout: Config::get(ConfigKey::RequestTimeout),
        };
    }
}

impl HuggingFace {
    fn not_configured(&self) -> Option<&'static str> {
        if self.url.is_empty() {
            return Some("Completion URL is not defined");
        }
        if self.token.is_empty() {
            return Some("Completion token is not defined");
        }
        if self.model.is_empty() {
            return Some("Model is not defined");
        }

        return None;
    }
}

#[async_trait]
impl Completion for HuggingFace {
    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<()> {
        if let Some(reason) = self.not_configured() {
            bail!(reason);
        }
        if let Err(err) = self.timeout.parse::<u64>() {
            bail!("Request timeout '{}' is not a number: {err}", self.timeout);
        }

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn get_completion(&self, prompt: &CompletionPrompt) -> Result<String, CompletionError> {
        if let Some(reason) = self.not_configured() {
            return Err(CompletionError::NotConfigured(reason.to_string()));
        }

        let req = CompletionRequest {
            model: self.model.to_string(),
            messages: prompt.messages(),
            max_tokens: MAX_TOKENS,
        };

        let mut builder = reqwest::Client::new()
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Content-Type", "application/json")
            .json(&req);

        if let Ok(timeout) = self.timeout.parse::<u64>() {
            if timeout > 0 {
                builder = builder.timeout(Duration::from_millis(timeout));
            }
        }

        tracing::debug!(
            model = %req.model,
            messages = req.messages.len(),
            "Sending completion request"
        );

        let res = builder.send().await.map_err(|err| {
            return CompletionError::Transport(err.to_string());
        })?;

        let status = res.status().as_u16();
        let body = res.text().await.map_err(|err| {
            return CompletionError::Transport(err.to_string());
        })?;
        tracing::debug!(status = status, body = %body, "Completion response");

        if !(200..300).contains(&status) {
            // A completion body wins over the status.
            if let Ok(text) = extract_reply(&body) {
                return Ok(text);
            }
            return Err(CompletionError::Status { status, body });
        }

        return extract_reply(&body);
    }
}
