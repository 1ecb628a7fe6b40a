#[cfg(test)]
#[path = "completion_test.rs"]
mod tests;

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

use super::Turn;

/// Prefix for replies that carry a failure instead of model output.
pub const ERROR_MARKER: &str = "❌ Error: ";

/// Upper bound of generated tokens requested for every reply.
pub const MAX_TOKENS: u32 = 200;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
    #[error("❌ Error: {0}")]
    NotConfigured(String),
    #[error("❌ Error: {0}")]
    Transport(String),
    #[error("❌ Error: {body}")]
    Status { status: u16, body: String },
    #[error("❌ Error: {body}")]
    Format { body: String, reason: String },
}

impl CompletionError {
    pub fn kind(&self) -> &'static str {
        return match self {
            CompletionError::NotConfigured(_) => "not_configured",
            CompletionError::Transport(_) => "transport",
            CompletionError::Status { .. } => "status",
            CompletionError::Format { .. } => "format",
        };
    }
}

/// A message on its way to the completion endpoint, along with the history
/// it's sent with. `generation` ties the request to the session incarnation
/// that issued it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionPrompt {
    pub text: String,
    pub history: Vec<Turn>,
    pub generation: u64,
}

impl CompletionPrompt {
    pub fn new(text: &str, history: &[Turn], generation: u64) -> CompletionPrompt {
        return CompletionPrompt {
            text: text.to_string(),
            history: history.to_vec(),
            generation,
        };
    }

    /// The history in order with the new user message as the last entry.
    pub fn messages(&self) -> Vec<Turn> {
        let mut messages = self.history.clone();
        messages.push(Turn::user(&self.text));

        return messages;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReplyType {
    Normal,
    Error,
}

/// Always displayable output of a completion request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionReply {
    pub text: String,
    pub rtype: ReplyType,
}

impl CompletionReply {
    pub fn from_result(res: Result<String, CompletionError>) -> CompletionReply {
        return match res {
            Ok(text) => CompletionReply {
                text,
                rtype: ReplyType::Normal,
            },
            Err(err) => {
                tracing::warn!(kind = err.kind(), error = ?err, "Completion request failed");
                CompletionReply {
                    text: err.to_string(),
                    rtype: ReplyType::Error,
                }
            }
        };
    }

    pub fn is_error(&self) -> bool {
        return self.rtype == ReplyType::Error;
    }
}

#[async_trait]
pub trait Completion: Send + Sync {
    /// Used at startup to verify all configurations are available to work with
    /// the completion endpoint.
    async fn health_check(&self) -> Result<()>;

    /// Sends the prompt and its history to the endpoint and extracts the
    /// reply text.
    async fn get_completion(&self, prompt: &CompletionPrompt) -> Result<String, CompletionError>;

    /// Same as `get_completion`, except failures are folded into the reply
    /// text so the caller always has something to show.
    async fn query(&self, prompt: &CompletionPrompt) -> CompletionReply {
        let res = self.get_completion(prompt).await;
        return CompletionReply::from_result(res);
    }
}

pub type CompletionBox = Box<dyn Completion>;
