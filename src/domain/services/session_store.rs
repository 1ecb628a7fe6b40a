#[cfg(test)]
#[path = "session_store_test.rs"]
mod tests;

use thiserror::Error;

use crate::domain::models::CompletionPrompt;
use crate::domain::models::CompletionReply;
use crate::domain::models::Exchange;
use crate::domain::models::Identity;
use crate::domain::models::Role;
use crate::domain::models::Turn;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    LoggedOut,
    Idle,
    AwaitingReply,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please type something.")]
    EmptyMessage,
    #[error("Please log in before sending messages.")]
    NotLoggedIn,
    #[error("Still waiting for the last reply.")]
    RequestInFlight,
}

/// State of one interactive session: who is logged in and what has been said.
/// Everything is dropped on logout or reset.
#[derive(Default)]
pub struct SessionStore {
    identity: Option<Identity>,
    history: Vec<Turn>,
    awaiting_reply: bool,
    generation: u64,
}

impl SessionStore {
    pub fn identity(&self) -> Option<&Identity> {
        return self.identity.as_ref();
    }

    pub fn set_identity(&mut self, identity: Identity) {
        tracing::debug!(
            email = %identity.email,
            user_id = %identity.user_id,
            "Session logged in"
        );
        self.identity = Some(identity);
    }

    pub fn clear(&mut self) {
        tracing::debug!(
            turns = self.history.len(),
            awaiting_reply = self.awaiting_reply,
            "Session cleared"
        );

        self.identity = None;
        self.history.clear();
        self.awaiting_reply = false;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Bumped by every `clear`. Work started under an older generation is
    /// stale.
    pub fn generation(&self) -> u64 {
        return self.generation;
    }

    pub fn append_turn(&mut self, role: Role, content: &str) {
        self.history.push(Turn::new(role, content));
    }

    pub fn history(&self) -> &[Turn] {
        return &self.history;
    }

    /// Transcript rows, most recent first.
    pub fn display_log(&self) -> Vec<Exchange> {
        return Exchange::from_turns(&self.history);
    }

    pub fn phase(&self) -> SessionPhase {
        if self.identity.is_none() {
            return SessionPhase::LoggedOut;
        }
        if self.awaiting_reply {
            return SessionPhase::AwaitingReply;
        }

        return SessionPhase::Idle;
    }

    /// Validates a submission and marks the session as waiting on a reply. The
    /// returned prompt carries a snapshot of the history as it is right now.
    pub fn begin_request(&mut self, text: &str) -> Result<CompletionPrompt, ValidationError> {
        match self.phase() {
            SessionPhase::LoggedOut => return Err(ValidationError::NotLoggedIn),
            SessionPhase::AwaitingReply => return Err(ValidationError::RequestInFlight),
            SessionPhase::Idle => {}
        }

        if text.trim().is_empty() {
            return Err(ValidationError::EmptyMessage);
        }

        self.awaiting_reply = true;
        return Ok(CompletionPrompt::new(text, &self.history, self.generation));
    }

    /// Records the user message and its reply. Returns false, leaving the
    /// session untouched, when the prompt was issued before the last clear.
    pub fn complete_request(&mut self, prompt: &CompletionPrompt, reply: &CompletionReply) -> bool {
        if prompt.generation != self.generation {
            tracing::debug!(
                prompt_generation = prompt.generation,
                generation = self.generation,
                "Dropping reply for a cleared session"
            );
            return false;
        }

        self.append_turn(Role::User, &prompt.text);
        self.append_turn(Role::Assistant, &reply.text);
        self.awaiting_reply = false;

        return true;
    }
}
