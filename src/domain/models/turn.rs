#[cfg(test)]
#[path = "turn_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single message in the conversation. Turns are replayed verbatim to the
/// completion endpoint, so they can't be edited after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    role: Role,
    content: String,
}

impl Turn {
    pub fn new(role: Role, content: &str) -> Turn {
        return Turn {
            role,
            content: content.to_string(),
        };
    }

    pub fn user(content: &str) -> Turn {
        return Turn::new(Role::User, content);
    }

    pub fn assistant(content: &str) -> Turn {
        return Turn::new(Role::Assistant, content);
    }

    pub fn role(&self) -> Role {
        return self.role;
    }

    pub fn content(&self) -> &str {
        return &self.content;
    }
}

/// One row of the transcript: what the user asked and what came back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Exchange {
    pub prompt: String,
    pub reply: Option<String>,
}

impl Exchange {
    /// Pairs every user turn with the assistant turn following it, most
    /// recent first. Assistant turns without a preceding user turn are
    /// skipped.
    pub fn from_turns(turns: &[Turn]) -> Vec<Exchange> {
        let mut exchanges: Vec<Exchange> = vec![];

        for turn in turns {
            match turn.role() {
                Role::User => {
                    exchanges.push(Exchange {
                        prompt: turn.content().to_string(),
                        reply: None,
                    });
                }
                Role::Assistant => {
                    if let Some(last) = exchanges.last_mut() {
                        if last.reply.is_none() {
                            last.reply = Some(turn.content().to_string());
                        }
                    }
                }
            }
        }

        exchanges.reverse();
        return exchanges;
    }
}
