use super::CompletionPrompt;
use super::Credentials;

#[derive(Debug)]
pub enum Action {
    CompletionRequest(CompletionPrompt),
    /// Credentials plus the session generation they were submitted under.
    LoginRequest(Credentials, u64),
}
