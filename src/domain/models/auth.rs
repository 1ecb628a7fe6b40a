use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

use super::Credentials;
use super::Identity;

/// Shown for every failed login. Provider details only go to the debug log.
pub const INVALID_LOGIN_NOTICE: &str = "❌ Invalid email or password";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Authentication provider is not configured: {0}")]
    NotConfigured(String),
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),
    #[error("Authentication provider is unreachable: {0}")]
    Transport(String),
    #[error("Authentication provider returned an unexpected response: {0}")]
    UnexpectedResponse(String),
}

#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Used at startup to verify all configurations are available to work with
    /// the provider.
    async fn health_check(&self) -> Result<()>;

    async fn sign_in(&self, credentials: &Credentials) -> Result<Identity, AuthError>;
}

pub type AuthenticatorBox = Box<dyn Authenticator>;
