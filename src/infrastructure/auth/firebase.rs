#[cfg(test)]
#[path = "firebase_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::AuthError;
use crate::domain::models::Authenticator;
use crate::domain::models::Credentials;
use crate::domain::models::Identity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest {
    email: String,
    password: String,
    return_secure_token: bool,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    #[serde(default)]
    email: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ErrorDetail {
    message: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

/// Email and password sign in through the Firebase Identity Toolkit REST API.
pub struct Firebase {
    url: String,
    api_key: String,
    timeout: String,
}

impl Default for Firebase {
    fn default() -> Firebase {
        return Firebase {
            url: Config::get(ConfigKey::AuthURL),
            api_key: Config::get(ConfigKey::FirebaseApiKey),
            timeout: Config::get(ConfigKey::RequestTimeout),
        };
    }
}

#[async_trait]
impl Authenticator for Firebase {
    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<()> {
        if self.url.is_empty() {
            bail!("Firebase auth URL is not defined");
        }
        if self.api_key.is_empty() {
            bail!("Firebase API key is not defined");
        }

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn sign_in(&self, credentials: &Credentials) -> Result<Identity, AuthError> {
        if self.api_key.is_empty() {
            return Err(AuthError::NotConfigured(
                "Firebase API key is not defined".to_string(),
            ));
        }

        let req = SignInRequest {
            email: credentials.email.trim().to_string(),
            password: credentials.password.to_string(),
            return_secure_token: true,
        };

        let mut builder = reqwest::Client::new()
            .post(format!(
                "{url}/v1/accounts:signInWithPassword",
                url = self.url
            ))
            .query(&[("key", &self.api_key)])
            .header("Content-Type", "application/json")
            .json(&req);

        if let Ok(timeout) = self.timeout.parse::<u64>() {
            if timeout > 0 {
                builder = builder.timeout(Duration::from_millis(timeout));
            }
        }

        let res = builder.send().await.map_err(|err| {
            return AuthError::Transport(err.to_string());
        })?;

        let status = res.status().as_u16();
        let body = res.text().await.map_err(|err| {
            return AuthError::Transport(err.to_string());
        })?;

        if !(200..300).contains(&status) {
            let message = match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(err_res) => err_res.error.message,
                Err(_) => body,
            };
            tracing::warn!(status = status, message = %message, "Firebase sign in rejected");

            if (400..500).contains(&status) {
                return Err(AuthError::InvalidCredentials(message));
            }
            return Err(AuthError::UnexpectedResponse(message));
        }

        let sign_in: SignInResponse = serde_json::from_str(&body).map_err(|err| {
            return AuthError::UnexpectedResponse(err.to_string());
        })?;

        let mut email = sign_in.email;
        if email.is_empty() {
            email = req.email;
        }

        return Ok(Identity::new(&email, &sign_in.local_id));
    }
}
