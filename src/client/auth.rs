//! Auth collaborator: the token gate in front of the chat, and account signup.

use std::fmt;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::client::http::join_url;

pub const SIGNUP_PATH: &str = "/api/auth/signup";
const SIGNUP_FALLBACK_MESSAGE: &str = "Signup failed";

/// Decides whether the chat may be entered.
#[derive(Debug, Clone, Default)]
pub struct AuthGate {
    token: Option<String>,
}

impl AuthGate {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

#[derive(Serialize)]
pub struct Credentials {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Debug)]
struct SignupResponse {
    token: String,
}

#[derive(Deserialize, Debug)]
struct SignupErrorPayload {
    message: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthError {
    /// Backend refused the signup (non-2xx).
    Rejected { status: u16, message: Option<String> },
    Transport(String),
    Parse(String),
}

impl AuthError {
    /// Server's `message` field when present, otherwise a generic failure.
    pub fn user_message(&self) -> &str {
        match self {
            AuthError::Rejected {
                message: Some(message),
                ..
            } => message,
            _ => SIGNUP_FALLBACK_MESSAGE,
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Rejected { status, .. } => {
                write!(f, "signup rejected (HTTP {status}): {}", self.user_message())
            }
            AuthError::Transport(msg) => write!(f, "transport error: {msg}"),
            AuthError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

/// Creates an account and returns the bearer token the backend issues for it.
pub async fn signup(base_url: &str, credentials: &Credentials) -> Result<String, AuthError> {
    let url = join_url(base_url, SIGNUP_PATH);
    info!("Signup request for {} to {}", credentials.email, url);

    let response = reqwest::Client::new()
        .post(&url)
        .json(credentials)
        .send()
        .await
        .map_err(|e| AuthError::Transport(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<SignupErrorPayload>(&body)
            .ok()
            .and_then(|p| p.message)
            .filter(|m| !m.trim().is_empty());
        warn!("Signup rejected: {} - {}", status, body);
        return Err(AuthError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    let parsed: SignupResponse = response
        .json()
        .await
        .map_err(|e| AuthError::Parse(e.to_string()))?;
    Ok(parsed.token)
}
