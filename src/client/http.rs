//! HTTP implementation of the improvement client.
//!
//! `POST {base_url}{improve_path}` with `{ "prompt": ..., "intent"?: ... }`.
//! Success is `{ "improved_prompt": ... }`; failures may carry `{ "error": ... }`.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::client::{ImproveError, ImproveRequest, ImprovedPrompt, ImprovementClient};

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Serialize, Debug)]
struct ImproveBody<'a> {
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    intent: Option<&'static str>,
}

#[derive(Deserialize, Debug)]
struct ImproveResponse {
    improved_prompt: String,
}

#[derive(Deserialize, Debug)]
struct ErrorPayload {
    error: Option<String>,
}

/// Pulls the `error` field out of a failure body. Empty strings count as absent.
fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .and_then(|payload| payload.error)
        .filter(|msg| !msg.is_empty())
}

/// Joins a base URL and an absolute path without doubling the slash.
pub(crate) fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

// ============================================================================
// Client Implementation
// ============================================================================

pub struct HttpImprovementClient {
    endpoint: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpImprovementClient {
    pub fn new(base_url: &str, improve_path: &str, token: Option<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build HTTP client with timeout ({}), using defaults", e);
                reqwest::Client::new()
            });

        Self {
            endpoint: join_url(base_url, improve_path),
            token,
            client,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ImprovementClient for HttpImprovementClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn improve(&self, request: &ImproveRequest) -> Result<ImprovedPrompt, ImproveError> {
        let body = ImproveBody {
            prompt: &request.prompt,
            intent: request.wire_intent(),
        };

        info!(
            "Improve request: endpoint={}, prompt_len={}, intent={:?}",
            self.endpoint,
            request.prompt.chars().count(),
            body.intent
        );

        let mut builder = self.client.post(&self.endpoint).json(&body);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ImproveError::Transport(e.to_string()))?;

        let status = response.status();
        debug!("Improve response status: {}", status);

        if !status.is_success() {
            let err_body = response.text().await.unwrap_or_default();
            let message = error_message(&err_body);
            warn!("Improve failed: {} - {}", status, err_body);
            return Err(if status == StatusCode::BAD_REQUEST {
                ImproveError::Validation { message }
            } else {
                ImproveError::Server {
                    status: status.as_u16(),
                    message,
                }
            });
        }

        let parsed: ImproveResponse = response
            .json()
            .await
            .map_err(|e| ImproveError::Parse(e.to_string()))?;

        info!(
            "Improve succeeded: improved_len={}",
            parsed.improved_prompt.chars().count()
        );
        Ok(ImprovedPrompt {
            improved_text: parsed.improved_prompt,
        })
    }
}
