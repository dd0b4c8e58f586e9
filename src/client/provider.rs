use std::fmt;

use async_trait::async_trait;

use crate::core::intent::Intent;

/// Errors that can occur while asking the backend to improve a prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum ImproveError {
    /// Backend rejected the prompt (HTTP 400), e.g. shorter than the minimum length.
    Validation { message: Option<String> },
    /// Backend unreachable (timeout, DNS, connection refused).
    Transport(String),
    /// Backend answered with a non-2xx other than 400.
    Server { status: u16, message: Option<String> },
    /// Backend answered 2xx but the body was not an improved prompt.
    Parse(String),
}

impl ImproveError {
    /// Message supplied by the backend in its `{ "error": ... }` payload, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ImproveError::Validation { message } | ImproveError::Server { message, .. } => {
                message.as_deref()
            }
            ImproveError::Transport(_) | ImproveError::Parse(_) => None,
        }
    }

    /// True for the 400-equivalent rejection.
    pub fn is_bad_request(&self) -> bool {
        matches!(self, ImproveError::Validation { .. })
    }
}

impl fmt::Display for ImproveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImproveError::Validation { message } => write!(
                f,
                "validation error: {}",
                message.as_deref().unwrap_or("bad request")
            ),
            ImproveError::Transport(msg) => write!(f, "transport error: {msg}"),
            ImproveError::Server { status, message } => write!(
                f,
                "server error (HTTP {status}): {}",
                message.as_deref().unwrap_or("no message")
            ),
            ImproveError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ImproveError {}

/// One improvement call: the prompt plus optional intent context.
#[derive(Debug, Clone, PartialEq)]
pub struct ImproveRequest {
    pub prompt: String,
    /// `None` for edit regenerations; submissions always carry a detected intent.
    pub intent: Option<Intent>,
}

impl ImproveRequest {
    /// Intent as it goes on the wire (omitted for `None` and `Intent::None`).
    pub fn wire_intent(&self) -> Option<&'static str> {
        self.intent.and_then(Intent::as_wire)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImprovedPrompt {
    pub improved_text: String,
}

#[async_trait]
pub trait ImprovementClient: Send + Sync {
    /// Short label for logs and the title bar.
    fn name(&self) -> &str;

    async fn improve(&self, request: &ImproveRequest) -> Result<ImprovedPrompt, ImproveError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_only_from_backend_payloads() {
        let validation = ImproveError::Validation {
            message: Some("too short".into()),
        };
        assert_eq!(validation.server_message(), Some("too short"));

        let server = ImproveError::Server {
            status: 500,
            message: None,
        };
        assert_eq!(server.server_message(), None);
        assert_eq!(ImproveError::Transport("refused".into()).server_message(), None);
    }

    #[test]
    fn only_validation_is_bad_request() {
        assert!(ImproveError::Validation { message: None }.is_bad_request());
        assert!(
            !ImproveError::Server {
                status: 422,
                message: None
            }
            .is_bad_request()
        );
    }

    #[test]
    fn wire_intent_omits_none() {
        let edit = ImproveRequest {
            prompt: "edited".into(),
            intent: None,
        };
        let plain = ImproveRequest {
            prompt: "plain".into(),
            intent: Some(Intent::None),
        };
        let coding = ImproveRequest {
            prompt: "code".into(),
            intent: Some(Intent::Coding),
        };
        assert_eq!(edit.wire_intent(), None);
        assert_eq!(plain.wire_intent(), None);
        assert_eq!(coding.wire_intent(), Some("coding"));
    }

    #[test]
    fn display_includes_status() {
        let err = ImproveError::Server {
            status: 503,
            message: Some("down".into()),
        };
        assert_eq!(err.to_string(), "server error (HTTP 503): down");
    }
}
