//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;
use async_trait::async_trait;

use crate::client::{ImproveError, ImproveRequest, ImprovedPrompt, ImprovementClient};

/// A client for tests that never touch the network. Echoes the prompt back.
pub struct EchoClient;

#[async_trait]
impl ImprovementClient for EchoClient {
    fn name(&self) -> &str {
        "echo"
    }

    async fn improve(&self, request: &ImproveRequest) -> Result<ImprovedPrompt, ImproveError> {
        Ok(ImprovedPrompt {
            improved_text: request.prompt.clone(),
        })
    }
}

/// Creates a test App with an EchoClient.
pub fn test_app() -> crate::core::state::App {
    crate::core::state::App::new(Arc::new(EchoClient), "test-backend".to_string())
}
