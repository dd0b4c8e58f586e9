//! Backend readiness check run by the startup screen.
//!
//! Polls `GET {base_url}{health_path}` until it answers 2xx. Failed attempts
//! (non-2xx or unreachable) are retried after a fixed interval, forever.
//! After the first success there is a short settle delay before the caller
//! is told to proceed.

use std::time::Duration;

use log::{debug, info};

use crate::client::http::join_url;

pub const HEALTH_RETRY_INTERVAL: Duration = Duration::from_secs(2);
pub const READY_SETTLE_DELAY: Duration = Duration::from_millis(800);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthPolicy {
    pub retry_interval: Duration,
    pub settle_delay: Duration,
}

impl Default for HealthPolicy {
    fn default() -> Self {
        Self {
            retry_interval: HEALTH_RETRY_INTERVAL,
            settle_delay: READY_SETTLE_DELAY,
        }
    }
}

/// Progress reported while waiting for the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    /// First attempt in flight.
    Checking,
    /// An attempt failed; the next one starts after the retry interval.
    Retrying { failed_attempts: u32 },
    /// Backend answered 2xx. Settle delay is running.
    Ready,
}

pub struct HealthChecker {
    url: String,
    policy: HealthPolicy,
    client: reqwest::Client,
}

impl HealthChecker {
    pub fn new(base_url: &str, health_path: &str, policy: HealthPolicy) -> Self {
        Self {
            url: join_url(base_url, health_path),
            policy,
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Single attempt. True only for a 2xx answer.
    pub async fn probe(&self) -> bool {
        match self.client.get(&self.url).send().await {
            Ok(response) => {
                debug!("Health probe {}: {}", self.url, response.status());
                response.status().is_success()
            }
            Err(e) => {
                debug!("Health probe {} failed: {}", self.url, e);
                false
            }
        }
    }

    /// Blocks (asynchronously) until the backend is healthy and the settle
    /// delay has passed. Returns the number of attempts made.
    pub async fn wait_until_ready(&self, mut on_status: impl FnMut(HealthStatus)) -> u32 {
        on_status(HealthStatus::Checking);
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            if self.probe().await {
                break;
            }
            on_status(HealthStatus::Retrying {
                failed_attempts: attempts,
            });
            tokio::time::sleep(self.policy.retry_interval).await;
        }

        info!("Backend healthy after {} attempt(s)", attempts);
        on_status(HealthStatus::Ready);
        tokio::time::sleep(self.policy.settle_delay).await;
        attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_matches_startup_timing() {
        let policy = HealthPolicy::default();
        assert_eq!(policy.retry_interval, Duration::from_secs(2));
        assert_eq!(policy.settle_delay, Duration::from_millis(800));
    }

    #[test]
    fn url_is_joined() {
        let checker = HealthChecker::new("http://localhost:5000/", "/api/health", HealthPolicy::default());
        assert_eq!(checker.url(), "http://localhost:5000/api/health");
    }
}
