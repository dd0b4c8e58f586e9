pub mod auth;
pub mod health;
pub mod http;
pub mod provider;

pub use auth::{AuthError, AuthGate, Credentials};
pub use health::{HealthChecker, HealthPolicy, HealthStatus};
pub use http::HttpImprovementClient;
pub use provider::{ImproveError, ImproveRequest, ImprovedPrompt, ImprovementClient};
