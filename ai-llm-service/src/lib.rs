//! Shared OpenAI access for the feasibility workspace.
//!
//! - [`service_profiles::LlmServiceProfiles`] owns the quick/deep/embedding profiles.
//! - [`chat::ChatCompletion`] is the seam the assessment engines call through.
//! - [`health_service`] probes the profiles for the status endpoint.

pub mod chat;
pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod service_profiles;
pub mod services;
pub mod telemetry;

pub use chat::{ChatCompletion, ChatFuture, ProfileChat};
pub use error_handler::AiLlmError;
pub use health_service::HealthStatus;
pub use service_profiles::{LlmRole, LlmServiceProfiles};
