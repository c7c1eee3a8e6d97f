//! External itinerary generation service.
//!
//! The planner talks to the service through the [`PlanService`] trait, so the
//! engine can run against the real messages API or a mock in tests.

mod client;
mod prompt;
mod types;

use async_trait::async_trait;

use crate::error::ServiceError;

pub use client::AnthropicClient;
pub use prompt::PromptBuilder;
pub use types::{ContentBlock, Message, MessagesRequest, MessagesResponse};

/// A text-in, text-out plan generation backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlanService: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Sends a prompt and returns the raw reply text.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if the backend cannot produce a reply.
    async fn complete(&self, prompt: &str) -> Result<String, ServiceError>;
}
