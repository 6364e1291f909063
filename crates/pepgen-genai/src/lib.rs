//! Client for an OpenAI-compatible generation API.
//!
//! Three call shapes are used by the pipeline:
//! - topic selection: a chat completion constrained to a JSON object body,
//! - article generation: a tool-schema call whose arguments are the article,
//! - image generation: a chat completion with `modalities: ["image","text"]`
//!   returning a base64 data URL.
//!
//! All responses are deserialized with context-carrying errors so a malformed
//! model reply surfaces as a classified failure, never a stray parse panic.

pub mod article;
mod client;
mod error;
pub mod image;
pub mod retry;
pub mod topic;
mod types;

pub use client::{GenAiClient, GenAiConfig};
pub use error::GenAiError;
pub use retry::{with_retry, RetryOutcome, RetryPolicy};
pub use topic::TopicDecision;
