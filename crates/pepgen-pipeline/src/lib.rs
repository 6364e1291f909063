//! The automated article-generation pipeline.
//!
//! One invocation runs the full sequence: authorization gate, due check,
//! topic selection, article generation, heading/ToC reconciliation, image
//! generation with bounded retries, persistence, and schedule advancement.
//! Failures before persistence leave no side effects; image failures are
//! non-fatal and the article publishes without the missing images.

mod error;
pub mod images;
pub mod orchestrator;
pub mod reconcile;
pub mod schedule;
pub mod storage;
pub mod store;
mod types;

pub use error::PipelineError;
pub use orchestrator::{Pipeline, PipelineConfig};
pub use schedule::{advance, is_due, RunTimestamps};
pub use storage::{StorageClient, StorageConfig, StorageError};
pub use store::{ContentStore, ScheduleStore, StoreError};
pub use types::{Caller, PublishedArticle, RunOutcome, Trigger};
