//! Store seams between the pipeline and its collaborators.
//!
//! The orchestrator never touches a database directly: schedule bookkeeping
//! goes through [`ScheduleStore`] and the content reads/writes through
//! [`ContentStore`]. Production wires these to Postgres; tests use in-memory
//! implementations.

use async_trait::async_trait;
use pepgen_core::{Category, NewArticle, Peptide, Schedule};
use thiserror::Error;
use uuid::Uuid;

use crate::schedule::RunTimestamps;

/// Failure from a backing store, carrying the underlying message.
#[derive(Debug, Error)]
#[error("store error: {0}")]
pub struct StoreError(pub String);

/// Owns the recurrence schedule row. Only `load` and `save_run` exist —
/// every other schedule column belongs to the external settings form.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Load the schedule, if one has been configured.
    async fn load(&self) -> Result<Option<Schedule>, StoreError>;

    /// Record a completed run's `last_run_at`/`next_run_at`.
    async fn save_run(&self, id: i64, run: &RunTimestamps) -> Result<(), StoreError>;
}

/// Read-side collaborators and the persistence sink for generated articles.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Titles of the most recent articles, newest first, bounded by `limit`.
    async fn recent_titles(&self, limit: i64) -> Result<Vec<String>, StoreError>;

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    async fn list_peptides(&self) -> Result<Vec<Peptide>, StoreError>;

    /// Insert the generated article, returning its id.
    async fn insert_article(&self, article: &NewArticle) -> Result<i64, StoreError>;

    /// Insert a new category definition. Duplicate inserts are expected to
    /// fail; the caller swallows and logs that.
    async fn insert_category(&self, slug: &str, label: &str) -> Result<(), StoreError>;

    /// Whether the user holds the administrative role.
    async fn caller_is_admin(&self, user_id: Uuid) -> Result<bool, StoreError>;
}
