use thiserror::Error;

use crate::store::StoreError;

/// Fatal failures of one pipeline run.
///
/// Everything here aborts the run with the schedule untouched; per-image
/// failures never reach this type (they degrade to missing images), and a
/// not-due schedule is an informational outcome, not an error.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Manual trigger without a resolvable caller credential.
    #[error("manual generation requires a valid caller credential")]
    Unauthorized,

    /// Caller resolved but does not hold the administrative role.
    #[error("caller lacks the administrative role")]
    Forbidden,

    /// The text-generation model failed or returned an unusable structure.
    #[error("content generation failed: {0}")]
    Generation(#[from] pepgen_genai::GenAiError),

    /// A read or the article insert against the backing store failed.
    #[error("persistence failed: {0}")]
    Store(#[from] StoreError),
}
