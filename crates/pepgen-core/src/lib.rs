//! Shared configuration and domain types for pepgen.
//!
//! Holds the env-driven [`AppConfig`], the content model for generated
//! articles ([`ContentBlock`], [`ArticleDraft`]), and the recurrence
//! schedule types consumed by the pipeline.

mod app_config;
pub mod catalog;
mod config;
pub mod content;
pub mod schedule;

pub use app_config::{AppConfig, Environment};
pub use catalog::{Category, Peptide};
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use content::{
    slugify, ArticleDraft, CalloutVariant, ContentBlock, ContentImage, GeneratedImages,
    NewArticle, TocEntry,
};
pub use schedule::{Frequency, Schedule, TargetLength};
