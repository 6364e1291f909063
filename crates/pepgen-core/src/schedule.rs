//! Recurrence schedule for automatic article generation.
//!
//! One row per deployment, edited by an external settings form. The pipeline
//! only ever mutates `last_run_at`/`next_run_at`, and only after a completed
//! run.

use chrono::{DateTime, NaiveTime, Utc};

/// How often the automatic pipeline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekly,
}

impl Frequency {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
        }
    }

    /// Parse a stored frequency value. Returns `None` for unknown values.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "daily" => Some(Frequency::Daily),
            "weekly" => Some(Frequency::Weekly),
            _ => None,
        }
    }
}

/// Requested article length, mapped to a word-count range used to steer the
/// generator. The range is prompt guidance only — never enforced against the
/// returned draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetLength {
    Short,
    Standard,
    Long,
}

impl TargetLength {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TargetLength::Short => "short",
            TargetLength::Standard => "standard",
            TargetLength::Long => "long",
        }
    }

    /// Parse a stored target-length value. Returns `None` for unknown values.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "short" => Some(TargetLength::Short),
            "standard" => Some(TargetLength::Standard),
            "long" => Some(TargetLength::Long),
            _ => None,
        }
    }

    /// Word-count range used in the generation prompt.
    #[must_use]
    pub fn word_range(self) -> (u32, u32) {
        match self {
            TargetLength::Short => (600, 900),
            TargetLength::Standard => (1_200, 1_800),
            TargetLength::Long => (2_200, 3_000),
        }
    }
}

/// The recurrence configuration and due-date bookkeeping for automatic runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub id: i64,
    pub active: bool,
    pub frequency: Frequency,
    /// 0–6 (Sunday-based), meaningful only when `frequency` is weekly.
    /// The controller stores it for the settings UI but never re-aligns to
    /// it: weekly runs repeat 7 days from the last run.
    pub day_of_week: Option<i16>,
    /// Time of day in UTC applied to each computed next run.
    pub time_of_day: NaiveTime,
    pub target_length: TargetLength,
    /// Free-text steering passed through to the topic and article prompts.
    pub additional_context: Option<String>,
    pub last_run_at: Option<DateTime<Utc>>,
    pub next_run_at: Option<DateTime<Utc>>,
}
