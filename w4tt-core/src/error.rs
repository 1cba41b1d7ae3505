//! Error types for the assignment engine.
//!
//! The engine itself never fails at runtime: parse failures on busy slots are
//! absorbed during ingestion. These types surface at the edges instead
//! (configuration validation, request decoding, explicit timestamp parsing).

use thiserror::Error;

/// A timestamp string could not be turned into an instant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unrecognized timestamp '{input}'")]
    Malformed { input: String },

    #[error("invalid calendar date or time in '{input}'")]
    InvalidDateTime { input: String },

    #[error("invalid UTC offset in '{input}'")]
    InvalidOffset { input: String },

    /// The wall-clock time falls into a DST gap of the assumed zone.
    #[error("local time '{input}' does not exist in {zone}")]
    NonexistentLocalTime { input: String, zone: String },
}

/// A configuration invariant does not hold.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("business hours {start}:00-{end}:00 are empty or exceed the day")]
    BusinessHours { start: u32, end: u32 },

    #[error("slot granularity must be within 1..=1440 minutes (got {0})")]
    Granularity(i64),

    #[error("duration bounds are inverted or empty: min={min}, max={max}")]
    DurationBounds { min: i64, max: i64 },

    #[error("max_duration_minutes must not exceed 1440 (got {0})")]
    MaxDuration(i64),

    #[error("base_duration_minutes must be within 0..=1440 (got {0})")]
    BaseDuration(i64),

    #[error("minimum gap must not be negative (got {0} minutes)")]
    NegativeGap(i64),

    #[error("minimum gap must not exceed 1440 minutes (got {0})")]
    GapTooLarge(i64),

    #[error("bonus.{name} must be within 0..={max} minutes (got {value})")]
    Bonus {
        name: &'static str,
        value: i64,
        max: i64,
    },

    #[error("max_tasks_per_day must be at least 1")]
    TasksPerDay,

    #[error("horizon_days must be at least 1")]
    Horizon,

    #[error("candidate_cap must be at least 1")]
    CandidateCap,
}

/// The `{tasks, slots}` request body failed structural validation.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("request body is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("the 'tasks' and 'slots' lists are required")]
    MissingLists,

    #[error("'tasks' and 'slots' must be arrays")]
    NotArrays,

    #[error("tasks[{index}] is malformed: {source}")]
    InvalidTask {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("slots[{index}] is malformed: {source}")]
    InvalidSlot {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}
