//! w4tt-core: greedy assignment of pending tasks to business-hours slots.
//!
//! The engine is synchronous and stateless between calls. Everything a run
//! needs (config, tasks, busy periods, `now`) is passed in explicitly.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod request;
pub mod scheduler;
pub mod slots;
pub mod task;
pub mod time;

pub use analyzer::TaskAnalyzer;
pub use config::{DurationBonus, SchedulerConfig};
pub use error::{ConfigError, ParseError, RequestError};
pub use request::AssignRequest;
pub use scheduler::{Assignment, LocalSpan, RankedTask, Scheduler};
pub use slots::{Interval, SlotGenerator};
pub use task::{BusySlot, Task};
pub use time::{TimeConverter, parse_timestamp};
