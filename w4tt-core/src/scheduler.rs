//! Greedy assignment of tasks to business-hours slots.
//!
//! One run:
//! - drop finished tasks (percentComplete >= 100)
//! - rank the rest by score, descending, stable on ties
//! - for each task regenerate the free candidates given everything committed
//!   so far, take the first one long enough or back off to the largest one
//! - commit the meeting so later tasks respect it
//!
//! Nothing here fails: tasks without a feasible slot are simply left out.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::analyzer::TaskAnalyzer;
use crate::config::SchedulerConfig;
use crate::error::ConfigError;
use crate::slots::{Interval, SlotGenerator};
use crate::task::{BusySlot, Task};
use crate::time::{self, TimeConverter};

/// Start/end of the meeting in the business zone, `%Y-%m-%d %H:%M:%S %z`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalSpan {
    pub start: String,
    pub end: String,
}

/// One committed meeting, in wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub task_name: String,
    pub task_id: String,
    /// UTC start, `2025-06-02T07:00:00.0000000`.
    pub reservation_time: String,
    pub reservation_end: String,
    pub calculated_duration_minutes: i64,
    pub day_of_week: String,
    /// Local `YYYY-MM-DD`.
    pub date: String,
    pub slot_id: String,
    #[serde(rename = "madridTime")]
    pub local_time: LocalSpan,
    /// Set only when the meeting is shorter than the task's ideal duration.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub adjusted_duration: bool,
}

/// A task with its score, in processing order.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedTask<'t> {
    pub task: &'t Task,
    pub score: f64,
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    config: SchedulerConfig,
    analyzer: TaskAnalyzer,
    slots: SlotGenerator,
    converter: TimeConverter,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            analyzer: TaskAnalyzer::new(&config),
            slots: SlotGenerator::new(&config),
            converter: TimeConverter::new(config.timezone),
            config,
        })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn analyzer(&self) -> &TaskAnalyzer {
        &self.analyzer
    }

    pub fn slot_generator(&self) -> &SlotGenerator {
        &self.slots
    }

    pub fn converter(&self) -> &TimeConverter {
        &self.converter
    }

    /// Open tasks ordered by score, highest first; ties keep input order.
    pub fn rank<'t>(&self, tasks: &'t [Task], now: DateTime<Utc>) -> Vec<RankedTask<'t>> {
        let mut ranked: Vec<RankedTask<'t>> = tasks
            .iter()
            .filter(|t| !t.is_complete())
            .map(|task| RankedTask {
                task,
                score: self.analyzer.score(task, now),
            })
            .collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked
    }

    /// Assign as many tasks as possible. Output order is processing order.
    pub fn assign(&self, tasks: &[Task], busy: &[BusySlot], now: DateTime<Utc>) -> Vec<Assignment> {
        let busy = self.slots.parse_busy_periods(busy);
        let local_now = self.converter.to_local(now);
        let ranked = self.rank(tasks, now);

        let mut committed: Vec<Interval> = Vec::with_capacity(ranked.len());
        let mut out = Vec::with_capacity(ranked.len());

        for RankedTask { task, score } in &ranked {
            let needed = self.analyzer.duration(task);
            let candidates: Vec<Interval> = self
                .slots
                .available_slots(&busy, &committed, local_now, self.config.horizon_days)
                .collect();

            let Some((slot, minutes)) = self.pick_slot(&candidates, needed) else {
                tracing::debug!(
                    task_id = %task.id,
                    score,
                    needed,
                    candidates = candidates.len(),
                    "no feasible slot; leaving task unassigned"
                );
                continue;
            };

            let end = (slot.start + Duration::minutes(minutes)).min(slot.end);
            let meeting = Interval::new(slot.start, end);
            committed.push(meeting);

            tracing::debug!(
                task_id = %task.id,
                score,
                needed,
                committed = meeting.minutes(),
                start = %meeting.start,
                "assigned task"
            );

            out.push(self.to_assignment(task, meeting, needed));
        }

        tracing::info!(
            tasks = tasks.len(),
            skipped_complete = tasks.len() - ranked.len(),
            assigned = out.len(),
            unassigned = ranked.len() - out.len(),
            busy_periods = busy.len(),
            "assignment run finished"
        );

        out
    }

    /// First candidate long enough for `needed`, else the largest one if it
    /// still meets the minimum duration. Returns the slot and meeting length.
    fn pick_slot(&self, candidates: &[Interval], needed: i64) -> Option<(Interval, i64)> {
        if let Some(slot) = candidates.iter().find(|c| c.minutes() >= needed) {
            return Some((*slot, needed));
        }

        // Earliest wins among equally large candidates.
        let largest = candidates
            .iter()
            .fold(None::<&Interval>, |best, c| match best {
                Some(b) if b.minutes() >= c.minutes() => Some(b),
                _ => Some(c),
            })?;

        let span = largest.minutes();
        if span < self.config.min_duration_minutes {
            return None;
        }
        Some((*largest, needed.min(span)))
    }

    fn to_assignment(&self, task: &Task, meeting: Interval, needed: i64) -> Assignment {
        let minutes = meeting.minutes();
        Assignment {
            task_name: task.title.clone(),
            task_id: task.id.clone(),
            reservation_time: time::format_reservation(self.converter.to_utc(&meeting.start)),
            reservation_end: time::format_reservation(self.converter.to_utc(&meeting.end)),
            calculated_duration_minutes: minutes,
            day_of_week: meeting.start.format("%A").to_string(),
            date: meeting.date().format("%Y-%m-%d").to_string(),
            slot_id: time::slot_id(&meeting.start),
            local_time: LocalSpan {
                start: time::format_local(&meeting.start),
                end: time::format_local(&meeting.end),
            },
            adjusted_duration: minutes != needed,
        }
    }
}
