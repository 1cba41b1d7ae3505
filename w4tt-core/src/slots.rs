//! Candidate slot generation inside business hours.
//!
//! `available_slots` is a pure function of (busy periods, committed periods,
//! now): it walks calendar days from `now`'s local date, partitions each
//! weekday's business window into fixed blocks and yields the blocks that are
//! free and far enough from every committed meeting.

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, Timelike, Weekday};
use chrono_tz::Tz;
use serde::Serialize;

use crate::config::SchedulerConfig;
use crate::task::BusySlot;
use crate::time::TimeConverter;

/// Half-open `[start, end)` span in the business zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Interval {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl Interval {
    pub fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> Self {
        Self { start, end }
    }

    pub fn minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Local calendar date of the start.
    pub fn date(&self) -> NaiveDate {
        self.start.date_naive()
    }
}

#[derive(Debug, Clone)]
pub struct SlotGenerator {
    config: SchedulerConfig,
    converter: TimeConverter,
}

impl SlotGenerator {
    pub fn new(config: &SchedulerConfig) -> Self {
        Self {
            config: config.clone(),
            converter: TimeConverter::new(config.timezone),
        }
    }

    /// Convert caller-supplied UTC busy slots into local intervals.
    ///
    /// Entries with a missing or unparsable bound, or an end not after the
    /// start, are dropped with a warning.
    pub fn parse_busy_periods(&self, raw: &[BusySlot]) -> Vec<Interval> {
        let mut out = Vec::with_capacity(raw.len());

        for (idx, slot) in raw.iter().enumerate() {
            let (Some(start), Some(end)) = (slot.start.as_deref(), slot.end.as_deref()) else {
                tracing::warn!(index = idx, "dropping busy slot without start/end strings");
                continue;
            };

            let parsed = self
                .converter
                .parse(start, Tz::UTC)
                .and_then(|s| self.converter.parse(end, Tz::UTC).map(|e| (s, e)));

            match parsed {
                Ok((s, e)) if e > s => out.push(Interval::new(s, e)),
                Ok(_) => {
                    tracing::warn!(index = idx, start, end, "dropping empty or inverted busy slot");
                }
                Err(err) => {
                    tracing::warn!(index = idx, start, end, error = %err, "dropping unparsable busy slot");
                }
            }
        }

        out
    }

    /// Free candidate blocks, earliest first, at most `candidate_cap` of them.
    pub fn available_slots<'a>(
        &'a self,
        busy: &'a [Interval],
        assigned: &'a [Interval],
        now: DateTime<Tz>,
        horizon_days: u32,
    ) -> impl Iterator<Item = Interval> + 'a {
        let today = now.date_naive();

        (0..u64::from(horizon_days))
            .filter_map(move |offset| today.checked_add_days(Days::new(offset)))
            .filter(|date| !matches!(date.weekday(), Weekday::Sat | Weekday::Sun))
            .filter(move |date| self.day_has_capacity(*date, assigned))
            .filter_map(move |date| self.business_window(date, now))
            .flat_map(move |window| self.blocks(window))
            .filter(move |block| self.is_free(block, busy, assigned))
            .take(self.config.candidate_cap)
    }

    fn day_has_capacity(&self, date: NaiveDate, assigned: &[Interval]) -> bool {
        let taken = assigned.iter().filter(|a| a.date() == date).count();
        taken < self.config.max_tasks_per_day
    }

    /// Business hours for `date`, starting no earlier than the next whole hour
    /// after `now` when `date` is today.
    fn business_window(&self, date: NaiveDate, now: DateTime<Tz>) -> Option<Interval> {
        let mut start = self
            .converter
            .local_at(date, self.config.business_start_hour)?;
        let end = self.converter.local_at(date, self.config.business_end_hour)?;

        if date == now.date_naive() && start < now {
            let hour = (now.hour() + 1).max(self.config.business_start_hour);
            if hour >= self.config.business_end_hour {
                return None;
            }
            start = self.converter.local_at(date, hour)?;
        }

        (start < end).then(|| Interval::new(start, end))
    }

    fn blocks(&self, window: Interval) -> impl Iterator<Item = Interval> + use<> {
        let step = Duration::minutes(self.config.slot_granularity_minutes);
        std::iter::successors(Some(window.start), move |s| Some(*s + step))
            .take_while(move |s| *s < window.end)
            .map(move |s| Interval::new(s, (s + step).min(window.end)))
    }

    fn is_free(&self, candidate: &Interval, busy: &[Interval], assigned: &[Interval]) -> bool {
        if busy.iter().any(|b| candidate.overlaps(b)) {
            return false;
        }

        let gap = Duration::minutes(self.config.min_gap_minutes);
        assigned.iter().all(|a| {
            if candidate.overlaps(a) {
                return false;
            }
            if candidate.end <= a.start && a.start - candidate.end < gap {
                return false;
            }
            if candidate.start >= a.end && candidate.start - a.end < gap {
                return false;
            }
            true
        })
    }
}
