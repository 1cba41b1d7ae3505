//! Engine configuration: business hours, duration bounds, spacing rules.
//!
//! One immutable value is handed to `Scheduler::new`, validated once, and
//! shared by the analyzer and the slot generator for the whole run.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Upper bound for every minute-valued setting.
pub const MAX_MINUTES: i64 = 24 * 60;

/// Duration bonuses (minutes) added on top of the base meeting length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DurationBonus {
    /// Priority 0.
    pub urgent: i64,
    /// Priority 1.
    pub important: i64,
    /// percentComplete < 20.
    pub early_stage: i64,
    /// More than 5 checklist items.
    pub checklist: i64,
    pub description: i64,
}

impl Default for DurationBonus {
    fn default() -> Self {
        Self {
            urgent: 30,
            important: 15,
            early_stage: 15,
            checklist: 15,
            description: 10,
        }
    }
}

impl DurationBonus {
    /// Each bonus must lie in `0..=max`.
    pub fn validate(&self, max: i64) -> Result<(), ConfigError> {
        let fields = [
            ("urgent", self.urgent),
            ("important", self.important),
            ("early_stage", self.early_stage),
            ("checklist", self.checklist),
            ("description", self.description),
        ];
        match fields.into_iter().find(|(_, v)| !(0..=max).contains(v)) {
            Some((name, value)) => Err(ConfigError::Bonus { name, value, max }),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Zone in which business hours, weekends and day boundaries are defined.
    pub timezone: Tz,
    pub business_start_hour: u32,
    /// Exclusive end of the business-hours window.
    pub business_end_hour: u32,
    pub slot_granularity_minutes: i64,
    pub min_duration_minutes: i64,
    pub max_duration_minutes: i64,
    pub base_duration_minutes: i64,
    pub min_gap_minutes: i64,
    pub max_tasks_per_day: usize,
    pub horizon_days: u32,
    /// Search bound: stop generating candidates after this many.
    pub candidate_cap: usize,
    pub bonus: DurationBonus,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::Europe::Madrid,
            business_start_hour: 9,
            business_end_hour: 17,
            slot_granularity_minutes: 60,
            min_duration_minutes: 60,
            max_duration_minutes: 150,
            base_duration_minutes: 90,
            min_gap_minutes: 30,
            max_tasks_per_day: 2,
            horizon_days: 30,
            candidate_cap: 10,
            bonus: DurationBonus::default(),
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.business_start_hour >= self.business_end_hour || self.business_end_hour > 23 {
            return Err(ConfigError::BusinessHours {
                start: self.business_start_hour,
                end: self.business_end_hour,
            });
        }
        if !(1..=MAX_MINUTES).contains(&self.slot_granularity_minutes) {
            return Err(ConfigError::Granularity(self.slot_granularity_minutes));
        }
        if self.min_duration_minutes <= 0 || self.min_duration_minutes > self.max_duration_minutes
        {
            return Err(ConfigError::DurationBounds {
                min: self.min_duration_minutes,
                max: self.max_duration_minutes,
            });
        }
        if self.max_duration_minutes > MAX_MINUTES {
            return Err(ConfigError::MaxDuration(self.max_duration_minutes));
        }
        if !(0..=MAX_MINUTES).contains(&self.base_duration_minutes) {
            return Err(ConfigError::BaseDuration(self.base_duration_minutes));
        }
        if self.min_gap_minutes < 0 {
            return Err(ConfigError::NegativeGap(self.min_gap_minutes));
        }
        if self.min_gap_minutes > MAX_MINUTES {
            return Err(ConfigError::GapTooLarge(self.min_gap_minutes));
        }
        self.bonus.validate(self.max_duration_minutes)?;
        if self.max_tasks_per_day == 0 {
            return Err(ConfigError::TasksPerDay);
        }
        if self.horizon_days == 0 {
            return Err(ConfigError::Horizon);
        }
        if self.candidate_cap == 0 {
            return Err(ConfigError::CandidateCap);
        }
        Ok(())
    }
}
