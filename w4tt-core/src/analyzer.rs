//! Task analysis: ideal meeting length and scheduling score.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::config::SchedulerConfig;
use crate::task::{DEFAULT_PRIORITY, Task};
use crate::time::parse_timestamp;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// (days-until-due upper bound, bonus). Overdue is handled separately.
const DUE_STEPS: [(f64, f64); 4] = [(1.0, 40.0), (3.0, 30.0), (7.0, 20.0), (14.0, 10.0)];
const OVERDUE_BONUS: f64 = 50.0;
const FAR_DUE_BONUS: f64 = 5.0;

/// (minimum age in days, bonus), oldest first.
const AGE_STEPS: [(f64, f64); 4] = [(30.0, 15.0), (14.0, 10.0), (7.0, 5.0), (1.0, 2.0)];

#[derive(Debug, Clone)]
pub struct TaskAnalyzer {
    config: SchedulerConfig,
}

impl TaskAnalyzer {
    pub fn new(config: &SchedulerConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Ideal meeting length in minutes, clamped to the configured bounds.
    pub fn duration(&self, task: &Task) -> i64 {
        let bonus = &self.config.bonus;
        let mut minutes = self.config.base_duration_minutes;

        minutes += match task.priority {
            0 => bonus.urgent,
            1 => bonus.important,
            _ => 0,
        };
        if task.percent_complete < 20 {
            minutes += bonus.early_stage;
        }
        if task.checklist_item_count > 5 {
            minutes += bonus.checklist;
        }
        if task.has_description {
            minutes += bonus.description;
        }

        minutes.clamp(
            self.config.min_duration_minutes,
            self.config.max_duration_minutes,
        )
    }

    /// Higher scores are scheduled first.
    pub fn score(&self, task: &Task, now: DateTime<Utc>) -> f64 {
        priority_term(task.priority)
            + due_term(task.due_date_time.as_deref(), now)
            + age_term(task.created_date_time.as_deref(), now)
            + completion_term(task.percent_complete)
    }
}

fn priority_term(priority: i64) -> f64 {
    100.0 * (DEFAULT_PRIORITY - priority.min(DEFAULT_PRIORITY)) as f64 / 5.0
}

fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_seconds() as f64 / SECONDS_PER_DAY
}

fn due_term(due: Option<&str>, now: DateTime<Utc>) -> f64 {
    let Some(due) = due.and_then(|s| parse_timestamp(s, Tz::UTC).ok()) else {
        return 0.0;
    };
    let days_left = days_between(now, due);
    if days_left < 0.0 {
        return OVERDUE_BONUS;
    }
    DUE_STEPS
        .iter()
        .find(|(limit, _)| days_left <= *limit)
        .map_or(FAR_DUE_BONUS, |(_, bonus)| *bonus)
}

fn age_term(created: Option<&str>, now: DateTime<Utc>) -> f64 {
    let Some(created) = created.and_then(|s| parse_timestamp(s, Tz::UTC).ok()) else {
        return 0.0;
    };
    let age_days = days_between(created, now);
    AGE_STEPS
        .iter()
        .find(|(min_age, _)| age_days >= *min_age)
        .map_or(0.0, |(_, bonus)| *bonus)
}

fn completion_term(percent_complete: i64) -> f64 {
    20.0 * (100 - percent_complete.clamp(0, 100)) as f64 / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn analyzer() -> TaskAnalyzer {
        TaskAnalyzer::new(&SchedulerConfig::default())
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, 6, 0, 0).unwrap()
    }

    fn iso(dt: DateTime<Utc>) -> String {
        dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }

    #[test]
    fn test_base_duration_for_plain_task() {
        let t = Task::new("t", "plain").with_percent_complete(50);
        assert_eq!(analyzer().duration(&t), 90);
    }

    #[test]
    fn test_duration_bonuses_accumulate_and_clamp() {
        let a = analyzer();
        // 90 + 15 (important) + 15 (early) = 120
        let t = Task::new("t", "x").with_priority(1);
        assert_eq!(a.duration(&t), 120);

        // 90 + 30 + 15 + 15 + 10 = 160 -> 150
        let big = Task::new("t", "x")
            .with_priority(0)
            .with_checklist(6)
            .with_description();
        assert_eq!(a.duration(&big), 150);

        // Exactly 5 checklist items earns nothing.
        let five = Task::new("t", "x").with_percent_complete(20).with_checklist(5);
        assert_eq!(a.duration(&five), 90);
    }

    #[test]
    fn test_duration_clamps_to_minimum() {
        let cfg = SchedulerConfig {
            base_duration_minutes: 10,
            ..SchedulerConfig::default()
        };
        let t = Task::new("t", "x").with_percent_complete(80);
        assert_eq!(TaskAnalyzer::new(&cfg).duration(&t), 60);
    }

    #[test]
    fn test_duration_is_deterministic() {
        let a = analyzer();
        let t = Task::new("t", "x").with_priority(0).with_checklist(9);
        assert_eq!(a.duration(&t), a.duration(&t.clone()));
    }

    #[test]
    fn test_priority_term_prefers_urgent() {
        let a = analyzer();
        let urgent = Task::new("u", "u").with_priority(0).with_percent_complete(100);
        let low = Task::new("l", "l").with_priority(9).with_percent_complete(100);
        assert_eq!(a.score(&urgent, now()), 100.0);
        assert_eq!(a.score(&low, now()), 0.0);
    }

    #[test]
    fn test_due_term_steps_down_with_distance() {
        let n = now();
        assert_eq!(due_term(Some(&iso(n - Duration::hours(1))), n), 50.0);
        assert_eq!(due_term(Some(&iso(n + Duration::hours(12))), n), 40.0);
        assert_eq!(due_term(Some(&iso(n + Duration::days(2))), n), 30.0);
        assert_eq!(due_term(Some(&iso(n + Duration::days(6))), n), 20.0);
        assert_eq!(due_term(Some(&iso(n + Duration::days(10))), n), 10.0);
        assert_eq!(due_term(Some(&iso(n + Duration::days(40))), n), 5.0);
        assert_eq!(due_term(None, n), 0.0);
        assert_eq!(due_term(Some("someday"), n), 0.0);
    }

    #[test]
    fn test_age_term_rewards_older_tasks() {
        let n = now();
        assert_eq!(age_term(Some(&iso(n - Duration::days(45))), n), 15.0);
        assert_eq!(age_term(Some(&iso(n - Duration::days(20))), n), 10.0);
        assert_eq!(age_term(Some(&iso(n - Duration::days(8))), n), 5.0);
        assert_eq!(age_term(Some(&iso(n - Duration::days(2))), n), 2.0);
        assert_eq!(age_term(Some(&iso(n - Duration::hours(3))), n), 0.0);
        assert_eq!(age_term(Some(&iso(n + Duration::days(3))), n), 0.0);
        assert_eq!(age_term(Some(""), n), 0.0);
    }

    #[test]
    fn test_completion_term_favors_fresh_work() {
        assert_eq!(completion_term(0), 20.0);
        assert_eq!(completion_term(50), 10.0);
        assert_eq!(completion_term(100), 0.0);
        assert_eq!(completion_term(250), 0.0);
    }

    #[test]
    fn test_score_sums_all_terms() {
        let n = now();
        let t = Task::new("t", "x")
            .with_priority(1)
            .with_percent_complete(25)
            .with_due(iso(n + Duration::days(2)))
            .with_created("2025-05-01T10:00:00.1234567Z");
        // 80 + 30 + 15 + 15
        assert_eq!(analyzer().score(&t, n), 140.0);
    }
}
