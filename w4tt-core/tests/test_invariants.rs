use chrono::{DateTime, Datelike, Duration, FixedOffset, TimeZone, Timelike, Utc, Weekday};
use chrono_tz::Europe::Madrid;
use proptest::prelude::*;
use std::collections::HashMap;
use w4tt_core::time::parse_local_wire;
use w4tt_core::{BusySlot, Scheduler, SchedulerConfig, Task, TimeConverter, parse_timestamp};

/// Monday 2025-06-02 00:00 UTC.
fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap()
}

fn arb_task() -> impl Strategy<Value = Task> {
    (0i64..10, 0i64..=100, 0i64..10, any::<bool>()).prop_map(|(priority, pc, checklist, desc)| {
        let mut t = Task::new("", "generated")
            .with_priority(priority)
            .with_percent_complete(pc)
            .with_checklist(checklist);
        t.has_description = desc;
        t
    })
}

fn arb_busy() -> impl Strategy<Value = BusySlot> {
    (0i64..14, 0i64..96, 1i64..16).prop_map(|(day, quarter, len)| {
        let start = base() + Duration::days(day) + Duration::minutes(quarter * 15);
        let end = start + Duration::minutes(len * 15);
        BusySlot::new(
            start.format("%Y-%m-%dT%H:%M:%S.0000000").to_string(),
            end.format("%Y-%m-%dT%H:%M:%S.0000000").to_string(),
        )
    })
}

fn local_bounds(start: &str, end: &str) -> (DateTime<FixedOffset>, DateTime<FixedOffset>) {
    (parse_local_wire(start).unwrap(), parse_local_wire(end).unwrap())
}

proptest! {
    #[test]
    fn test_utc_local_round_trip_is_identity(secs in 0i64..4_102_444_800) {
        let conv = TimeConverter::new(Madrid);
        let x = Utc.timestamp_opt(secs, 0).unwrap();
        prop_assert_eq!(conv.to_utc(&conv.to_local(x)), x);
    }

    #[test]
    fn test_assignments_respect_schedule_invariants(
        tasks in prop::collection::vec(arb_task(), 0..12),
        busy in prop::collection::vec(arb_busy(), 0..20),
        now_minutes in 0i64..(7 * 24 * 60),
    ) {
        let tasks: Vec<Task> = tasks
            .into_iter()
            .enumerate()
            .map(|(i, mut t)| {
                t.id = format!("t{i}");
                t
            })
            .collect();
        let now = base() + Duration::minutes(now_minutes);
        let cfg = SchedulerConfig::default();
        let out = Scheduler::new(cfg.clone()).unwrap().assign(&tasks, &busy, now);

        let busy_utc: Vec<(DateTime<Utc>, DateTime<Utc>)> = busy
            .iter()
            .map(|b| {
                (
                    parse_timestamp(b.start.as_deref().unwrap(), chrono_tz::Tz::UTC).unwrap(),
                    parse_timestamp(b.end.as_deref().unwrap(), chrono_tz::Tz::UTC).unwrap(),
                )
            })
            .collect();

        let mut per_day: HashMap<&str, usize> = HashMap::new();
        let gap = Duration::minutes(cfg.min_gap_minutes);

        for (i, a) in out.iter().enumerate() {
            let task = tasks.iter().find(|t| t.id == a.task_id).unwrap();
            prop_assert!(task.percent_complete < 100);

            prop_assert!(a.calculated_duration_minutes >= cfg.min_duration_minutes);
            prop_assert!(a.calculated_duration_minutes <= cfg.max_duration_minutes);

            let (start, end) = local_bounds(&a.local_time.start, &a.local_time.end);
            prop_assert!(start.hour() >= cfg.business_start_hour);
            prop_assert!(
                end.hour() < cfg.business_end_hour
                    || (end.hour() == cfg.business_end_hour && end.minute() == 0)
            );
            prop_assert_eq!(start.date_naive(), end.date_naive());
            prop_assert!(!matches!(start.weekday(), Weekday::Sat | Weekday::Sun));
            prop_assert!(start >= now);

            for (bs, be) in &busy_utc {
                prop_assert!(!(start < *be && end > *bs), "{} overlaps busy {}..{}", a.slot_id, bs, be);
            }

            for other in &out[i + 1..] {
                let (os, oe) = local_bounds(&other.local_time.start, &other.local_time.end);
                prop_assert!(!(start < oe && end > os));
                prop_assert!(os - end >= gap || start - oe >= gap);
            }

            *per_day.entry(a.date.as_str()).or_default() += 1;
        }

        prop_assert!(per_day.values().all(|n| *n <= cfg.max_tasks_per_day));
    }
}

#[test]
fn test_duration_is_stable_across_calls() {
    let s = Scheduler::new(SchedulerConfig::default()).unwrap();
    let t = Task::new("t", "x").with_priority(0).with_checklist(7);
    let first = s.analyzer().duration(&t);
    for _ in 0..10 {
        assert_eq!(s.analyzer().duration(&t), first);
    }
}
