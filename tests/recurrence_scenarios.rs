use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use recurrence_engine::domain::value_objects::calendar;
use recurrence_engine::{
    CachedCalculator, MonthlyRule, OccurrenceCalculator, Recurrence, Schedule, ScheduleError,
    TimeWindow, WeekPosition, WeekdaySet, compute_next,
};

fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

fn window(start: u32, end: u32) -> TimeWindow {
    TimeWindow::new(hm(start, 0), hm(end, 0), Tz::UTC)
}

fn mon_wed_fri_at_seven() -> Schedule {
    let days = WeekdaySet::from_names(&["Mon", "Wed", "Fri"]).unwrap();
    Schedule::builder(Recurrence::weekly_on(days), utc(2025, 1, 1, 0, 0))
        .time_window(window(19, 20))
        .build()
        .unwrap()
}

#[test_log::test]
fn once_returns_the_future_anchor() {
    let schedule = Schedule::builder(Recurrence::Once, utc(2025, 3, 1, 6, 0))
        .build()
        .unwrap();
    assert_eq!(
        compute_next(&schedule, utc(2025, 2, 1, 0, 0)).unwrap(),
        Some(utc(2025, 3, 1, 6, 0))
    );
}

#[test_log::test]
fn daily_with_a_window_after_todays_slot() {
    let schedule = Schedule::builder(Recurrence::Daily, utc(2025, 1, 1, 9, 0))
        .time_window(window(9, 10))
        .build()
        .unwrap();
    assert_eq!(
        compute_next(&schedule, utc(2025, 1, 5, 10, 0)).unwrap(),
        Some(utc(2025, 1, 6, 9, 0))
    );
}

#[test_log::test]
fn weekly_set_from_thursday_morning() {
    assert_eq!(
        compute_next(&mon_wed_fri_at_seven(), utc(2025, 1, 2, 8, 0)).unwrap(),
        Some(utc(2025, 1, 3, 19, 0))
    );
}

#[test_log::test]
fn weekly_set_after_mondays_slot() {
    assert_eq!(
        compute_next(&mon_wed_fri_at_seven(), utc(2025, 1, 6, 20, 0)).unwrap(),
        Some(utc(2025, 1, 8, 19, 0))
    );
}

#[test_log::test]
fn monthly_on_the_anchor_day() {
    let schedule = Schedule::builder(Recurrence::monthly(), utc(2025, 1, 15, 9, 0))
        .build()
        .unwrap();
    assert_eq!(
        compute_next(&schedule, utc(2025, 1, 20, 0, 0)).unwrap(),
        Some(utc(2025, 2, 15, 9, 0))
    );
}

#[test_log::test]
fn daily_past_its_end_bound() {
    let schedule = Schedule::builder(Recurrence::Daily, utc(2025, 1, 1, 0, 0))
        .end_bound(utc(2025, 1, 3, 0, 0))
        .build()
        .unwrap();
    assert_eq!(compute_next(&schedule, utc(2025, 1, 5, 0, 0)).unwrap(), None);
}

#[test_log::test]
fn inverted_window_is_flagged() {
    let window = TimeWindow::new(hm(10, 0), hm(9, 0), Tz::UTC);
    assert!(!window.is_valid());
    assert!(window.errors().iter().any(|e| e.contains("start must precede end")));

    assert!(matches!(
        TimeWindow::strict(hm(22, 0), hm(2, 0), Tz::UTC),
        Err(ScheduleError::InvalidTimeWindow(_))
    ));
}

fn sample_schedules() -> Vec<Schedule> {
    let anchor = utc(2025, 1, 31, 18, 30);
    let kinds = vec![
        Recurrence::Once,
        Recurrence::Daily,
        Recurrence::weekly(),
        Recurrence::weekly_on(WeekdaySet::from_names(&["tue", "sat"]).unwrap()),
        Recurrence::monthly(),
        Recurrence::Monthly {
            rule: MonthlyRule::days(&[1, 15, 31]).unwrap(),
        },
        Recurrence::Monthly {
            rule: MonthlyRule::Ordinal {
                position: WeekPosition::Last,
                weekday: chrono::Weekday::Fri,
            },
        },
        Recurrence::Yearly,
        Recurrence::weekdays(),
        Recurrence::Weekends,
        Recurrence::Biweekly,
        Recurrence::Bimonthly,
        Recurrence::Quarterly,
        Recurrence::Semiannually,
    ];

    let mut schedules = Vec::new();
    for recurrence in kinds {
        for interval in [1, 3] {
            schedules.push(
                Schedule::builder(recurrence.clone(), anchor)
                    .interval(interval)
                    .timezone(chrono_tz::Europe::Berlin)
                    .build()
                    .unwrap(),
            );
            schedules.push(
                Schedule::builder(recurrence.clone(), anchor)
                    .interval(interval)
                    .time_window(TimeWindow::new(hm(7, 15), hm(8, 0), chrono_tz::America::New_York))
                    .timezone(chrono_tz::America::New_York)
                    .end_bound(utc(2026, 6, 30, 0, 0))
                    .build()
                    .unwrap(),
            );
        }
    }
    schedules
}

#[test_log::test]
fn every_occurrence_is_after_its_reference() {
    let references = [
        utc(2024, 12, 31, 0, 0),
        utc(2025, 1, 31, 18, 30),
        utc(2025, 2, 28, 23, 59),
        utc(2025, 3, 30, 1, 30),
        utc(2025, 11, 2, 6, 0),
        utc(2026, 7, 1, 0, 0),
    ];
    for schedule in sample_schedules() {
        for reference in references {
            if let Some(next) = compute_next(&schedule, reference).unwrap() {
                assert!(next > reference, "{} at {reference}: {next}", schedule.describe());
            }
        }
    }
}

#[test_log::test]
fn once_is_idempotent_and_exhausted_at_the_anchor() {
    let anchor = utc(2025, 5, 1, 12, 0);
    let schedule = Schedule::builder(Recurrence::Once, anchor).build().unwrap();
    let before = anchor - Duration::days(3);

    let first = compute_next(&schedule, before).unwrap();
    assert_eq!(first, compute_next(&schedule, before).unwrap());
    assert_eq!(first, Some(anchor));

    for offset in [0, 1, 60 * 24 * 365] {
        assert_eq!(
            compute_next(&schedule, anchor + Duration::minutes(offset)).unwrap(),
            None
        );
    }
}

#[test_log::test]
fn non_positive_intervals_are_rejected() {
    for interval in [0, -1] {
        let result = Schedule::builder(Recurrence::Daily, utc(2025, 1, 1, 0, 0))
            .interval(interval)
            .build();
        assert_eq!(result.err(), Some(ScheduleError::InvalidInterval(interval)));
    }
}

#[test_log::test]
fn bounded_results_never_pass_the_end_bound() {
    let end = utc(2026, 6, 30, 0, 0);
    for schedule in sample_schedules().into_iter().filter(|s| s.end_bound().is_some()) {
        let calculator = OccurrenceCalculator::default();
        let all: Vec<_> = calculator
            .occurrences(&schedule, utc(2025, 1, 1, 0, 0))
            .take(1000)
            .collect::<Result<_, _>>()
            .unwrap();
        assert!(all.iter().all(|t| *t <= end), "{}", schedule.describe());
        if let Some(last) = all.last() {
            assert_eq!(compute_next(&schedule, *last).unwrap(), None);
        }
    }
}

#[test_log::test]
fn range_enumeration_matches_repeated_queries() {
    let cached = CachedCalculator::default();
    let start = utc(2025, 1, 1, 0, 0);
    let end = utc(2025, 9, 1, 0, 0);

    for mut schedule in sample_schedules() {
        let found = cached
            .occurrences_between(&mut schedule, start, end, start)
            .unwrap();

        assert!(found.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(found.iter().all(|t| *t >= start && *t <= end));

        let mut expected = Vec::new();
        let mut reference = start;
        while let Some(next) = compute_next(&schedule, reference).unwrap() {
            if next > end {
                break;
            }
            expected.push(next);
            reference = next;
        }
        assert_eq!(found, expected, "{}", schedule.describe());
    }
}

#[test_log::test]
fn cache_is_transparent_within_its_ttl_and_reset_by_enable() {
    let cached = CachedCalculator::new(OccurrenceCalculator::default(), Duration::minutes(30));
    let mut schedule = Schedule::builder(Recurrence::Daily, utc(2025, 1, 1, 9, 0))
        .build()
        .unwrap();
    let reference = utc(2025, 1, 3, 12, 0);
    let now = reference;

    let first = cached.next_occurrence(&mut schedule, reference, now).unwrap();
    let second = cached
        .next_occurrence(&mut schedule, reference, now + Duration::minutes(10))
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(first, Some(utc(2025, 1, 4, 9, 0)));

    // plant a stale value, which is served until enable() drops it
    let stale = utc(2025, 1, 9, 9, 0);
    schedule
        .cache_mut()
        .store(reference, Some(stale), now, Duration::minutes(30));
    assert_eq!(
        cached.next_occurrence(&mut schedule, reference, now).unwrap(),
        Some(stale)
    );

    schedule.enable();
    assert_eq!(
        cached.next_occurrence(&mut schedule, reference, now).unwrap(),
        first
    );
}

#[test_log::test]
fn biweekly_does_not_double_the_interval() {
    let anchor = utc(2025, 1, 1, 9, 0);
    let weekly = Schedule::builder(Recurrence::weekly(), anchor).build().unwrap();
    let biweekly = Schedule::builder(Recurrence::Biweekly, anchor).build().unwrap();
    let calculator = OccurrenceCalculator::default();

    let weekly_run: Vec<_> = calculator.occurrences(&weekly, anchor).take(5).collect();
    let biweekly_run: Vec<_> = calculator.occurrences(&biweekly, anchor).take(5).collect();
    assert_eq!(weekly_run, biweekly_run);
}

#[test_log::test]
fn local_wall_clock_survives_dst() {
    // 09:00 in New York, across the March 9 2025 change
    let tz = chrono_tz::America::New_York;
    let anchor = calendar::at_time(
        chrono::NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(),
        hm(9, 0),
        tz,
    );
    let schedule = Schedule::builder(Recurrence::Daily, anchor)
        .timezone(tz)
        .build()
        .unwrap();

    let calculator = OccurrenceCalculator::default();
    let run: Vec<_> = calculator
        .occurrences(&schedule, anchor - Duration::hours(1))
        .take(4)
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(
        run,
        vec![
            utc(2025, 3, 7, 14, 0),
            utc(2025, 3, 8, 14, 0),
            utc(2025, 3, 9, 13, 0),
            utc(2025, 3, 10, 13, 0),
        ]
    );
}
