use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use pretty_assertions::assert_eq;
use scheduler_core::{merge, AttendanceStatus, Event, EventKey, EventKind};

fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, day)
        .and_then(|d| d.and_hms_opt(hour, 0, 0))
        .unwrap()
}

fn class(title: &str, day: u32, hour: u32, status: AttendanceStatus) -> Event {
    Event {
        title: title.to_string(),
        location: "BE-305".to_string(),
        description: "Slot 1".to_string(),
        start: at(day, hour),
        end: at(day, hour + 2),
        kind: EventKind::Class {
            status,
            meeting_url: None,
            slot: Some(1),
        },
    }
}

fn keys(events: &[Event]) -> BTreeSet<EventKey> {
    events.iter().map(Event::key).collect()
}

#[test]
fn first_seen_wins_on_equal_key() {
    let a = class("PRN231", 10, 7, AttendanceStatus::NotYet);
    let mut b = class("PRN231", 10, 7, AttendanceStatus::Attended);
    b.location = "AL-L201".to_string();

    let merged = merge(vec![a.clone()], vec![b]);
    assert_eq!(merged, vec![a]);
}

#[test]
fn remerging_the_same_week_is_idempotent() {
    let week = vec![
        class("PRN231", 10, 7, AttendanceStatus::Attended),
        class("SWP391", 11, 9, AttendanceStatus::Absent),
    ];
    let once = merge(Vec::new(), week.clone());
    let twice = merge(once.clone(), week);
    assert_eq!(once, twice);
}

#[test]
fn duplicates_within_a_batch_collapse() {
    let batch = vec![
        class("PRN231", 10, 7, AttendanceStatus::NotYet),
        class("PRN231", 10, 7, AttendanceStatus::Absent),
        class("PRN231", 10, 9, AttendanceStatus::NotYet),
    ];
    let merged = merge(Vec::new(), batch);
    assert_eq!(merged.len(), 2);
    assert_eq!(
        merged[0].kind,
        EventKind::Class {
            status: AttendanceStatus::NotYet,
            meeting_url: None,
            slot: Some(1),
        }
    );
}

#[test]
fn new_events_keep_input_order() {
    let existing = vec![class("MAE101", 3, 7, AttendanceStatus::Attended)];
    let incoming = vec![
        class("SWP391", 12, 9, AttendanceStatus::NotYet),
        class("MAE101", 3, 7, AttendanceStatus::NotYet),
        class("PRN231", 10, 7, AttendanceStatus::NotYet),
    ];
    let titles: Vec<_> = merge(existing, incoming)
        .into_iter()
        .map(|e| e.title)
        .collect();
    assert_eq!(titles, vec!["MAE101", "SWP391", "PRN231"]);
}

#[test]
fn merge_is_associative_over_keys() {
    let x = vec![
        class("PRN231", 10, 7, AttendanceStatus::NotYet),
        class("SWP391", 11, 9, AttendanceStatus::NotYet),
    ];
    let y = vec![
        class("SWP391", 11, 9, AttendanceStatus::Attended),
        class("MAE101", 12, 12, AttendanceStatus::NotYet),
    ];
    let z = vec![
        class("MAE101", 12, 12, AttendanceStatus::Absent),
        class("PRN231", 17, 7, AttendanceStatus::NotYet),
    ];

    let left = merge(merge(x.clone(), y.clone()), z.clone());
    let right = merge(x, merge(y, z));
    assert_eq!(keys(&left), keys(&right));
    assert_eq!(left.len(), 4);
}
