//! iCalendar (RFC 5545) output.

use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, Utc};
use icalendar::{Alarm, Calendar, Component, EventLike, Trigger};
use scheduler_core::Event;
use uuid::Uuid;

use crate::config::SchedulerConfig;

const UTC_STAMP: &str = "%Y%m%dT%H%M%SZ";

/// Source of `UID` values.
pub trait UidSource {
    fn next_uid(&mut self) -> String;
}

impl<F: FnMut() -> String> UidSource for F {
    fn next_uid(&mut self) -> String {
        self()
    }
}

/// Source of the `DTSTAMP` instant.
pub trait StampSource {
    fn now(&self) -> DateTime<Utc>;
}

impl<F: Fn() -> DateTime<Utc>> StampSource for F {
    fn now(&self) -> DateTime<Utc> {
        self()
    }
}

struct RandomUids;

impl UidSource for RandomUids {
    fn next_uid(&mut self) -> String {
        format!("{}@fap-scheduler", Uuid::new_v4())
    }
}

struct SystemClock;

impl StampSource for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub struct IcsWriter {
    product_id: String,
    offset: FixedOffset,
    uids: Box<dyn UidSource>,
    clock: Box<dyn StampSource>,
}

impl IcsWriter {
    /// Random v4 UIDs and the system clock.
    pub fn new(config: &SchedulerConfig) -> Self {
        Self {
            product_id: config.product_id.clone(),
            offset: config.utc_offset(),
            uids: Box::new(RandomUids),
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_uids(mut self, uids: impl UidSource + 'static) -> Self {
        self.uids = Box::new(uids);
        self
    }

    pub fn with_clock(mut self, clock: impl StampSource + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// One `VCALENDAR` holding a `VEVENT` per event, in input order. All
    /// events share the `DTSTAMP` taken at the start of the call.
    pub fn serialize(&mut self, events: &[Event]) -> String {
        let stamp = self.clock.now().format(UTC_STAMP).to_string();
        let mut cal = Calendar::new();

        for event in events {
            let mut ics_event = icalendar::Event::new();
            ics_event.uid(&self.uids.next_uid());
            ics_event.add_property("DTSTAMP", &stamp);
            ics_event.add_property("DTSTART", self.utc(event.start));
            ics_event.add_property("DTEND", self.utc(event.end));
            ics_event.summary(&event.summary());
            ics_event.description(&event.description);
            ics_event.location(&event.location);
            ics_event.alarm(Alarm::display(
                "Reminder",
                Trigger::before_start(Duration::days(1)),
            ));
            cal.push(ics_event.done());
        }

        self.tidy(&cal.done().to_string())
    }

    /// Portal wall-clock time as a UTC `YYYYMMDDTHHMMSSZ` stamp.
    fn utc(&self, local: NaiveDateTime) -> String {
        let utc = local - Duration::seconds(i64::from(self.offset.local_minus_utc()));
        utc.format(UTC_STAMP).to_string()
    }

    /// Puts our `PRODID` in place of the library's, drops the `DTSTAMP` and
    /// `UID` it adds to alarms, and ends every line with CRLF.
    fn tidy(&self, ics: &str) -> String {
        let mut result = String::with_capacity(ics.len());
        let mut in_alarm = false;

        for line in ics.lines() {
            if line.starts_with("PRODID:") {
                result.push_str(&format!("PRODID:{}\r\n", self.product_id));
                continue;
            }
            match line {
                "BEGIN:VALARM" => in_alarm = true,
                "END:VALARM" => in_alarm = false,
                _ => {}
            }
            if in_alarm && (line.starts_with("DTSTAMP:") || line.starts_with("UID:")) {
                continue;
            }
            result.push_str(line);
            result.push_str("\r\n");
        }

        result
    }
}
