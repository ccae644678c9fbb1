use std::time::Duration;

use chrono::{FixedOffset, NaiveTime, Offset, Utc};
use serde::{Deserialize, Serialize};

/// Tunables for extraction, pacing and calendar output.
///
/// Every field has a default, so a config file only needs the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Pause between sync steps, in milliseconds.
    pub step_delay_ms: u64,
    /// Pause before resuming a sync after a page load, in milliseconds.
    pub resume_delay_ms: u64,
    /// Offset of the portal's wall-clock times from UTC, in minutes.
    pub utc_offset_minutes: i32,
    pub slot_times: SlotTimes,
    /// Hosts whose links are treated as online meeting links.
    pub meeting_hosts: Vec<String>,
    pub product_id: String,
    /// Lowercase fragments marking a room that is not assigned yet.
    pub unassigned_room_markers: Vec<String>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            step_delay_ms: 500,
            resume_delay_ms: 1000,
            utc_offset_minutes: 7 * 60,
            slot_times: SlotTimes::default(),
            meeting_hosts: vec!["meet.google.com".to_string()],
            product_id: "-//fap-scheduler//term sync//EN".to_string(),
            unassigned_room_markers: vec!["chưa".to_string()],
        }
    }
}

impl SchedulerConfig {
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    pub fn resume_delay(&self) -> Duration {
        Duration::from_millis(self.resume_delay_ms)
    }

    /// Portal offset; out-of-range values fall back to UTC.
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| Utc.fix())
    }

    pub fn is_meeting_host(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        self.meeting_hosts.iter().any(|known| {
            let known = known.to_ascii_lowercase();
            host == known || host.ends_with(&format!(".{known}"))
        })
    }

    pub fn is_unassigned_room(&self, room: &str) -> bool {
        let room = room.trim().to_lowercase();
        room.is_empty()
            || self
                .unassigned_room_markers
                .iter()
                .any(|marker| room.contains(&marker.to_lowercase()))
    }
}

/// Start and end of one teaching slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotTime {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// Default times for slots 1 through 8.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotTimes(Vec<SlotTime>);

impl SlotTimes {
    pub fn new(slots: Vec<SlotTime>) -> Self {
        Self(slots)
    }

    /// Whether `slot` (1-based) has its own row in the table.
    pub fn is_listed(&self, slot: u8) -> bool {
        (1..=self.0.len()).contains(&usize::from(slot))
    }

    /// Times for `slot` (1-based). Unknown slots use slot 1.
    pub fn get(&self, slot: u8) -> Option<SlotTime> {
        let index = usize::from(slot).checked_sub(1);
        index
            .and_then(|i| self.0.get(i))
            .or_else(|| self.0.first())
            .copied()
    }
}

impl Default for SlotTimes {
    fn default() -> Self {
        const TABLE: [(u32, u32, u32, u32); 8] = [
            (7, 0, 9, 15),
            (9, 30, 11, 45),
            (12, 30, 14, 45),
            (15, 0, 17, 15),
            (17, 30, 19, 45),
            (20, 0, 22, 15),
            (7, 0, 9, 15),
            (9, 30, 11, 45),
        ];
        Self(
            TABLE
                .iter()
                .filter_map(|&(sh, sm, eh, em)| {
                    Some(SlotTime {
                        start: NaiveTime::from_hms_opt(sh, sm, 0)?,
                        end: NaiveTime::from_hms_opt(eh, em, 0)?,
                    })
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_slots_fall_back_to_first() {
        let slots = SlotTimes::default();
        let first = slots.get(1).unwrap();
        assert_eq!(slots.get(0), Some(first));
        assert_eq!(slots.get(9), Some(first));
        assert_eq!(
            slots.get(3).unwrap().start,
            NaiveTime::from_hms_opt(12, 30, 0).unwrap()
        );
    }

    #[test]
    fn custom_table_lists_only_its_slots() {
        let morning = SlotTime {
            start: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        };
        let evening = SlotTime {
            start: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
        };
        let slots = SlotTimes::new(vec![morning, evening]);
        assert!(slots.is_listed(2));
        assert!(!slots.is_listed(0));
        assert!(!slots.is_listed(3));
        assert_eq!(slots.get(2), Some(evening));
        assert_eq!(slots.get(3), Some(morning));
        assert!(SlotTimes::default().is_listed(8));
        assert!(!SlotTimes::default().is_listed(12));
    }

    #[test]
    fn meeting_hosts_match_subdomains() {
        let config = SchedulerConfig::default();
        assert!(config.is_meeting_host("meet.google.com"));
        assert!(config.is_meeting_host("MEET.google.com"));
        assert!(!config.is_meeting_host("google.com"));
        assert!(!config.is_meeting_host("notmeet.google.com.evil"));
    }

    #[test]
    fn placeholder_rooms_are_unassigned() {
        let config = SchedulerConfig::default();
        assert!(config.is_unassigned_room(""));
        assert!(config.is_unassigned_room("Chưa xếp phòng"));
        assert!(!config.is_unassigned_room("BE-305"));
    }

    #[test]
    fn partial_ron_keeps_defaults() {
        let config: SchedulerConfig = ron::from_str("(step_delay_ms: 10)").unwrap();
        assert_eq!(config.step_delay_ms, 10);
        assert_eq!(config.resume_delay_ms, 1000);
        assert_eq!(config.utc_offset().local_minus_utc(), 7 * 3600);
    }
}
