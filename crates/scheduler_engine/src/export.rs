use std::fmt;

use chrono::NaiveDate;
use scheduler_core::{Event, EventKind};

use crate::config::SchedulerConfig;

/// The calendar files offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportPreset {
    /// Exams starting today or later that have a real room.
    UpcomingExams,
    /// Classes of on-campus subjects.
    OfflineClasses,
    /// Classes of remote subjects (code ending in `c`).
    OnlineClasses,
}

impl ExportPreset {
    pub const ALL: [ExportPreset; 3] = [
        ExportPreset::UpcomingExams,
        ExportPreset::OfflineClasses,
        ExportPreset::OnlineClasses,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            ExportPreset::UpcomingExams => "exams.ics",
            ExportPreset::OfflineClasses => "classes.ics",
            ExportPreset::OnlineClasses => "classes-online.ics",
        }
    }

    pub fn matches(self, event: &Event, today: NaiveDate, config: &SchedulerConfig) -> bool {
        match self {
            ExportPreset::UpcomingExams => {
                event.is_exam()
                    && event.start.date() >= today
                    && !config.is_unassigned_room(&event.location)
            }
            ExportPreset::OfflineClasses => event.is_class() && !event.is_remote(),
            ExportPreset::OnlineClasses => event.is_class() && event.is_remote(),
        }
    }
}

impl fmt::Display for ExportPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportPreset::UpcomingExams => "upcoming exams",
            ExportPreset::OfflineClasses => "offline classes",
            ExportPreset::OnlineClasses => "online classes",
        })
    }
}

/// Appends `Meet: <url>` to the description of classes with a meeting link.
pub fn with_meeting_links(events: Vec<Event>) -> Vec<Event> {
    events
        .into_iter()
        .map(|mut event| {
            if let EventKind::Class {
                meeting_url: Some(url),
                ..
            } = &event.kind
            {
                let line = format!("Meet: {url}");
                event.description = if event.description.is_empty() {
                    line
                } else {
                    format!("{}\n{line}", event.description)
                };
            }
            event
        })
        .collect()
}
