//! Normalized class and exam occurrences.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::subject::is_remote_code;

/// A single class session or exam. Times are portal wall-clock times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub title: String,
    pub location: String,
    pub description: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(flatten)]
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EventKind {
    Class {
        status: AttendanceStatus,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        meeting_url: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        slot: Option<u8>,
    },
    Exam {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tag: Option<ExamTag>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExamTag {
    #[serde(rename = "FE")]
    Final,
    #[serde(rename = "PE")]
    Practical,
    #[serde(rename = "2NDFE")]
    SecondFinal,
    #[serde(rename = "2NDPE")]
    SecondPractical,
}

impl ExamTag {
    pub const ALL: [ExamTag; 4] = [
        ExamTag::SecondFinal,
        ExamTag::SecondPractical,
        ExamTag::Practical,
        ExamTag::Final,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ExamTag::Final => "FE",
            ExamTag::Practical => "PE",
            ExamTag::SecondFinal => "2NDFE",
            ExamTag::SecondPractical => "2NDPE",
        }
    }

    /// Exact match against the tag spellings used by the exam table.
    pub fn from_cell(raw: &str) -> Option<ExamTag> {
        ExamTag::ALL.into_iter().find(|tag| tag.as_str() == raw)
    }
}

impl fmt::Display for ExamTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttendanceStatus {
    Attended,
    Absent,
    #[default]
    NotYet,
}

/// Identity of an occurrence: same title starting at the same instant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventKey {
    pub title: String,
    pub start: NaiveDateTime,
}

impl Event {
    pub fn key(&self) -> EventKey {
        EventKey {
            title: self.title.clone(),
            start: self.start,
        }
    }

    pub fn is_exam(&self) -> bool {
        matches!(self.kind, EventKind::Exam { .. })
    }

    pub fn is_class(&self) -> bool {
        matches!(self.kind, EventKind::Class { .. })
    }

    /// Remote offerings carry a trailing lowercase `c` on the subject code.
    pub fn is_remote(&self) -> bool {
        is_remote_code(&self.title)
    }

    pub fn exam_tag(&self) -> Option<ExamTag> {
        match self.kind {
            EventKind::Exam { tag } => tag,
            EventKind::Class { .. } => None,
        }
    }

    pub fn meeting_url(&self) -> Option<&str> {
        match &self.kind {
            EventKind::Class { meeting_url, .. } => meeting_url.as_deref(),
            EventKind::Exam { .. } => None,
        }
    }

    /// Calendar title: the subject code, with the exam tag appended.
    pub fn summary(&self) -> String {
        match self.exam_tag() {
            Some(tag) => format!("{} - {}", self.title, tag),
            None => self.title.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 20)
            .and_then(|d| d.and_hms_opt(h, m, 0))
            .unwrap()
    }

    #[test]
    fn summary_appends_exam_tag() {
        let exam = Event {
            title: "MAD101".into(),
            location: "P.301".into(),
            description: "Multiple_choices".into(),
            start: at(7, 30),
            end: at(9, 0),
            kind: EventKind::Exam {
                tag: Some(ExamTag::SecondFinal),
            },
        };
        assert_eq!(exam.summary(), "MAD101 - 2NDFE");
        assert!(exam.is_exam());
        assert!(exam.meeting_url().is_none());
    }

    #[test]
    fn kind_is_tagged_in_json() {
        let class = Event {
            title: "ENW492c".into(),
            location: String::new(),
            description: "Slot 2".into(),
            start: at(9, 30),
            end: at(11, 45),
            kind: EventKind::Class {
                status: AttendanceStatus::NotYet,
                meeting_url: Some("https://meet.google.com/abc-defg-hij".into()),
                slot: Some(2),
            },
        };
        let json = serde_json::to_value(&class).unwrap();
        assert_eq!(json["type"], "class");
        assert_eq!(json["status"], "not-yet");
        assert_eq!(json["slot"], 2);

        let back: Event = serde_json::from_value(json).unwrap();
        assert_eq!(back, class);
        assert!(back.is_remote());
    }
}
