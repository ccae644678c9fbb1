//! Field rules for one activity fragment (a `<p>` block inside a weekly
//! cell). Each field has an ordered rule list; the first rule that yields a
//! value wins.

use chrono::NaiveTime;
use scheduler_core::{find_subject_code, subject_code_prefix, AttendanceStatus};
use scraper::{ElementRef, Selector};
use url::Url;

use super::element_text;
use crate::clock::find_time_annotation;
use crate::config::SchedulerConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Link {
    href: String,
    label: String,
}

/// What the rules can see of a fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Fragment {
    text: String,
    links: Vec<Link>,
    time_label: Option<String>,
}

impl Fragment {
    pub(super) fn read(block: ElementRef<'_>) -> Self {
        let links = Selector::parse("a[href]")
            .ok()
            .map(|sel| {
                block
                    .select(&sel)
                    .map(|a| Link {
                        href: a.value().attr("href").unwrap_or_default().trim().to_string(),
                        label: element_text(a),
                    })
                    .collect()
            })
            .unwrap_or_default();
        let time_label = Selector::parse(".label-success")
            .ok()
            .and_then(|sel| block.select(&sel).next())
            .map(element_text);

        Self {
            text: element_text(block),
            links,
            time_label,
        }
    }

    #[cfg(test)]
    fn from_text(text: &str) -> Self {
        Self {
            text: super::collapse_whitespace(text),
            links: Vec::new(),
            time_label: None,
        }
    }
}

/// Values read from one fragment. `time` is `None` when the slot default
/// applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct FragmentFields {
    pub subject: String,
    pub room: String,
    pub meeting_url: Option<String>,
    pub time: Option<(NaiveTime, NaiveTime)>,
    pub status: AttendanceStatus,
}

/// `None` when the fragment names no subject.
pub(super) fn read_fields(fragment: &Fragment, config: &SchedulerConfig) -> Option<FragmentFields> {
    Some(FragmentFields {
        subject: first_match(SUBJECT_RULES, fragment, config)?,
        room: first_match(ROOM_RULES, fragment, config).unwrap_or_default(),
        meeting_url: first_match(MEETING_RULES, fragment, config),
        time: first_match(TIME_RULES, fragment, config),
        status: first_match(STATUS_RULES, fragment, config).unwrap_or_default(),
    })
}

type Rule<T> = fn(&Fragment, &SchedulerConfig) -> Option<T>;

fn first_match<T>(rules: &[Rule<T>], fragment: &Fragment, config: &SchedulerConfig) -> Option<T> {
    rules.iter().find_map(|rule| rule(fragment, config))
}

const SUBJECT_RULES: &[Rule<String>] = &[subject_from_link, subject_from_text];
const ROOM_RULES: &[Rule<String>] = &[room_after_at];
const MEETING_RULES: &[Rule<String>] = &[meeting_link];
const TIME_RULES: &[Rule<(NaiveTime, NaiveTime)>] = &[time_from_label, time_from_text];
const STATUS_RULES: &[Rule<AttendanceStatus>] = &[attended, absent];

fn is_meeting_link(link: &Link, config: &SchedulerConfig) -> bool {
    Url::parse(&link.href)
        .ok()
        .and_then(|url| url.host_str().map(|host| config.is_meeting_host(host)))
        .unwrap_or(false)
}

/// Marks the link to the activity detail page in an `href`.
const ACTIVITY_LINK: &str = "ActivityDetail";

/// The activity link label, such as `PRN231-`.
fn subject_from_link(fragment: &Fragment, _: &SchedulerConfig) -> Option<String> {
    let link = fragment
        .links
        .iter()
        .find(|link| link.href.contains(ACTIVITY_LINK))?;
    let label = link.label.trim();
    let label = label.strip_suffix('-').unwrap_or(label);
    subject_code_prefix(label).map(str::to_string)
}

fn subject_from_text(fragment: &Fragment, _: &SchedulerConfig) -> Option<String> {
    find_subject_code(&fragment.text).map(str::to_string)
}

/// `at <room>(`, matched case-insensitively.
fn room_after_at(fragment: &Fragment, _: &SchedulerConfig) -> Option<String> {
    let text = &fragment.text;
    let lower = text.to_ascii_lowercase();
    lower.match_indices("at").find_map(|(at, _)| {
        let after = &text[at + 2..];
        let room_start = after.len() - after.trim_start().len();
        if room_start == 0 {
            return None;
        }
        let rest = &after[room_start..];
        let close = rest.find('(')?;
        let room = rest[..close].trim();
        (close > 0 && !room.is_empty()).then(|| room.to_string())
    })
}

fn meeting_link(fragment: &Fragment, config: &SchedulerConfig) -> Option<String> {
    fragment
        .links
        .iter()
        .find(|link| is_meeting_link(link, config))
        .map(|link| link.href.clone())
}

fn time_from_label(fragment: &Fragment, _: &SchedulerConfig) -> Option<(NaiveTime, NaiveTime)> {
    fragment.time_label.as_deref().and_then(find_time_annotation)
}

fn time_from_text(fragment: &Fragment, _: &SchedulerConfig) -> Option<(NaiveTime, NaiveTime)> {
    find_time_annotation(&fragment.text)
}

fn attended(fragment: &Fragment, _: &SchedulerConfig) -> Option<AttendanceStatus> {
    let text = fragment.text.to_lowercase();
    (text.contains("attended") && !text.contains("not yet")).then_some(AttendanceStatus::Attended)
}

fn absent(fragment: &Fragment, _: &SchedulerConfig) -> Option<AttendanceStatus> {
    fragment
        .text
        .to_lowercase()
        .contains("absent")
        .then_some(AttendanceStatus::Absent)
}
