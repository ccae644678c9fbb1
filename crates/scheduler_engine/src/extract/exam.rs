use scheduler_core::{Event, EventKind, ExamTag};
use scheduler_logging::sched_debug;
use scraper::{Html, Selector};

use super::{element_text, row_cells};
use crate::clock::{parse_clock_range, parse_day_month_year};

pub(super) fn exam_events(doc: &Html) -> Vec<Event> {
    let scoped = Selector::parse("#ctl00_mainContent_divContent table tr").ok();
    let any = Selector::parse("table tr").ok();

    let mut rows: Vec<_> = scoped
        .as_ref()
        .map(|sel| doc.select(sel).collect())
        .unwrap_or_default();
    if rows.is_empty() {
        rows = any
            .as_ref()
            .map(|sel| doc.select(sel).collect())
            .unwrap_or_default();
    }

    let events: Vec<Event> = rows
        .into_iter()
        .skip(1)
        .filter_map(|row| {
            let cells: Vec<String> = row_cells(row).into_iter().map(element_text).collect();
            exam_from_cells(&cells)
        })
        .collect();
    sched_debug!("exam page: {} events", events.len());
    events
}

/// Cells are `[no, code, name, date, room, time, form, exam, ...]`.
fn exam_from_cells(cells: &[String]) -> Option<Event> {
    let [_no, code, _name, date, room, time, form, exam, rest @ ..] = cells else {
        return None;
    };
    if code.is_empty() {
        return None;
    }

    let day = parse_day_month_year(date)?;
    let (start, end) = parse_clock_range(time)?;
    let (start, end) = (day.and_time(start), day.and_time(end));
    if end <= start {
        return None;
    }

    Some(Event {
        title: code.clone(),
        location: room.clone(),
        description: form.clone(),
        start,
        end,
        kind: EventKind::Exam {
            tag: exam_tag(exam, rest.first().map(String::as_str), form),
        },
    })
}

/// An explicit tag cell wins. Only when there is no raw tag at all is the tag
/// inferred from the exam form.
fn exam_tag(exam: &str, trailing: Option<&str>, form: &str) -> Option<ExamTag> {
    let raw = [Some(exam), trailing]
        .into_iter()
        .flatten()
        .map(|cell| cell.trim().to_uppercase())
        .find(|cell| !cell.is_empty());

    match raw {
        Some(raw) => ExamTag::from_cell(&raw),
        None => {
            let form = form.to_lowercase();
            FORM_RULES
                .iter()
                .find(|(matches, _)| matches(&form))
                .map(|(_, tag)| *tag)
        }
    }
}

type FormRule = (fn(&str) -> bool, ExamTag);

const FORM_RULES: &[FormRule] = &[
    (is_second_final, ExamTag::SecondFinal),
    (is_second_practical, ExamTag::SecondPractical),
    (is_practical, ExamTag::Practical),
    (is_final, ExamTag::Final),
];

fn is_second_final(form: &str) -> bool {
    form.contains("2nd") && form.contains("fe")
}

fn is_second_practical(form: &str) -> bool {
    form.contains("2nd") && form.contains("pe")
}

fn is_practical(form: &str) -> bool {
    form.contains("practical_exam") || form.contains("project presentation")
}

fn is_final(form: &str) -> bool {
    form.contains("multiple_choices") || form.contains("speaking")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_tag_cell_wins() {
        assert_eq!(exam_tag(" pe ", None, "multiple_choices"), Some(ExamTag::Practical));
        assert_eq!(exam_tag("2ndfe", None, ""), Some(ExamTag::SecondFinal));
    }

    #[test]
    fn blank_tag_cell_uses_trailing_cell() {
        assert_eq!(exam_tag("", Some("FE"), "practical_exam"), Some(ExamTag::Final));
    }

    #[test]
    fn unknown_raw_tag_is_not_inferred() {
        assert_eq!(exam_tag("RESIT", None, "multiple_choices"), None);
    }

    #[test]
    fn form_inference_is_ordered() {
        assert_eq!(exam_tag("", None, "2Nd_FE multiple_choices"), Some(ExamTag::SecondFinal));
        assert_eq!(exam_tag("", None, "2nd pe"), Some(ExamTag::SecondPractical));
        assert_eq!(exam_tag("", None, "Project Presentation"), Some(ExamTag::Practical));
        assert_eq!(exam_tag("", None, "Speaking"), Some(ExamTag::Final));
        assert_eq!(exam_tag("", None, "oral"), None);
    }
}
