use chrono::NaiveDate;
use scheduler_core::{Event, EventKind};
use scheduler_logging::{sched_debug, sched_trace};
use scraper::{Html, Selector};

use super::rules::{read_fields, Fragment};
use super::{element_text, row_cells};
use crate::clock::parse_day_month;
use crate::config::SchedulerConfig;

/// Index of Thursday in a Monday-first header; its date carries the page
/// year when a week spans New Year.
const THURSDAY: usize = 3;

pub(super) fn weekly_events(doc: &Html, year: i32, config: &SchedulerConfig) -> Vec<Event> {
    let dates = header_dates(doc, year);
    let Some(row_sel) = Selector::parse("tbody tr").ok() else {
        return Vec::new();
    };
    let Some(block_sel) = Selector::parse("p").ok() else {
        return Vec::new();
    };

    let mut events = Vec::new();
    for row in doc.select(&row_sel) {
        let cells = row_cells(row);
        if cells.len() < 2 {
            continue;
        }
        let Some(slot) = slot_number(&element_text(cells[0])) else {
            continue;
        };
        let Some(slot_time) = config.slot_times.get(slot) else {
            continue;
        };

        for (column, cell) in cells.iter().enumerate().skip(1).take(7) {
            let text = element_text(*cell);
            if text.is_empty() || text == "-" {
                continue;
            }
            let Some(date) = dates.get(column - 1).copied().flatten() else {
                sched_trace!("slot {} column {} has no header date", slot, column);
                continue;
            };

            for block in cell.select(&block_sel) {
                let Some(fields) = read_fields(&Fragment::read(block), config) else {
                    continue;
                };
                let (start, end) = fields.time.unwrap_or((slot_time.start, slot_time.end));
                let (start, end) = (date.and_time(start), date.and_time(end));
                if end <= start {
                    sched_debug!("dropping {} on {}: end is not after start", fields.subject, date);
                    continue;
                }
                events.push(Event {
                    title: fields.subject,
                    location: fields.room,
                    description: format!("Slot {slot}"),
                    start,
                    end,
                    kind: EventKind::Class {
                        status: fields.status,
                        meeting_url: fields.meeting_url,
                        slot: config.slot_times.is_listed(slot).then_some(slot),
                    },
                });
            }
        }
    }

    sched_debug!("weekly page ({}): {} events", year, events.len());
    events
}

/// Dates of the second header row, one entry per `DD/MM` cell. An entry is
/// `None` when the cell names an impossible date.
fn header_dates(doc: &Html, year: i32) -> Vec<Option<NaiveDate>> {
    let Some(row_sel) = Selector::parse("thead tr").ok() else {
        return Vec::new();
    };
    let Some(th_sel) = Selector::parse("th").ok() else {
        return Vec::new();
    };
    let Some(date_row) = doc.select(&row_sel).nth(1) else {
        return Vec::new();
    };

    let day_months: Vec<Option<(u32, u32)>> = date_row
        .select(&th_sel)
        .map(element_text)
        .filter(|text| text.contains('/'))
        .map(|text| parse_day_month(&text))
        .collect();
    assign_years(&day_months, year)
}

/// A header running `29/12 .. 04/01` rolls over where the month decreases.
/// The side holding Thursday is in `year`; the other side is in the adjacent
/// year.
fn assign_years(day_months: &[Option<(u32, u32)>], year: i32) -> Vec<Option<NaiveDate>> {
    let months: Vec<Option<u32>> = day_months.iter().map(|dm| dm.map(|(_, m)| m)).collect();
    let rollover = (1..months.len()).find(|&i| match (months[i - 1], months[i]) {
        (Some(prev), Some(month)) => month < prev,
        _ => false,
    });

    day_months
        .iter()
        .enumerate()
        .map(|(i, dm)| {
            let (day, month) = (*dm)?;
            let column_year = match rollover {
                Some(r) if r <= THURSDAY && i < r => year - 1,
                Some(r) if r > THURSDAY && i >= r => year + 1,
                _ => year,
            };
            NaiveDate::from_ymd_opt(column_year, month, day)
        })
        .collect()
}

/// `Slot N`, case-insensitive, anywhere in the cell.
fn slot_number(text: &str) -> Option<u8> {
    let lower = text.to_ascii_lowercase();
    lower.match_indices("slot").find_map(|(at, _)| {
        let digits: String = lower[at + 4..]
            .trim_start()
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        digits.parse().ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn slot_label() {
        assert_eq!(slot_number("Slot 3"), Some(3));
        assert_eq!(slot_number("SLOT7"), Some(7));
        assert_eq!(slot_number("Slot"), None);
        assert_eq!(slot_number("Mon"), None);
    }

    #[test]
    fn plain_week_uses_page_year() {
        let header = [Some((3, 3)), Some((4, 3)), Some((31, 2))];
        assert_eq!(
            assign_years(&header, 2025),
            vec![date(2025, 3, 3), date(2025, 3, 4), None]
        );
    }

    #[test]
    fn early_rollover_puts_december_in_previous_year() {
        let header: Vec<_> = [(30, 12), (31, 12), (1, 1), (2, 1), (3, 1), (4, 1), (5, 1)]
            .into_iter()
            .map(Some)
            .collect();
        let dates = assign_years(&header, 2025);
        assert_eq!(dates[0], date(2024, 12, 30));
        assert_eq!(dates[2], date(2025, 1, 1));
        assert_eq!(dates[6], date(2025, 1, 5));
    }

    #[test]
    fn late_rollover_puts_january_in_next_year() {
        let header: Vec<_> = [(26, 12), (27, 12), (28, 12), (29, 12), (30, 12), (31, 12), (1, 1)]
            .into_iter()
            .map(Some)
            .collect();
        let dates = assign_years(&header, 2024);
        assert_eq!(dates[3], date(2024, 12, 29));
        assert_eq!(dates[6], date(2025, 1, 1));
    }
}
