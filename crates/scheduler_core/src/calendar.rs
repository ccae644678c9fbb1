//! Term date ranges and the week/term overlap test.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use scheduler_logging::sched_debug;
use serde::{Deserialize, Serialize};

/// First year offered by the term picker.
const FIRST_TERM_YEAR: i32 = 2022;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Fall,
}

impl Season {
    pub const ALL: [Season; 3] = [Season::Spring, Season::Summer, Season::Fall];

    pub fn as_str(self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
        }
    }

    /// Inclusive month window covered by the season.
    pub fn months(self) -> (u32, u32) {
        match self {
            Season::Spring => (1, 4),
            Season::Summer => (5, 8),
            Season::Fall => (9, 12),
        }
    }

    pub fn containing_month(month: u32) -> Season {
        match month {
            1..=4 => Season::Spring,
            5..=8 => Season::Summer,
            _ => Season::Fall,
        }
    }

    fn parse_ci(raw: &str) -> Option<Season> {
        Season::ALL
            .into_iter()
            .find(|season| season.as_str().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One academic term with its inclusive calendar range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermInfo {
    pub label: String,
    pub season: Season,
    pub year: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl TermInfo {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// Parses a label such as `Spring25` into its term. The season name is
/// matched case-insensitively; the year must be exactly two digits.
pub fn term_range(label: &str) -> Option<TermInfo> {
    let label = label.trim();
    let split = label.len().checked_sub(2)?;
    if !label.is_char_boundary(split) {
        return None;
    }
    let (season_part, year_part) = label.split_at(split);
    if !year_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let season = Season::parse_ci(season_part)?;
    let year_short: i32 = year_part.parse().ok()?;
    let year = 2000 + year_short;

    let (first_month, last_month) = season.months();
    let start_date = NaiveDate::from_ymd_opt(year, first_month, 1)?;
    let end_date = last_day_of_month(year, last_month)?;

    Some(TermInfo {
        label: format!("{}{}", season.as_str(), year_part),
        season,
        year,
        start_date,
        end_date,
    })
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

fn label_for(season: Season, year: i32) -> String {
    format!("{}{:02}", season.as_str(), year.rem_euclid(100))
}

/// Label of the term whose window contains `today`. Only used to preselect
/// the term picker.
pub fn default_term(today: NaiveDate) -> String {
    label_for(Season::containing_month(today.month()), today.year())
}

/// Every selectable term label from the first supported year through the
/// year after `today`, oldest first.
pub fn term_options(today: NaiveDate) -> Vec<String> {
    let last_year = today.year() + 1;
    (FIRST_TERM_YEAR..=last_year)
        .flat_map(|year| Season::ALL.into_iter().map(move |s| label_for(s, year)))
        .collect()
}

/// Day/month endpoints of a week option label such as `29/12 To 04/01`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekRange {
    pub start_day: u32,
    pub start_month: u32,
    pub end_day: u32,
    pub end_month: u32,
}

impl WeekRange {
    pub fn crosses_year(&self) -> bool {
        self.end_month < self.start_month
    }
}

/// Finds the first `D/M To D/M` range in `text`.
pub fn parse_week_range(text: &str) -> Option<WeekRange> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    tokens.windows(3).find_map(|window| {
        if !window[1].eq_ignore_ascii_case("to") {
            return None;
        }
        let (start_day, start_month) = parse_day_month(window[0])?;
        let (end_day, end_month) = parse_day_month(window[2])?;
        Some(WeekRange {
            start_day,
            start_month,
            end_day,
            end_month,
        })
    })
}

fn parse_day_month(token: &str) -> Option<(u32, u32)> {
    let (day, month) = token.split_once('/')?;
    let valid = |part: &str| (1..=2).contains(&part.len()) && part.bytes().all(|b| b.is_ascii_digit());
    if !valid(day) || !valid(month) {
        return None;
    }
    Some((day.parse().ok()?, month.parse().ok()?))
}

/// Whether the week labelled `week_text` shares at least one day with `term`.
///
/// Week labels carry no year. Dates are placed in the term's year; a label
/// that wraps past December is resolved by season: in Spring the first date
/// belongs to the previous year, otherwise the last date belongs to the next.
pub fn week_overlaps_term(week_text: &str, page_year: i32, term: &TermInfo) -> bool {
    let Some(range) = parse_week_range(week_text) else {
        return false;
    };
    if page_year != term.year {
        sched_debug!(
            "week '{}' listed under {} is placed in term year {}",
            week_text,
            page_year,
            term.year
        );
    }

    let mut start_year = term.year;
    let mut end_year = term.year;
    if range.crosses_year() {
        if term.season == Season::Spring {
            start_year -= 1;
        } else {
            end_year += 1;
        }
    }

    let (Some(week_start), Some(week_end)) = (
        NaiveDate::from_ymd_opt(start_year, range.start_month, range.start_day),
        NaiveDate::from_ymd_opt(end_year, range.end_month, range.end_day),
    ) else {
        return false;
    };

    week_end >= term.start_date && week_start <= term.end_date
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_month_tokens_are_strict() {
        assert_eq!(parse_day_month("4/1"), Some((4, 1)));
        assert_eq!(parse_day_month("04/01"), Some((4, 1)));
        assert_eq!(parse_day_month("004/01"), None);
        assert_eq!(parse_day_month("a/01"), None);
        assert_eq!(parse_day_month("0401"), None);
    }

    #[test]
    fn last_day_handles_december_and_leap_years() {
        assert_eq!(
            last_day_of_month(2024, 2),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(
            last_day_of_month(2025, 12),
            NaiveDate::from_ymd_opt(2025, 12, 31)
        );
    }
}
