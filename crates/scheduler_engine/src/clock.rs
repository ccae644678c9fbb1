//! Lenient parsing of the clock and date cells found on portal pages.

use chrono::{NaiveDate, NaiveTime};

/// Parses a clock cell. Accepts `7:30`, `07:30`, `7h30`, `7h`, `7.30` and a
/// bare hour such as `7`. Whitespace anywhere is ignored.
pub fn parse_clock(raw: &str) -> Option<NaiveTime> {
    let cleaned: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return None;
    }

    let (hour, minute) = if let Some(idx) = cleaned.find(&['h', 'H'][..]) {
        let (h, m) = (&cleaned[..idx], &cleaned[idx + 1..]);
        (number(h)?, if m.is_empty() { 0 } else { number(m)? })
    } else if let Some((h, m)) = cleaned.split_once(':') {
        (number(h)?, number(m)?)
    } else if let Some((h, m)) = cleaned.split_once('.') {
        (number(h)?, number(m)?)
    } else if cleaned.len() <= 2 {
        (number(&cleaned)?, 0)
    } else {
        return None;
    };

    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Parses `start-end`, each side accepted by [`parse_clock`].
pub fn parse_clock_range(raw: &str) -> Option<(NaiveTime, NaiveTime)> {
    let (start, end) = raw.split_once('-')?;
    Some((parse_clock(start)?, parse_clock(end)?))
}

/// Parses `DD/MM/YYYY`.
pub fn parse_day_month_year(raw: &str) -> Option<NaiveDate> {
    let mut parts = raw.trim().split('/');
    let day = number(parts.next()?)?;
    let month = number(parts.next()?)?;
    let year: i32 = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parses `DD/MM`, as used in weekly header cells.
pub(crate) fn parse_day_month(raw: &str) -> Option<(u32, u32)> {
    let (day, month) = raw.trim().split_once('/')?;
    Some((number(day)?, number(month)?))
}

/// Finds the first `(H:MM-H:MM)` annotation in `text`, with one or two hour
/// digits and exactly two minute digits.
pub(crate) fn find_time_annotation(text: &str) -> Option<(NaiveTime, NaiveTime)> {
    text.match_indices('(').find_map(|(open, _)| {
        let rest = &text[open + 1..];
        let close = rest.find(')')?;
        let (start, end) = rest[..close].split_once('-')?;
        Some((strict_clock(start)?, strict_clock(end)?))
    })
}

fn strict_clock(raw: &str) -> Option<NaiveTime> {
    let (h, m) = raw.split_once(':')?;
    if !(1..=2).contains(&h.len()) || m.len() != 2 {
        return None;
    }
    NaiveTime::from_hms_opt(number(h)?, number(m)?, 0)
}

fn number(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
