use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use scheduler_core::{
    default_term, parse_week_range, term_options, term_range, week_overlaps_term, Season,
    WeekRange,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn term_ranges_cover_whole_months() {
    for year_short in 0..100 {
        for (season, first, last_month) in [("Spring", 1, 4), ("Summer", 5, 8), ("Fall", 9, 12)] {
            let label = format!("{season}{year_short:02}");
            let term = term_range(&label).expect("valid label");
            let year = 2000 + year_short;
            assert_eq!(term.year, year);
            assert_eq!(term.label, label);
            assert_eq!(term.start_date, date(year, first, 1));
            // The day after the end is the first of the following month.
            let next = term.end_date.succ_opt().unwrap();
            assert_eq!(next.format("%d").to_string(), "01");
            assert_eq!(term.end_date.format("%m").to_string(), format!("{last_month:02}"));
            assert!(term.contains(term.start_date) && term.contains(term.end_date));
            assert!(!term.contains(next));
            assert!(!term.contains(term.start_date.pred_opt().unwrap()));
        }
    }
}

#[test]
fn term_range_normalizes_season_case() {
    let term = term_range("fALL24").unwrap();
    assert_eq!(term.label, "Fall24");
    assert_eq!(term.season, Season::Fall);
    assert_eq!(term.end_date, date(2024, 12, 31));
}

#[test]
fn malformed_labels_have_no_range() {
    for label in ["", "Spring", "Winter25", "Spring2025", "Spring2", "Spring2x", "25", "Sprïng25"] {
        assert!(term_range(label).is_none(), "{label:?} should be rejected");
    }
}

#[test]
fn default_term_follows_month() {
    assert_eq!(default_term(date(2025, 1, 5)), "Spring25");
    assert_eq!(default_term(date(2025, 4, 30)), "Spring25");
    assert_eq!(default_term(date(2025, 5, 1)), "Summer25");
    assert_eq!(default_term(date(2026, 10, 18)), "Fall26");
    assert_eq!(default_term(date(2030, 12, 31)), "Fall30");
}

#[test]
fn term_options_run_through_next_year() {
    let options = term_options(date(2023, 6, 1));
    assert_eq!(
        options,
        vec![
            "Spring22", "Summer22", "Fall22", "Spring23", "Summer23", "Fall23", "Spring24",
            "Summer24", "Fall24",
        ]
    );
}

#[test]
fn week_range_is_found_inside_label() {
    assert_eq!(
        parse_week_range("Week 1: 29/12 To 04/01"),
        Some(WeekRange {
            start_day: 29,
            start_month: 12,
            end_day: 4,
            end_month: 1,
        })
    );
    assert!(parse_week_range("29/12 - 04/01").is_none());
}

#[test]
fn year_boundary_week_belongs_to_spring() {
    let spring = term_range("Spring25").unwrap();
    assert!(week_overlaps_term("29/12 To 04/01", 2025, &spring));
}

#[test]
fn january_week_is_outside_previous_fall() {
    let fall = term_range("Fall24").unwrap();
    assert!(!week_overlaps_term("05/01 To 11/01", 2025, &fall));
}

#[test]
fn year_boundary_week_belongs_to_fall_too() {
    let fall = term_range("Fall24").unwrap();
    assert!(week_overlaps_term("30/12 To 05/01", 2024, &fall));
}

#[test]
fn partial_overlap_at_term_edges_counts() {
    let summer = term_range("Summer25").unwrap();
    // Ends on the first day of the term.
    assert!(week_overlaps_term("28/04 To 04/05", 2025, &summer));
    // Starts on the last day of the term.
    assert!(week_overlaps_term("31/08 To 06/09", 2025, &summer));
    assert!(!week_overlaps_term("21/04 To 27/04", 2025, &summer));
    assert!(!week_overlaps_term("01/09 To 07/09", 2025, &summer));
}

#[test]
fn unparseable_or_impossible_weeks_are_excluded() {
    let spring = term_range("Spring25").unwrap();
    assert!(!week_overlaps_term("", 2025, &spring));
    assert!(!week_overlaps_term("next week", 2025, &spring));
    assert!(!week_overlaps_term("30/02 To 06/03", 2025, &spring));
}
