use scheduler_core::WeekOption;
use scraper::{ElementRef, Selector};

use super::element_text;
use crate::host::WeekListing;
use crate::snapshot::PageSnapshot;

const WEEK_OPTIONS: &str = "#ctl00_mainContent_drpSelectWeek option";
const YEAR_OPTIONS: &str = "#ctl00_mainContent_drpYear option";

/// Reads the year and week pickers of a weekly schedule page. Returns `None`
/// when the page has no week picker or no readable year.
///
/// As in a browser, a picker with no `selected` option shows its first one.
pub fn read_week_listing(page: &PageSnapshot) -> Option<WeekListing> {
    let doc = page.document();
    let week_sel = Selector::parse(WEEK_OPTIONS).ok()?;
    let year_sel = Selector::parse(YEAR_OPTIONS).ok()?;

    let options: Vec<ElementRef<'_>> = doc.select(&week_sel).collect();
    if options.is_empty() {
        return None;
    }
    let shown = displayed_index(&options);
    let weeks = options
        .iter()
        .enumerate()
        .map(|(i, option)| WeekOption {
            value: option_value(*option),
            text: element_text(*option),
            selected: i == shown,
        })
        .collect();

    let years: Vec<ElementRef<'_>> = doc.select(&year_sel).collect();
    let current_year = years
        .get(displayed_index(&years))
        .and_then(|option| option_value(*option).trim().parse().ok())?;

    Some(WeekListing {
        weeks,
        current_year,
    })
}

fn displayed_index(options: &[ElementRef<'_>]) -> usize {
    options
        .iter()
        .position(|option| option.value().attr("selected").is_some())
        .unwrap_or(0)
}

/// The `value` attribute, or the option text when it has none.
fn option_value(option: ElementRef<'_>) -> String {
    option
        .value()
        .attr("value")
        .map(str::to_string)
        .unwrap_or_else(|| element_text(option))
}
