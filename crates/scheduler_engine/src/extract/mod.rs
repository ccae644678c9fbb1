//! Turns portal pages into [`Event`]s.
//!
//! Both parse paths are pure functions of the page markup. Anything that does
//! not look like a schedule entry is skipped rather than reported, so an
//! unexpected page yields an empty list.

mod exam;
mod picker;
mod rules;
mod weekly;

use scheduler_core::Event;
use scraper::ElementRef;

use crate::config::SchedulerConfig;
use crate::snapshot::PageSnapshot;

pub use picker::read_week_listing;

pub trait ScheduleExtractor {
    /// Class occurrences of the displayed week. `year` is the page's
    /// selected year.
    fn weekly(&self, page: &PageSnapshot, year: i32) -> Vec<Event>;

    /// Rows of the exam schedule page.
    fn exams(&self, page: &PageSnapshot) -> Vec<Event>;
}

/// Extractor for the portal's table layouts.
#[derive(Debug, Clone, Default)]
pub struct TableExtractor {
    config: SchedulerConfig,
}

impl TableExtractor {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }
}

impl ScheduleExtractor for TableExtractor {
    fn weekly(&self, page: &PageSnapshot, year: i32) -> Vec<Event> {
        weekly::weekly_events(&page.document(), year, &self.config)
    }

    fn exams(&self, page: &PageSnapshot) -> Vec<Event> {
        exam::exam_events(&page.document())
    }
}

/// Text content with runs of whitespace collapsed to one space.
fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Direct `td`/`th` children of a table row.
fn row_cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| matches!(cell.value().name(), "td" | "th"))
        .collect()
}
