use crate::event::Event;
use crate::state::{SyncState, WeekOption};

/// What the host page currently displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub current_year: i32,
    /// `None` when the page does not report a selected week.
    pub selected_week: Option<String>,
}

impl PageView {
    pub fn from_options(weeks: &[WeekOption], current_year: i32) -> Self {
        Self {
            current_year,
            selected_week: weeks.iter().find(|w| w.selected).map(|w| w.value.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User asked to synchronize `label`; carries the page's week picker.
    StartRequested {
        label: String,
        weeks: Vec<WeekOption>,
        page_year: i32,
    },
    /// A page finished loading while a sync was persisted.
    Resumed { saved: SyncState, view: PageView },
    /// Page state observed after the pause between steps.
    PageObserved(PageView),
    /// Host answered a week change; `false` means nothing was changed.
    WeekChangeRequested { changed: bool },
    /// Extractor output for the displayed week.
    WeekExtracted(Vec<Event>),
    /// User cancelled the sync.
    ResetRequested,
    NoOp,
}
