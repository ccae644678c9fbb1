use serde::{Deserialize, Serialize};

use crate::calendar::TermInfo;
use crate::event::Event;

/// One entry of the host page's week picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekOption {
    pub value: String,
    pub text: String,
    #[serde(default)]
    pub selected: bool,
}

/// Durable progress of a term sync. Persisted before every page change so
/// the next page load can pick up where this one stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncState {
    pub term: TermInfo,
    pub weeks: Vec<WeekOption>,
    pub cursor: usize,
    pub collected: Vec<Event>,
}

impl SyncState {
    pub fn new(term: TermInfo, weeks: Vec<WeekOption>) -> Self {
        Self {
            term,
            weeks,
            cursor: 0,
            collected: Vec::new(),
        }
    }

    /// The next week not yet extracted.
    pub fn current_week(&self) -> Option<&WeekOption> {
        self.weeks.get(self.cursor)
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.weeks.len()
    }

    pub fn progress(&self) -> Progress {
        Progress {
            term: self.term.label.clone(),
            cursor: self.cursor.min(self.weeks.len()),
            total: self.weeks.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub term: String,
    pub cursor: usize,
    pub total: usize,
}

impl Progress {
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((self.cursor * 100) / self.total) as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncPhase {
    #[default]
    Idle,
    AwaitingYear,
    AwaitingWeek,
    Extracting,
    Done,
}

/// In-memory view of the machine for one page load. Only `sync` outlives
/// the load, through the store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchedulerState {
    phase: SyncPhase,
    sync: Option<SyncState>,
}

impl SchedulerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    pub fn sync(&self) -> Option<&SyncState> {
        self.sync.as_ref()
    }

    pub fn progress(&self) -> Option<Progress> {
        self.sync.as_ref().map(SyncState::progress)
    }

    pub(crate) fn set_phase(&mut self, phase: SyncPhase) {
        self.phase = phase;
    }

    pub(crate) fn sync_mut(&mut self) -> Option<&mut SyncState> {
        self.sync.as_mut()
    }

    pub(crate) fn replace_sync(&mut self, sync: Option<SyncState>) -> Option<SyncState> {
        std::mem::replace(&mut self.sync, sync)
    }
}
