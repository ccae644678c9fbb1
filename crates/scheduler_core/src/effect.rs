use crate::error::SyncError;
use crate::event::Event;
use crate::state::SyncState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start failed; nothing was created.
    StartRejected(SyncError),
    /// Drop the stored weekly schedule before a fresh sync.
    ClearWeeklySchedule,
    /// Write the sync state to the store.
    Persist(SyncState),
    /// Change the page's year. The page reloads.
    SelectYear(i32),
    /// Change the page's week. The page usually reloads.
    SelectWeek(String),
    /// Run the weekly extractor on the displayed page.
    ExtractWeek,
    /// Pause briefly, then observe the page again.
    Continue,
    /// Store the collected events as the weekly schedule.
    Finish(Vec<Event>),
    /// Delete the persisted sync state.
    ClearSyncState,
}
