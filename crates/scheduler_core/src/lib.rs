//! Scheduler core: term calendar math, the event model, merge rules and the
//! pure term sync state machine.
mod calendar;
mod effect;
mod error;
mod event;
mod merge;
mod msg;
mod state;
mod subject;
mod update;

pub use calendar::{
    default_term, parse_week_range, term_options, term_range, week_overlaps_term, Season,
    TermInfo, WeekRange,
};
pub use effect::Effect;
pub use error::SyncError;
pub use event::{AttendanceStatus, Event, EventKey, EventKind, ExamTag};
pub use merge::merge;
pub use msg::{Msg, PageView};
pub use state::{Progress, SchedulerState, SyncPhase, SyncState, WeekOption};
pub use subject::{find_subject_code, is_remote_code, subject_code_prefix};
pub use update::update;
