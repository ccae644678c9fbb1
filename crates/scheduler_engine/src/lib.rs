//! Scheduler engine: page extraction, iCalendar output, persistence and the
//! synchronizer that executes core effects against the host page.
mod clock;
mod config;
mod decode;
mod error;
mod export;
mod extract;
mod host;
mod ics;
mod persist;
mod snapshot;
mod store;
mod synchronizer;

pub use clock::{parse_clock, parse_clock_range, parse_day_month_year};
pub use config::{SchedulerConfig, SlotTime, SlotTimes};
pub use decode::{decode_html, DecodeError, DecodedHtml};
pub use error::EngineError;
pub use export::{with_meeting_links, ExportPreset};
pub use extract::{read_week_listing, ScheduleExtractor, TableExtractor};
pub use host::{DirectorySink, FileSink, HostPage, NoPause, Pacer, ThreadPacer, WeekListing};
pub use ics::{IcsWriter, StampSource, UidSource};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use snapshot::PageSnapshot;
pub use store::{keys, load_value, save_value, FileStore, KeyValueStore, MemoryStore, StoreError};
pub use synchronizer::{StepOutcome, Synchronizer, TodaySource};
