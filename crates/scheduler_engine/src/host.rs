//! Collaborators the synchronizer drives: the schedule page, the pause
//! between steps and the place exported files go.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use scheduler_core::WeekOption;
use scheduler_logging::sched_info;

use crate::persist::{AtomicFileWriter, PersistError};
use crate::snapshot::PageSnapshot;

/// The week picker and year of the displayed weekly page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekListing {
    pub weeks: Vec<WeekOption>,
    pub current_year: i32,
}

/// The weekly schedule page. Changing the year or week may reload it, after
/// which the host calls [`crate::Synchronizer::resume_if_pending`] again.
pub trait HostPage {
    fn week_options(&self) -> WeekListing;

    /// Requests `value` in the week picker. Returns `false` when the week
    /// was already displayed or the picker is missing, in which case no
    /// reload follows.
    fn select_week(&mut self, value: &str) -> bool;

    /// Requests `year`. A reload always follows.
    fn select_year(&mut self, year: i32);

    fn snapshot(&self) -> PageSnapshot;
}

pub trait Pacer {
    fn pause(&mut self, delay: Duration);
}

/// Sleeps the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&mut self, delay: Duration) {
        thread::sleep(delay);
    }
}

/// Never waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPause;

impl Pacer for NoPause {
    fn pause(&mut self, _delay: Duration) {}
}

pub trait FileSink {
    fn deliver(&mut self, bytes: &[u8], filename: &str) -> Result<(), PersistError>;
}

/// Writes delivered files into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    writer: AtomicFileWriter,
    delivered: Vec<PathBuf>,
}

impl DirectorySink {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            writer: AtomicFileWriter::new(dir),
            delivered: Vec::new(),
        }
    }

    /// Paths written so far, oldest first.
    pub fn delivered(&self) -> &[PathBuf] {
        &self.delivered
    }
}

impl FileSink for DirectorySink {
    fn deliver(&mut self, bytes: &[u8], filename: &str) -> Result<(), PersistError> {
        let path = self.writer.write(filename, bytes)?;
        sched_info!("wrote {} ({} bytes)", path.display(), bytes.len());
        self.delivered.push(path);
        Ok(())
    }
}
