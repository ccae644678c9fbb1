//! Host pages replayed from saved portal HTML.
//!
//! A pages directory holds one sub-directory per year, each with one file per
//! week named after the week picker value:
//!
//! ```text
//! pages/
//!   2024/52.html
//!   2025/1.html
//!   2025/2.html
//! ```
//!
//! Selecting a year or week "reloads" by switching files. Weeks that were
//! never saved show an empty page.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use scheduler_core::WeekOption;
use scheduler_engine::{read_week_listing, HostPage, PageSnapshot, WeekListing};
use scheduler_logging::{sched_debug, sched_warn};

const PAGE_EXTENSION: &str = "html";

#[derive(Debug, Clone)]
pub struct ReplayHost {
    root: PathBuf,
    year: i32,
    week: String,
    /// Week picker of each saved year, read from its pages.
    pickers: BTreeMap<i32, Vec<WeekOption>>,
    reloads: usize,
}

impl ReplayHost {
    /// Opens `root`, showing `year` and `week` or, when not given, the latest
    /// year and the week its saved pages mark as selected.
    pub fn open(root: &Path, year: Option<i32>, week: Option<&str>) -> Result<Self> {
        let pickers = read_pickers(root)?;
        let Some(&latest) = pickers.keys().next_back() else {
            bail!("no saved weekly pages under {}", root.display());
        };
        let year = year.unwrap_or(latest);
        let week = match week {
            Some(week) => week.to_string(),
            None => pickers
                .get(&year)
                .and_then(|weeks| weeks.iter().find(|w| w.selected).or_else(|| weeks.first()))
                .map(|w| w.value.clone())
                .unwrap_or_default(),
        };
        sched_debug!("replaying {} from {}/{}", root.display(), year, week);

        Ok(Self {
            root: root.to_path_buf(),
            year,
            week,
            pickers,
            reloads: 0,
        })
    }

    /// Page changes so far.
    pub fn reloads(&self) -> usize {
        self.reloads
    }

    pub fn position(&self) -> (i32, &str) {
        (self.year, &self.week)
    }

    fn page_path(&self) -> PathBuf {
        self.root
            .join(self.year.to_string())
            .join(format!("{}.{PAGE_EXTENSION}", self.week))
    }
}

impl HostPage for ReplayHost {
    fn week_options(&self) -> WeekListing {
        let weeks = self
            .pickers
            .get(&self.year)
            .map(|weeks| {
                weeks
                    .iter()
                    .map(|w| WeekOption {
                        selected: w.value == self.week,
                        ..w.clone()
                    })
                    .collect()
            })
            .unwrap_or_default();
        WeekListing {
            weeks,
            current_year: self.year,
        }
    }

    fn select_week(&mut self, value: &str) -> bool {
        if self.week == value {
            return false;
        }
        self.week = value.to_string();
        self.reloads += 1;
        true
    }

    fn select_year(&mut self, year: i32) {
        // The portal keeps the week number across years when it exists.
        let keeps_week = self
            .pickers
            .get(&year)
            .is_some_and(|weeks| weeks.iter().any(|w| w.value == self.week));
        if !keeps_week {
            self.week = self
                .pickers
                .get(&year)
                .and_then(|weeks| weeks.first())
                .map(|w| w.value.clone())
                .unwrap_or_default();
        }
        self.year = year;
        self.reloads += 1;
    }

    fn snapshot(&self) -> PageSnapshot {
        let path = self.page_path();
        match read_page(&path) {
            Ok(page) => page,
            Err(err) => {
                sched_warn!("{:#}", err);
                PageSnapshot::default()
            }
        }
    }
}

/// A single saved page, such as the exam schedule.
#[derive(Debug, Clone)]
pub struct SavedPage {
    page: PageSnapshot,
}

impl SavedPage {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            page: read_page(path)?,
        })
    }
}

impl HostPage for SavedPage {
    fn week_options(&self) -> WeekListing {
        read_week_listing(&self.page).unwrap_or(WeekListing {
            weeks: Vec::new(),
            current_year: 0,
        })
    }

    fn select_week(&mut self, _value: &str) -> bool {
        false
    }

    fn select_year(&mut self, _year: i32) {}

    fn snapshot(&self) -> PageSnapshot {
        self.page.clone()
    }
}

/// No page at all: for commands that only touch the store.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlankPage;

impl HostPage for BlankPage {
    fn week_options(&self) -> WeekListing {
        WeekListing {
            weeks: Vec::new(),
            current_year: 0,
        }
    }

    fn select_week(&mut self, _value: &str) -> bool {
        false
    }

    fn select_year(&mut self, _year: i32) {}

    fn snapshot(&self) -> PageSnapshot {
        PageSnapshot::default()
    }
}

fn read_page(path: &Path) -> Result<PageSnapshot> {
    let bytes = fs::read(path).with_context(|| format!("failed to read page {}", path.display()))?;
    PageSnapshot::from_bytes(&bytes, None)
        .with_context(|| format!("failed to decode page {}", path.display()))
}

/// Year directories and the week picker found on their pages.
fn read_pickers(root: &Path) -> Result<BTreeMap<i32, Vec<WeekOption>>> {
    let entries =
        fs::read_dir(root).with_context(|| format!("failed to list {}", root.display()))?;

    let mut pickers = BTreeMap::new();
    for entry in entries {
        let entry = entry?;
        let Some(year) = entry.file_name().to_str().and_then(|name| name.parse::<i32>().ok()) else {
            continue;
        };
        if !entry.file_type()?.is_dir() {
            continue;
        }
        match year_picker(&entry.path())? {
            Some(weeks) => {
                pickers.insert(year, weeks);
            }
            None => sched_warn!("no week picker found in {}", entry.path().display()),
        }
    }
    Ok(pickers)
}

fn year_picker(dir: &Path) -> Result<Option<Vec<WeekOption>>> {
    let mut pages: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == PAGE_EXTENSION))
        .collect();
    pages.sort();

    for path in pages {
        let page = read_page(&path)?;
        if let Some(listing) = read_week_listing(&page) {
            return Ok(Some(listing.weeks));
        }
    }
    Ok(None)
}
