//! Executes the core sync machine against a host page and a store.
//!
//! A browser page cannot keep running across its own reload, so every call
//! here runs until the machine either finishes or asks for a year or week
//! change that reloads the page. The host then calls
//! [`Synchronizer::resume_if_pending`] on the next load.

use std::collections::VecDeque;

use chrono::{Local, NaiveDate};
use scheduler_core::{
    default_term, merge, term_range, update, Effect, Event, Msg, PageView, Progress,
    SchedulerState, SyncError, SyncState,
};
use scheduler_logging::{sched_debug, sched_info, set_term_context};

use crate::config::SchedulerConfig;
use crate::error::EngineError;
use crate::export::{with_meeting_links, ExportPreset};
use crate::extract::{ScheduleExtractor, TableExtractor};
use crate::host::{FileSink, HostPage, Pacer};
use crate::ics::IcsWriter;
use crate::store::{keys, load_value, save_value, KeyValueStore};

/// Supplies the current date for default terms and export presets.
pub type TodaySource = Box<dyn Fn() -> NaiveDate>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// A year or week change was requested; resume on the next page load.
    AwaitingReload,
    /// The sync finished and the weekly schedule now holds `events`.
    Completed { events: usize },
    /// No sync was pending.
    Idle,
}

pub struct Synchronizer<H, S, P> {
    host: H,
    store: S,
    pacer: P,
    config: SchedulerConfig,
    extractor: Box<dyn ScheduleExtractor>,
    writer: IcsWriter,
    today: TodaySource,
}

impl<H: HostPage, S: KeyValueStore, P: Pacer> Synchronizer<H, S, P> {
    pub fn new(host: H, store: S, pacer: P, config: SchedulerConfig) -> Self {
        Self {
            extractor: Box::new(TableExtractor::new(config.clone())),
            writer: IcsWriter::new(&config),
            today: Box::new(|| Local::now().date_naive()),
            host,
            store,
            pacer,
            config,
        }
    }

    pub fn with_extractor(mut self, extractor: impl ScheduleExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    pub fn with_ics_writer(mut self, writer: IcsWriter) -> Self {
        self.writer = writer;
        self
    }

    pub fn with_today(mut self, today: impl Fn() -> NaiveDate + 'static) -> Self {
        self.today = Box::new(today);
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_parts(self) -> (H, S) {
        (self.host, self.store)
    }

    /// Starts synchronizing every week of `label` shown by the host's week
    /// picker. A sync already in progress is replaced.
    pub fn start_sync(&mut self, label: &str) -> Result<StepOutcome, EngineError> {
        let label = label.trim();
        let _context = TermContext::enter(label);
        let listing = self.host.week_options();
        let outcome = self.run(Msg::StartRequested {
            label: label.to_string(),
            weeks: listing.weeks,
            page_year: listing.current_year,
        })?;
        if let Some(term) = term_range(label) {
            save_value(&mut self.store, keys::SELECTED_TERM, &term.label)?;
        }
        Ok(outcome)
    }

    /// Called on every page load: starts a sync requested from elsewhere, or
    /// continues a persisted one.
    pub fn resume_if_pending(&mut self) -> Result<StepOutcome, EngineError> {
        if load_value::<bool>(&self.store, keys::PENDING_SYNC).unwrap_or(false) {
            self.store.remove(keys::PENDING_SYNC)?;
            let label = self
                .remembered_term()
                .unwrap_or_else(|| default_term((self.today)()));
            sched_info!("starting requested sync of {}", label);
            self.pacer.pause(self.config.resume_delay());
            return self.start_sync(&label);
        }

        let Some(saved) = load_value::<SyncState>(&self.store, keys::SYNC_STATE) else {
            return Ok(StepOutcome::Idle);
        };
        let _context = TermContext::enter(&saved.term.label);
        sched_debug!(
            "resuming at week {} of {}",
            saved.cursor + 1,
            saved.weeks.len()
        );
        self.pacer.pause(self.config.resume_delay());
        let listing = self.host.week_options();
        self.run(Msg::Resumed {
            saved,
            view: PageView::from_options(&listing.weeks, listing.current_year),
        })
    }

    /// Remembers `label` and flags a sync to start on the next page load.
    pub fn request_sync_on_next_load(&mut self, label: &str) -> Result<(), EngineError> {
        let term = term_range(label).ok_or_else(|| SyncError::InvalidTerm(label.to_string()))?;
        save_value(&mut self.store, keys::SELECTED_TERM, &term.label)?;
        save_value(&mut self.store, keys::PENDING_SYNC, &true)?;
        sched_info!("sync of {} requested for next page load", term.label);
        Ok(())
    }

    pub fn current_progress(&self) -> Option<Progress> {
        load_value::<SyncState>(&self.store, keys::SYNC_STATE).map(|sync| sync.progress())
    }

    pub fn remembered_term(&self) -> Option<String> {
        load_value(&self.store, keys::SELECTED_TERM)
    }

    pub fn weekly_schedule(&self) -> Vec<Event> {
        load_value(&self.store, keys::WEEKLY_SCHEDULE).unwrap_or_default()
    }

    pub fn exam_schedule(&self) -> Vec<Event> {
        load_value(&self.store, keys::EXAM_SCHEDULE).unwrap_or_default()
    }

    /// Merges the displayed week into the stored weekly schedule. Returns
    /// the number of events added.
    pub fn sync_current_week(&mut self) -> Result<usize, EngineError> {
        let listing = self.host.week_options();
        let found = self.extractor.weekly(&self.host.snapshot(), listing.current_year);
        let existing = self.weekly_schedule();
        let before = existing.len();
        let merged = merge(existing, found);
        let added = merged.len() - before;
        save_value(&mut self.store, keys::WEEKLY_SCHEDULE, &merged)?;
        sched_info!("current week: {} new events, {} stored", added, merged.len());
        Ok(added)
    }

    /// Replaces the stored exam schedule with the displayed exam page.
    pub fn sync_exam_schedule(&mut self) -> Result<usize, EngineError> {
        let exams = self.extractor.exams(&self.host.snapshot());
        save_value(&mut self.store, keys::EXAM_SCHEDULE, &exams)?;
        sched_info!("stored {} exams", exams.len());
        Ok(exams.len())
    }

    /// Serializes every stored event accepted by `filter`, exams first.
    pub fn export_ics(&mut self, filter: impl Fn(&Event) -> bool) -> Result<Vec<u8>, EngineError> {
        let selected = self.select(filter);
        self.render(selected, "no stored event matches the filter")
    }

    pub fn export_preset(&mut self, preset: ExportPreset) -> Result<Vec<u8>, EngineError> {
        let today = (self.today)();
        let config = self.config.clone();
        let selected = self.select(|event| preset.matches(event, today, &config));
        self.render(selected, &format!("no {preset} stored"))
    }

    /// Exports `preset` and hands the file to `sink`.
    pub fn deliver_export(
        &mut self,
        preset: ExportPreset,
        sink: &mut dyn FileSink,
    ) -> Result<(), EngineError> {
        let bytes = self.export_preset(preset)?;
        sink.deliver(&bytes, preset.file_name())
            .map_err(|source| EngineError::Delivery {
                filename: preset.file_name().to_string(),
                source,
            })
    }

    /// Forgets both schedules, any sync in progress and the remembered term.
    pub fn reset(&mut self) -> Result<(), EngineError> {
        for key in keys::ALL {
            self.store.remove(key)?;
        }
        set_term_context(None);
        sched_info!("all scheduler data cleared");
        Ok(())
    }

    fn select(&self, filter: impl Fn(&Event) -> bool) -> Vec<Event> {
        self.exam_schedule()
            .into_iter()
            .chain(self.weekly_schedule())
            .filter(|event| filter(event))
            .collect()
    }

    fn render(&mut self, selected: Vec<Event>, empty: &str) -> Result<Vec<u8>, EngineError> {
        if selected.is_empty() {
            return Err(EngineError::NothingToExport(empty.to_string()));
        }
        let events = with_meeting_links(selected);
        sched_info!("exporting {} events", events.len());
        Ok(self.writer.serialize(&events).into_bytes())
    }

    /// Feeds `msg` to the machine and executes effects until it settles or a
    /// reload is pending.
    fn run(&mut self, msg: Msg) -> Result<StepOutcome, EngineError> {
        let (mut state, effects) = update(SchedulerState::new(), msg);
        let mut queue: VecDeque<Effect> = effects.into();
        let mut outcome = StepOutcome::Idle;

        while let Some(effect) = queue.pop_front() {
            let next = match effect {
                Effect::StartRejected(err) => return Err(err.into()),
                Effect::ClearWeeklySchedule => {
                    self.store.remove(keys::WEEKLY_SCHEDULE)?;
                    None
                }
                Effect::Persist(sync) => {
                    save_value(&mut self.store, keys::SYNC_STATE, &sync)?;
                    None
                }
                Effect::SelectYear(year) => {
                    sched_debug!("selecting year {}", year);
                    self.host.select_year(year);
                    return Ok(StepOutcome::AwaitingReload);
                }
                Effect::SelectWeek(value) => {
                    sched_debug!("selecting week {}", value);
                    if self.host.select_week(&value) {
                        return Ok(StepOutcome::AwaitingReload);
                    }
                    Some(Msg::WeekChangeRequested { changed: false })
                }
                Effect::ExtractWeek => {
                    let listing = self.host.week_options();
                    let events = self
                        .extractor
                        .weekly(&self.host.snapshot(), listing.current_year);
                    Some(Msg::WeekExtracted(events))
                }
                Effect::Continue => {
                    self.pacer.pause(self.config.step_delay());
                    let listing = self.host.week_options();
                    Some(Msg::PageObserved(PageView::from_options(
                        &listing.weeks,
                        listing.current_year,
                    )))
                }
                Effect::Finish(events) => {
                    save_value(&mut self.store, keys::WEEKLY_SCHEDULE, &events)?;
                    outcome = StepOutcome::Completed {
                        events: events.len(),
                    };
                    None
                }
                Effect::ClearSyncState => {
                    self.store.remove(keys::SYNC_STATE)?;
                    None
                }
            };

            if let Some(msg) = next {
                let (next_state, more) = update(state, msg);
                state = next_state;
                queue.extend(more);
            }
        }

        Ok(outcome)
    }
}

/// Tags log lines with a term label until dropped.
struct TermContext;

impl TermContext {
    fn enter(label: &str) -> Self {
        set_term_context(Some(label));
        TermContext
    }
}

impl Drop for TermContext {
    fn drop(&mut self) {
        set_term_context(None);
    }
}
