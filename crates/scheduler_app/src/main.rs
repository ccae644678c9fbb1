mod logging;
mod replay;
mod settings;

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use scheduler_core::{default_term, term_options};
use scheduler_engine::{
    ensure_output_dir, DirectorySink, EngineError, ExportPreset, FileStore, HostPage, SchedulerConfig,
    StepOutcome, Synchronizer, ThreadPacer,
};
use scheduler_logging::sched_info;

use crate::logging::LogDestination;
use crate::replay::{BlankPage, ReplayHost, SavedPage};
use crate::settings::{load_config, Overrides};

/// Upper bound on page loads in one run. A term has at most a few dozen
/// weeks and each needs one or two loads.
const MAX_RELOADS: usize = 200;

#[derive(Parser)]
#[command(name = "fap-scheduler")]
#[command(about = "Sync a term of FAP weekly schedules and exams into calendar files")]
struct Cli {
    /// Config file (ron)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Where schedules and sync progress are kept between runs
    #[arg(long, global = true, default_value = "scheduler.ron")]
    store: PathBuf,

    #[arg(long, global = true, value_enum, default_value_t = LogDestination::Terminal)]
    log: LogDestination,

    #[arg(short, long, global = true)]
    verbose: bool,

    /// Pause between weeks, in milliseconds
    #[arg(long, global = true)]
    step_delay_ms: Option<u64>,

    /// Pause after each page load, in milliseconds
    #[arg(long, global = true)]
    resume_delay_ms: Option<u64>,

    /// Offset of the portal's local time from UTC, in minutes
    #[arg(long, global = true, allow_negative_numbers = true)]
    utc_offset_minutes: Option<i32>,

    /// Skip all pauses
    #[arg(long, global = true)]
    no_delay: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Saved weekly pages and the page shown first.
#[derive(clap::Args)]
struct PagesArgs {
    /// Directory of saved pages, laid out as <year>/<week>.html
    #[arg(long)]
    pages: PathBuf,

    /// Year displayed at start (default: latest saved)
    #[arg(long)]
    year: Option<i32>,

    /// Week picker value displayed at start
    #[arg(long)]
    week: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the terms that can be synced
    Terms,
    /// Sync every week of a term, e.g. Spring25
    Sync {
        term: String,
        #[command(flatten)]
        pages: PagesArgs,
    },
    /// Remember a term and start its sync on the next `load`
    Request { term: String },
    /// Simulate a page load: start a requested sync or continue one
    Load {
        #[command(flatten)]
        pages: PagesArgs,
    },
    /// Show the sync in progress
    Progress,
    /// Add the displayed week to the weekly schedule
    Week {
        #[command(flatten)]
        pages: PagesArgs,
    },
    /// Replace the exam schedule with the exams on a saved page
    Exams { file: PathBuf },
    /// Write calendar files
    Export {
        #[arg(value_enum, default_value_t = PresetArg::All)]
        preset: PresetArg,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },
    /// Forget schedules, progress and the remembered term
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PresetArg {
    Exams,
    Classes,
    Online,
    All,
}

impl PresetArg {
    fn presets(self) -> Vec<ExportPreset> {
        match self {
            PresetArg::Exams => vec![ExportPreset::UpcomingExams],
            PresetArg::Classes => vec![ExportPreset::OfflineClasses],
            PresetArg::Online => vec![ExportPreset::OnlineClasses],
            PresetArg::All => ExportPreset::ALL.to_vec(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log, cli.verbose);

    let overrides = Overrides {
        step_delay_ms: cli.step_delay_ms,
        resume_delay_ms: cli.resume_delay_ms,
        utc_offset_minutes: cli.utc_offset_minutes,
        no_delay: cli.no_delay,
    };
    let config = load_config(cli.config.as_deref(), &overrides)?;

    match cli.command {
        Commands::Terms => {
            let today = Local::now().date_naive();
            let current = default_term(today);
            for term in term_options(today) {
                let mark = if term == current { "*" } else { " " };
                println!("{mark} {term}");
            }
            Ok(())
        }
        Commands::Sync { term, pages } => {
            let mut sync = open(pages.host()?, &cli.store, &config)?;
            let outcome = sync.start_sync(&term)?;
            drive(sync, outcome, &config)
        }
        Commands::Request { term } => {
            open(BlankPage, &cli.store, &config)?.request_sync_on_next_load(&term)?;
            println!("sync of {} will start on the next load", term.trim());
            Ok(())
        }
        Commands::Load { pages } => {
            let mut sync = open(pages.host()?, &cli.store, &config)?;
            let outcome = sync.resume_if_pending()?;
            drive(sync, outcome, &config)
        }
        Commands::Progress => {
            let sync = open(BlankPage, &cli.store, &config)?;
            match sync.current_progress() {
                Some(progress) => println!(
                    "{}: week {} of {} ({}%)",
                    progress.term,
                    progress.cursor,
                    progress.total,
                    progress.percent()
                ),
                None => println!("no sync in progress"),
            }
            if let Some(term) = sync.remembered_term() {
                println!("selected term: {term}");
            }
            println!(
                "stored: {} classes, {} exams",
                sync.weekly_schedule().len(),
                sync.exam_schedule().len()
            );
            Ok(())
        }
        Commands::Week { pages } => {
            let added = open(pages.host()?, &cli.store, &config)?.sync_current_week()?;
            println!("added {added} classes from the displayed week");
            Ok(())
        }
        Commands::Exams { file } => {
            let found = open(SavedPage::open(&file)?, &cli.store, &config)?.sync_exam_schedule()?;
            println!("stored {found} exams");
            Ok(())
        }
        Commands::Export { preset, out } => {
            ensure_output_dir(&out)?;
            let mut sync = open(BlankPage, &cli.store, &config)?;
            let mut sink = DirectorySink::new(out);
            let presets = preset.presets();
            let mut skipped = 0;
            for preset in &presets {
                match sync.deliver_export(*preset, &mut sink) {
                    Ok(()) => {}
                    // Exporting everything skips empty presets.
                    Err(EngineError::NothingToExport(reason)) if presets.len() > 1 => {
                        sched_info!("skipped: {}", reason);
                        skipped += 1;
                    }
                    Err(err) => return Err(err.into()),
                }
            }
            if skipped == presets.len() {
                bail!("nothing stored to export");
            }
            for path in sink.delivered() {
                println!("{}", path.display());
            }
            Ok(())
        }
        Commands::Reset => {
            open(BlankPage, &cli.store, &config)?.reset()?;
            println!("cleared");
            Ok(())
        }
    }
}

impl PagesArgs {
    fn host(&self) -> Result<ReplayHost> {
        ReplayHost::open(&self.pages, self.year, self.week.as_deref())
    }
}

fn open<H: HostPage>(
    host: H,
    store: &Path,
    config: &SchedulerConfig,
) -> Result<Synchronizer<H, FileStore, ThreadPacer>> {
    let store = FileStore::open(store)?;
    Ok(Synchronizer::new(host, store, ThreadPacer, config.clone()))
}

/// Keeps "reloading" the replayed page until the sync stops asking for it.
fn drive(
    mut sync: Synchronizer<ReplayHost, FileStore, ThreadPacer>,
    mut outcome: StepOutcome,
    config: &SchedulerConfig,
) -> Result<()> {
    while outcome == StepOutcome::AwaitingReload {
        if sync.host().reloads() > MAX_RELOADS {
            bail!("gave up after {MAX_RELOADS} page loads");
        }
        if let Some(progress) = sync.current_progress() {
            println!(
                "{} {:>3}% ({}/{})",
                progress.term,
                progress.percent(),
                progress.cursor,
                progress.total
            );
        }
        let (host, store) = sync.into_parts();
        sync = Synchronizer::new(host, store, ThreadPacer, config.clone());
        outcome = sync.resume_if_pending()?;
    }

    match outcome {
        StepOutcome::Completed { events } => println!("done: {events} classes stored"),
        StepOutcome::Idle => println!("no sync pending"),
        StepOutcome::AwaitingReload => {}
    }
    Ok(())
}
