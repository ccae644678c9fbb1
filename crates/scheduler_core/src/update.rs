use scheduler_logging::{sched_debug, sched_info, sched_warn};

use crate::calendar::{term_range, week_overlaps_term};
use crate::merge::merge;
use crate::{Effect, Event, Msg, PageView, SchedulerState, SyncError, SyncPhase, SyncState, WeekOption};

/// Pure update function: applies a message to state and returns any effects.
///
/// Effects that change the page (`SelectYear`, `SelectWeek`) are always
/// preceded by `Persist`, because the page may reload before anything else
/// runs.
pub fn update(mut state: SchedulerState, msg: Msg) -> (SchedulerState, Vec<Effect>) {
    let effects = match msg {
        Msg::StartRequested {
            label,
            weeks,
            page_year,
        } => return start(state, label, weeks, page_year),
        Msg::Resumed { saved, view } => {
            state.replace_sync(Some(saved));
            resume(&mut state, &view)
        }
        Msg::PageObserved(view) => advance(&mut state, &view),
        Msg::WeekChangeRequested { changed } => {
            if !changed && state.phase() == SyncPhase::AwaitingWeek {
                // The picker already showed the week; nothing will reload.
                state.set_phase(SyncPhase::Extracting);
                vec![Effect::ExtractWeek]
            } else {
                Vec::new()
            }
        }
        Msg::WeekExtracted(events) => {
            if state.phase() == SyncPhase::Extracting {
                record_week(&mut state, events)
            } else {
                sched_debug!("ignoring extraction outside of the extracting phase");
                Vec::new()
            }
        }
        Msg::ResetRequested => {
            state.replace_sync(None);
            state.set_phase(SyncPhase::Idle);
            vec![Effect::ClearSyncState]
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn start(
    mut state: SchedulerState,
    label: String,
    weeks: Vec<WeekOption>,
    page_year: i32,
) -> (SchedulerState, Vec<Effect>) {
    let Some(term) = term_range(&label) else {
        sched_warn!("rejected sync start: unparseable term '{}'", label);
        return (state, vec![Effect::StartRejected(SyncError::InvalidTerm(label))]);
    };

    let view = PageView::from_options(&weeks, page_year);
    let offered = weeks.len();
    let in_term: Vec<WeekOption> = weeks
        .into_iter()
        .filter(|week| week_overlaps_term(&week.text, page_year, &term))
        .collect();
    if in_term.is_empty() {
        sched_warn!("rejected sync start: none of {} weeks overlap {}", offered, term.label);
        return (
            state,
            vec![Effect::StartRejected(SyncError::NoWeeksInTerm(term.label))],
        );
    }

    sched_info!(
        "starting sync of {} ({} to {}) over {} of {} weeks",
        term.label,
        term.start_date,
        term.end_date,
        in_term.len(),
        offered
    );
    let sync = SyncState::new(term, in_term);
    let mut effects = vec![Effect::ClearWeeklySchedule, Effect::Persist(sync.clone())];
    state.replace_sync(Some(sync));
    effects.extend(advance(&mut state, &view));
    (state, effects)
}

/// Resumes after a reload. The reload was caused by our own year or week
/// change, so the displayed week is normally the one under the cursor and is
/// extracted directly. A page that visibly shows something else is steered
/// back instead of being recorded under the wrong week.
fn resume(state: &mut SchedulerState, view: &PageView) -> Vec<Effect> {
    let Some(sync) = state.sync() else {
        return Vec::new();
    };
    if sync.is_complete() {
        return finish(state);
    }

    let year_matches = view.current_year == sync.term.year;
    let week_matches = match (&view.selected_week, sync.current_week()) {
        (Some(selected), Some(expected)) => *selected == expected.value,
        _ => true,
    };

    if year_matches && week_matches {
        sched_debug!("resuming at week {}/{}", sync.cursor + 1, sync.weeks.len());
        state.set_phase(SyncPhase::Extracting);
        vec![Effect::ExtractWeek]
    } else {
        sched_debug!("page does not show the cursor week after reload; reselecting");
        advance(state, view)
    }
}

fn advance(state: &mut SchedulerState, view: &PageView) -> Vec<Effect> {
    let Some(sync) = state.sync() else {
        return Vec::new();
    };
    let Some(week) = sync.current_week() else {
        return finish(state);
    };

    if view.current_year != sync.term.year {
        let year = sync.term.year;
        let effects = vec![Effect::Persist(sync.clone()), Effect::SelectYear(year)];
        state.set_phase(SyncPhase::AwaitingYear);
        return effects;
    }

    if view.selected_week.as_deref() != Some(week.value.as_str()) {
        let effects = vec![
            Effect::Persist(sync.clone()),
            Effect::SelectWeek(week.value.clone()),
        ];
        state.set_phase(SyncPhase::AwaitingWeek);
        return effects;
    }

    state.set_phase(SyncPhase::Extracting);
    vec![Effect::ExtractWeek]
}

fn record_week(state: &mut SchedulerState, events: Vec<Event>) -> Vec<Effect> {
    let Some(sync) = state.sync_mut() else {
        return Vec::new();
    };

    let found = events.len();
    let before = sync.collected.len();
    sync.collected = merge(std::mem::take(&mut sync.collected), events);
    sync.cursor += 1;
    sched_info!(
        "week {}/{}: {} events extracted, {} new, {} collected",
        sync.cursor,
        sync.weeks.len(),
        found,
        sync.collected.len() - before,
        sync.collected.len()
    );

    vec![Effect::Persist(sync.clone()), Effect::Continue]
}

fn finish(state: &mut SchedulerState) -> Vec<Effect> {
    state.set_phase(SyncPhase::Done);
    match state.replace_sync(None) {
        Some(sync) => {
            sched_info!(
                "sync of {} complete: {} events",
                sync.term.label,
                sync.collected.len()
            );
            vec![Effect::Finish(sync.collected), Effect::ClearSyncState]
        }
        None => Vec::new(),
    }
}
