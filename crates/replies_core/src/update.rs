use scrape_logging::{scrape_debug, scrape_info, set_poll_tick};

use crate::{
    resolve_target_identity, AppState, Effect, FinishReason, Msg, Notice, RenderedPost, RunError,
    RunId,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::StartClicked { location } => start(&mut state, &location),
        Msg::StopClicked => match state.active_run_id() {
            Some(_) => {
                scrape_info!("Scraping stopped early. Exporting collected posts...");
                finish(&mut state, FinishReason::Stopped)
            }
            None => vec![Effect::Notify(Notice::Error(RunError::NoActiveRun))],
        },
        Msg::Tick { run_id, posts } => tick(&mut state, run_id, &posts),
    };

    (state, effects)
}

fn start(state: &mut AppState, location: &str) -> Vec<Effect> {
    let target = match resolve_target_identity(location) {
        Ok(target) => target,
        Err(err) => return vec![Effect::Notify(Notice::Error(err))],
    };

    // Last start wins: the previous timer never keeps ticking next to the new one.
    let mut effects = Vec::with_capacity(3);
    if let Some(previous) = state.active_run_id() {
        effects.push(Effect::CancelTimer { run_id: previous });
    }

    let run_id = state.begin_run(target.clone());
    set_poll_tick(0);
    scrape_info!("Run {} started for {}", run_id, target);

    let settings = state.settings();
    effects.push(Effect::StartTimer {
        run_id,
        interval: settings.check_interval(),
        scroll_factor: settings.scroll_factor,
    });
    effects.push(Effect::Notify(Notice::RunStarted { target }));
    effects
}

fn tick(state: &mut AppState, run_id: RunId, posts: &[RenderedPost]) -> Vec<Effect> {
    // Ticks queued by a cancelled timer arrive after the fact; drop them.
    if state.active_run_id() != Some(run_id) {
        return Vec::new();
    }

    let interval_ms = state.settings().check_interval_ms;
    let threshold_ms = state.settings().stable_threshold_ms;
    let Some(run) = state.run_mut() else {
        return Vec::new();
    };

    let added = run.apply_tick(posts, interval_ms);
    set_poll_tick(run.ticks());
    scrape_debug!(
        "Collected {} unique posts so far (+{}). Stable time: {} ms",
        run.store().len(),
        added,
        run.idle_elapsed_ms()
    );

    if run.is_stable(threshold_ms) {
        scrape_info!(
            "No new posts for {} ms, assuming the timeline is exhausted",
            run.idle_elapsed_ms()
        );
        finish(state, FinishReason::Completed)
    } else {
        Vec::new()
    }
}

fn finish(state: &mut AppState, reason: FinishReason) -> Vec<Effect> {
    let Some(run) = state.take_run(reason) else {
        return Vec::new();
    };
    let (run_id, target, store) = run.into_parts();
    vec![
        Effect::CancelTimer { run_id },
        Effect::Finalize {
            run_id,
            target,
            snapshots: store.into_snapshots(),
            reason,
        },
    ]
}
