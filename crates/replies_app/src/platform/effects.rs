use std::sync::mpsc;

use replies_core::{Effect, FinishReason, Notice, PostSnapshot, RunId};
use replies_engine::{
    finalize_run, ExportSummary, FinalizeError, FinalizeOptions, ResolveEvent, ResolveHandle,
};
use scrape_logging::{scrape_error, scrape_info, scrape_warn};

use super::timer::PollTimer;
use super::{notify, AppEvent};

struct ActiveTimer {
    timer: PollTimer,
    scroll_factor: f64,
}

/// Carries out the effects the pure update returns.
pub struct EffectRunner {
    pulse_tx: mpsc::Sender<AppEvent>,
    active: Option<ActiveTimer>,
    finalize: FinalizeOptions,
    resolver: Option<ResolveHandle>,
    pending_resolves: usize,
    exports: Vec<ExportSummary>,
}

impl EffectRunner {
    pub fn new(
        pulse_tx: mpsc::Sender<AppEvent>,
        finalize: FinalizeOptions,
        resolver: Option<ResolveHandle>,
    ) -> Self {
        Self {
            pulse_tx,
            active: None,
            finalize,
            resolver,
            pending_resolves: 0,
            exports: Vec::new(),
        }
    }

    pub fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartTimer {
                    run_id,
                    interval,
                    scroll_factor,
                } => {
                    self.cancel_active();
                    scrape_info!("Polling every {:?} for run {}", interval, run_id);
                    self.active = Some(ActiveTimer {
                        timer: PollTimer::start(run_id, interval, self.pulse_tx.clone()),
                        scroll_factor,
                    });
                }
                Effect::CancelTimer { run_id } => {
                    if self.active.as_ref().map(|a| a.timer.run_id()) == Some(run_id) {
                        self.cancel_active();
                    }
                }
                Effect::Finalize {
                    run_id,
                    target,
                    snapshots,
                    reason,
                } => self.finalize(run_id, &target, &snapshots, reason),
                Effect::Notify(Notice::RunStarted { target }) => {
                    notify(&format!("Collecting replies by {target}. Type `stop` to end early."));
                }
                Effect::Notify(Notice::Error(err)) => notify(&err.to_string()),
            }
        }
    }

    /// Scroll step for a pulse, or `None` when the pulse belongs to a timer
    /// that is no longer active.
    pub fn scroll_factor_for(&self, run_id: RunId) -> Option<f64> {
        self.active
            .as_ref()
            .filter(|a| a.timer.run_id() == run_id)
            .map(|a| a.scroll_factor)
    }

    pub fn cancel_active(&mut self) {
        if let Some(active) = self.active.take() {
            active.timer.cancel();
        }
    }

    /// Relays finished short-link resolutions without blocking.
    pub fn poll_background(&mut self) {
        let Some(resolver) = self.resolver.as_ref() else {
            return;
        };
        while let Some(event) = resolver.try_recv() {
            match event {
                ResolveEvent::Progress { link, .. } => {
                    scrape_info!("Processed URL: {} -> {}", link.url, link.outcome);
                }
                ResolveEvent::Completed { result, .. } => {
                    self.pending_resolves = self.pending_resolves.saturating_sub(1);
                    match result {
                        Ok(summary) => notify(&format!(
                            "Resolved {} short links into {}",
                            summary.resolved,
                            summary.output_path.display()
                        )),
                        Err(err) => scrape_error!("Short link resolution failed: {}", err),
                    }
                }
            }
        }
    }

    pub fn is_busy(&self) -> bool {
        self.active.is_some() || self.pending_resolves > 0
    }

    pub fn exports(&self) -> &[ExportSummary] {
        &self.exports
    }

    fn finalize(
        &mut self,
        run_id: RunId,
        target: &str,
        snapshots: &[PostSnapshot],
        reason: FinishReason,
    ) {
        scrape_info!(
            "Run {} {:?} with {} unique posts, exporting",
            run_id,
            reason,
            snapshots.len()
        );
        match finalize_run(target, snapshots, &self.finalize) {
            Ok(summary) => {
                notify(&format!(
                    "Exported {} replies to {}.",
                    summary.reply_count,
                    summary.replies_path.display()
                ));
                if let (Some(path), Some(resolver)) =
                    (summary.short_links_path.as_ref(), self.resolver.as_mut())
                {
                    resolver.resolve_file(path);
                    self.pending_resolves += 1;
                }
                self.exports.push(summary);
            }
            Err(FinalizeError::Run(err)) => {
                scrape_warn!("Run {} produced nothing to export", run_id);
                notify(&err.to_string());
            }
            Err(FinalizeError::Export(err)) => {
                scrape_error!("Export failed: {}", err);
                notify(&format!("Export failed: {err}"));
            }
        }
    }
}
