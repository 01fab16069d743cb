use crate::view_model::RunView;
use crate::{CollectionStore, FinishReason, RenderedPost, ScrapeSettings};

pub type RunId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Running,
}

/// Everything one collection run accumulates between start and finalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunState {
    run_id: RunId,
    target: String,
    store: CollectionStore,
    previous_size: usize,
    idle_elapsed_ms: u64,
    ticks: u64,
}

impl RunState {
    pub fn new(run_id: RunId, target: String) -> Self {
        Self {
            run_id,
            target,
            store: CollectionStore::new(),
            previous_size: 0,
            idle_elapsed_ms: 0,
            ticks: 0,
        }
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn store(&self) -> &CollectionStore {
        &self.store
    }

    pub fn idle_elapsed_ms(&self) -> u64 {
        self.idle_elapsed_ms
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Merges one sample into the store and updates the idle clock.
    /// Returns how many new posts the sample contributed.
    pub(crate) fn apply_tick(&mut self, posts: &[RenderedPost], interval_ms: u64) -> usize {
        self.ticks += 1;
        let mut added = 0;
        for post in posts.iter().filter(|p| p.is_authored_by(&self.target)) {
            if self.store.upsert_if_absent(post.snapshot()) {
                added += 1;
            }
        }

        let current = self.store.len();
        if current == self.previous_size {
            self.idle_elapsed_ms += interval_ms;
        } else {
            self.idle_elapsed_ms = 0;
            self.previous_size = current;
        }
        added
    }

    pub(crate) fn is_stable(&self, threshold_ms: u64) -> bool {
        self.idle_elapsed_ms >= threshold_ms
    }

    pub(crate) fn into_parts(self) -> (RunId, String, CollectionStore) {
        (self.run_id, self.target, self.store)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    settings: ScrapeSettings,
    run: Option<RunState>,
    last_run_id: RunId,
    last_finish: Option<FinishReason>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: ScrapeSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &ScrapeSettings {
        &self.settings
    }

    pub fn session(&self) -> SessionState {
        if self.run.is_some() {
            SessionState::Running
        } else {
            SessionState::Idle
        }
    }

    pub fn run(&self) -> Option<&RunState> {
        self.run.as_ref()
    }

    pub fn active_run_id(&self) -> Option<RunId> {
        self.run.as_ref().map(RunState::run_id)
    }

    pub fn view(&self) -> RunView {
        RunView {
            session: self.session(),
            target: self.run.as_ref().map(|r| r.target.clone()),
            collected: self.run.as_ref().map_or(0, |r| r.store.len()),
            idle_elapsed_ms: self.run.as_ref().map_or(0, |r| r.idle_elapsed_ms),
            ticks: self.run.as_ref().map_or(0, |r| r.ticks),
            last_finish: self.last_finish,
        }
    }

    /// Replaces any live run with a fresh one for `target`.
    pub(crate) fn begin_run(&mut self, target: String) -> RunId {
        self.last_run_id += 1;
        self.run = Some(RunState::new(self.last_run_id, target));
        self.last_finish = None;
        self.last_run_id
    }

    pub(crate) fn run_mut(&mut self) -> Option<&mut RunState> {
        self.run.as_mut()
    }

    pub(crate) fn take_run(&mut self, reason: FinishReason) -> Option<RunState> {
        let run = self.run.take();
        if run.is_some() {
            self.last_finish = Some(reason);
        }
        run
    }
}
