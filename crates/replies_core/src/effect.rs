use std::time::Duration;

use crate::{PostSnapshot, RunError, RunId};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Begin pulsing ticks for `run_id` every `interval`, scrolling by
    /// `scroll_factor` viewports before each sample.
    StartTimer {
        run_id: RunId,
        interval: Duration,
        scroll_factor: f64,
    },
    CancelTimer { run_id: RunId },
    /// Format and export everything the run collected.
    Finalize {
        run_id: RunId,
        target: String,
        snapshots: Vec<PostSnapshot>,
        reason: FinishReason,
    },
    Notify(Notice),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    /// No new posts appeared for the stable threshold.
    Completed,
    /// The user stopped the run early.
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    RunStarted { target: String },
    Error(RunError),
}
