use crate::{FinishReason, SessionState};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunView {
    pub session: SessionState,
    pub target: Option<String>,
    pub collected: usize,
    pub idle_elapsed_ms: u64,
    pub ticks: u64,
    pub last_finish: Option<FinishReason>,
}
