use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use replies_core::RunId;

use super::AppEvent;

/// Repeating pulse for one run. Cancelling sets a flag the pulse thread
/// checks before every send, so no pulse is sent after `cancel` returns
/// except one already past the check.
pub struct PollTimer {
    run_id: RunId,
    cancelled: Arc<AtomicBool>,
}

impl PollTimer {
    pub fn start(run_id: RunId, interval: Duration, tx: mpsc::Sender<AppEvent>) -> Self {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = cancelled.clone();
        thread::spawn(move || loop {
            thread::sleep(interval);
            if flag.load(Ordering::Acquire) {
                break;
            }
            if tx.send(AppEvent::Pulse { run_id }).is_err() {
                break;
            }
        });
        Self { run_id, cancelled }
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }
}

impl Drop for PollTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::time::Duration;

    use super::PollTimer;
    use crate::platform::AppEvent;

    #[test]
    fn pulses_until_cancelled() {
        let (tx, rx) = mpsc::channel();
        let timer = PollTimer::start(3, Duration::from_millis(5), tx);

        match rx.recv_timeout(Duration::from_secs(5)) {
            Ok(AppEvent::Pulse { run_id }) => assert_eq!(run_id, 3),
            other => panic!("expected a pulse, got {other:?}"),
        }

        timer.cancel();
        drop(timer);
        // Drain what was already in flight, then the thread must exit and
        // drop its sender.
        while rx.recv_timeout(Duration::from_secs(5)).is_ok() {}
        assert!(matches!(
            rx.recv_timeout(Duration::from_millis(50)),
            Err(mpsc::RecvTimeoutError::Disconnected)
        ));
    }
}
