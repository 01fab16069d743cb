use std::sync::mpsc;
use std::time::Duration;

use replies_core::{update, AppState, Msg, RunId, SessionState};
use replies_engine::{PostExtractor, RenderHost};
use scrape_logging::scrape_trace;

use super::console::{ConsoleCommand, HELP};
use super::effects::EffectRunner;
use super::{notify, AppEvent};

/// How often the loop wakes up to relay background results when idle.
const BACKGROUND_POLL: Duration = Duration::from_millis(50);

/// Owns the run state, the page and the extractor. Every mutation happens on
/// the thread that calls [`Harvester::run`], one event at a time.
pub struct Harvester<H: RenderHost> {
    state: AppState,
    location: String,
    host: H,
    extractor: Box<dyn PostExtractor>,
    effects: EffectRunner,
    exit_when_idle: bool,
}

impl<H: RenderHost> Harvester<H> {
    pub fn new(
        state: AppState,
        location: String,
        host: H,
        extractor: Box<dyn PostExtractor>,
        effects: EffectRunner,
    ) -> Self {
        Self {
            state,
            location,
            host,
            extractor,
            effects,
            exit_when_idle: false,
        }
    }

    /// Processes events until the user quits, or until the console is closed,
    /// every queued event has been handled and no run or background work
    /// remains.
    pub fn run(mut self, events: mpsc::Receiver<AppEvent>) -> EffectRunner {
        loop {
            let drained = match events.recv_timeout(BACKGROUND_POLL) {
                Ok(AppEvent::Pulse { run_id }) => {
                    self.on_pulse(run_id);
                    false
                }
                Ok(AppEvent::Command(command)) => {
                    if !self.on_command(command) {
                        break;
                    }
                    false
                }
                Ok(AppEvent::ConsoleClosed) => {
                    self.exit_when_idle = true;
                    false
                }
                Err(mpsc::RecvTimeoutError::Timeout) => true,
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    self.exit_when_idle = true;
                    true
                }
            };

            self.effects.poll_background();
            if drained
                && self.exit_when_idle
                && self.state.session() == SessionState::Idle
                && !self.effects.is_busy()
            {
                break;
            }
        }
        self.effects.cancel_active();
        self.effects
    }

    fn on_pulse(&mut self, run_id: RunId) {
        let Some(scroll_factor) = self.effects.scroll_factor_for(run_id) else {
            scrape_trace!("Dropping pulse from stale run {}", run_id);
            return;
        };
        self.host.scroll_by(scroll_factor);
        let posts = self.extractor.rendered_posts(self.host.document_html());
        self.dispatch(Msg::Tick { run_id, posts });
    }

    /// Returns false when the loop should end.
    fn on_command(&mut self, command: ConsoleCommand) -> bool {
        match command {
            ConsoleCommand::Start => self.dispatch(Msg::StartClicked {
                location: self.location.clone(),
            }),
            ConsoleCommand::Stop => self.dispatch(Msg::StopClicked),
            ConsoleCommand::Status => {
                let view = self.state.view();
                let line = match (&view.target, view.last_finish) {
                    (Some(target), _) => format!(
                        "Collecting {}: {} unique posts, stable for {} ms after {} ticks.",
                        target, view.collected, view.idle_elapsed_ms, view.ticks
                    ),
                    (None, Some(reason)) => format!("Idle, last run {reason:?}."),
                    (None, None) => "Idle.".to_string(),
                };
                notify(&format!("{} {}", line, HELP));
            }
            ConsoleCommand::Quit => {
                if self.state.session() == SessionState::Running {
                    notify("Quitting; the current run is discarded.");
                }
                return false;
            }
        }
        true
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.effects.run(effects);
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::mpsc;

    use pretty_assertions::assert_eq;
    use replies_core::{AppState, ScrapeSettings};
    use replies_engine::{ArticleExtractor, ExportOptions, FinalizeOptions, FrameReplayHost};
    use tempfile::TempDir;

    use super::Harvester;
    use crate::platform::console::ConsoleCommand;
    use crate::platform::effects::EffectRunner;
    use crate::platform::AppEvent;

    fn tweet(id: u32) -> String {
        format!(
            r#"<article><a href="/alice">@alice</a><a href="/alice/status/{id}"></a><div data-testid="tweetText">reply {id}</div></article>"#
        )
    }

    fn harvester(
        out: &TempDir,
        frames: Vec<String>,
    ) -> (
        Harvester<FrameReplayHost>,
        mpsc::Sender<AppEvent>,
        mpsc::Receiver<AppEvent>,
    ) {
        let settings = ScrapeSettings {
            check_interval_ms: 5,
            stable_threshold_ms: 25,
            ..ScrapeSettings::default()
        };
        let (tx, rx) = mpsc::channel();
        let finalize = FinalizeOptions::from_settings(
            &settings,
            ExportOptions {
                output_dir: out.path().to_path_buf(),
                export_short_links: true,
            },
        );
        let harvester = Harvester::new(
            AppState::with_settings(settings),
            "https://x.com/alice/with_replies".to_string(),
            FrameReplayHost::from_frames(frames).unwrap(),
            Box::new(ArticleExtractor),
            EffectRunner::new(tx.clone(), finalize, None),
        );
        (harvester, tx, rx)
    }

    #[test]
    fn run_completes_on_its_own_and_exports() {
        let out = TempDir::new().unwrap();
        let frames = vec![
            String::new(),
            format!("<main>{}</main>", tweet(1)),
            format!("<main>{}{}</main>", tweet(1), tweet(2)),
        ];
        let (harvester, tx, rx) = harvester(&out, frames);
        tx.send(AppEvent::Command(ConsoleCommand::Start)).unwrap();
        tx.send(AppEvent::ConsoleClosed).unwrap();

        let effects = harvester.run(rx);

        assert_eq!(effects.exports().len(), 1);
        assert_eq!(
            fs::read_to_string(out.path().join("alice_replies.txt")).unwrap(),
            "reply 1\n\nreply 2"
        );
    }

    #[test]
    fn immediate_stop_exports_nothing() {
        let out = TempDir::new().unwrap();
        let (harvester, tx, rx) = harvester(&out, vec![tweet(1)]);
        tx.send(AppEvent::Command(ConsoleCommand::Start)).unwrap();
        tx.send(AppEvent::Command(ConsoleCommand::Stop)).unwrap();
        tx.send(AppEvent::ConsoleClosed).unwrap();

        let effects = harvester.run(rx);

        assert!(effects.exports().is_empty());
        assert!(!out.path().join("alice_replies.txt").exists());
    }

    #[test]
    fn closed_console_still_handles_queued_start() {
        let out = TempDir::new().unwrap();
        let frames = vec![String::new(), format!("<main>{}</main>", tweet(1))];
        let (harvester, tx, rx) = harvester(&out, frames);
        tx.send(AppEvent::ConsoleClosed).unwrap();
        tx.send(AppEvent::Command(ConsoleCommand::Start)).unwrap();

        let effects = harvester.run(rx);

        assert_eq!(effects.exports().len(), 1);
        assert_eq!(
            fs::read_to_string(out.path().join("alice_replies.txt")).unwrap(),
            "reply 1"
        );
    }

    #[test]
    fn stop_mid_run_exports_what_was_collected() {
        let out = TempDir::new().unwrap();
        let frames = vec![
            String::new(),
            format!("<main>{}</main>", tweet(1)),
            format!("<main>{}{}</main>", tweet(1), tweet(2)),
            format!("<main>{}{}{}</main>", tweet(1), tweet(2), tweet(3)),
        ];
        let (harvester, tx, rx) = harvester(&out, frames);
        // Timer pulses land behind these, so exactly two samples precede the stop.
        tx.send(AppEvent::Command(ConsoleCommand::Start)).unwrap();
        tx.send(AppEvent::Pulse { run_id: 1 }).unwrap();
        tx.send(AppEvent::Pulse { run_id: 1 }).unwrap();
        tx.send(AppEvent::Command(ConsoleCommand::Stop)).unwrap();
        tx.send(AppEvent::ConsoleClosed).unwrap();

        let effects = harvester.run(rx);

        assert_eq!(effects.exports().len(), 1);
        assert_eq!(effects.exports()[0].reply_count, 2);
        assert_eq!(
            fs::read_to_string(out.path().join("alice_replies.txt")).unwrap(),
            "reply 1\n\nreply 2"
        );
    }

    #[test]
    fn quit_ends_the_loop_while_running() {
        let out = TempDir::new().unwrap();
        let (harvester, tx, rx) = harvester(&out, vec![tweet(1)]);
        tx.send(AppEvent::Command(ConsoleCommand::Start)).unwrap();
        tx.send(AppEvent::Command(ConsoleCommand::Quit)).unwrap();

        let effects = harvester.run(rx);
        assert!(!effects.is_busy());
        assert!(effects.exports().is_empty());
    }
}
