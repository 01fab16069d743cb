mod app;
mod console;
mod effects;
pub mod logging;
mod settings;
mod timer;

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use replies_core::{is_replies_timeline, AppState, RunId};
use replies_engine::{
    find_link_files, ArticleExtractor, ExportOptions, FinalizeOptions, FrameReplayHost,
    ResolveEvent, ResolveHandle, ResolveSettings,
};
use scrape_logging::{scrape_error, scrape_info};

use app::Harvester;
use console::{spawn_console, ConsoleCommand, HELP};
use effects::EffectRunner;

/// Everything the collection loop reacts to, funnelled through one channel.
#[derive(Debug)]
pub enum AppEvent {
    /// The poll timer of `run_id` fired.
    Pulse { run_id: RunId },
    Command(ConsoleCommand),
    ConsoleClosed,
}

pub struct HarvestOptions {
    pub location: String,
    pub frames: PathBuf,
    pub output: PathBuf,
    pub settings: Option<PathBuf>,
    pub auto_start: bool,
    pub resolve_short_links: bool,
}

/// Synchronous user-facing message.
pub(crate) fn notify(message: &str) {
    println!("{message}");
}

pub fn run_harvest(options: HarvestOptions) -> Result<()> {
    if !is_replies_timeline(&options.location) {
        notify(&format!(
            "{} is not a replies timeline; nothing to do.",
            options.location
        ));
        return Ok(());
    }

    let settings = settings::load_settings(options.settings.as_deref())?;
    let host = FrameReplayHost::load_dir(&options.frames)
        .with_context(|| format!("failed to load frames from {:?}", options.frames))?;
    let resolver = if options.resolve_short_links {
        Some(ResolveHandle::new(ResolveSettings::default())?)
    } else {
        None
    };

    let (tx, rx) = mpsc::channel();
    let finalize = FinalizeOptions::from_settings(
        &settings,
        ExportOptions {
            output_dir: options.output,
            export_short_links: settings.export_short_links,
        },
    );
    let effects = EffectRunner::new(tx.clone(), finalize, resolver);
    let harvester = Harvester::new(
        AppState::with_settings(settings),
        options.location,
        host,
        Box::new(ArticleExtractor),
        effects,
    );

    notify(HELP);
    if options.auto_start {
        let _ = tx.send(AppEvent::Command(ConsoleCommand::Start));
    }
    spawn_console(tx);

    let effects = harvester.run(rx);
    scrape_info!("Session ended after {} export(s)", effects.exports().len());
    Ok(())
}

/// Expands every `*tco_links.txt` in `dir` into a `*converted_links.txt`.
pub fn run_resolve_links(dir: &Path, concurrency: usize, timeout_secs: u64) -> Result<()> {
    let files = find_link_files(dir)?;
    if files.is_empty() {
        notify("No files ending with 'tco_links.txt' found.");
        return Ok(());
    }

    let mut handle = ResolveHandle::new(ResolveSettings {
        request_timeout: Duration::from_secs(timeout_secs),
        concurrency,
    })?;
    for file in &files {
        notify(&format!("\nProcessing file: {}", file.display()));
        handle.resolve_file(file);
    }

    let mut remaining = files.len();
    while remaining > 0 {
        let Some(event) = handle.recv_timeout(Duration::from_millis(250)) else {
            continue;
        };
        match event {
            ResolveEvent::Progress { link, .. } => {
                notify(&format!("Processed URL: {} -> {}", link.url, link.outcome));
            }
            ResolveEvent::Completed { result, .. } => {
                remaining -= 1;
                match result {
                    Ok(summary) => {
                        scrape_info!("{} links resolved", summary.resolved);
                        notify(&format!(
                            "Results saved to {}",
                            summary.output_path.display()
                        ));
                    }
                    Err(err) => scrape_error!("Failed to resolve links: {}", err),
                }
            }
        }
    }
    Ok(())
}
