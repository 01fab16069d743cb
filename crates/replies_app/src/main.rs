use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod platform;

/// Collects a profile's own replies from its "with_replies" timeline.
#[derive(Parser)]
#[command(name = "replies_app", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug output, including every poll tick
    #[arg(long, global = true)]
    verbose: bool,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scroll a captured timeline, collect the owner's replies and export them
    Harvest {
        /// Page location, e.g. https://x.com/alice/with_replies
        #[arg(long)]
        location: String,

        /// Directory of captured .html frames, one per viewport height
        #[arg(long)]
        frames: PathBuf,

        /// Where exported files are written
        #[arg(long, default_value = ".")]
        output: PathBuf,

        /// RON file overriding the default collection settings
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Start collecting immediately instead of waiting for `start`
        #[arg(long)]
        auto_start: bool,

        /// Expand exported short links once the run is exported
        #[arg(long)]
        resolve_short_links: bool,
    },

    /// Expand every *tco_links.txt file in a directory
    ResolveLinks {
        /// Directory to scan
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Requests in flight at once
        #[arg(long, default_value = "10")]
        concurrency: usize,

        /// Per-request timeout in seconds
        #[arg(long, default_value = "10")]
        timeout_secs: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    platform::logging::initialize(cli.verbose, cli.log_file.as_deref());

    match cli.command {
        Commands::Harvest {
            location,
            frames,
            output,
            settings,
            auto_start,
            resolve_short_links,
        } => platform::run_harvest(platform::HarvestOptions {
            location,
            frames,
            output,
            settings,
            auto_start,
            resolve_short_links,
        }),
        Commands::ResolveLinks {
            dir,
            concurrency,
            timeout_secs,
        } => platform::run_resolve_links(&dir, concurrency, timeout_secs),
    }
}
