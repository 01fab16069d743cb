use replies_core::{PostSnapshot, RunError, ScrapeSettings};
use scrape_logging::scrape_warn;

use crate::export::{export_replies, ExportError, ExportOptions, ExportSummary};
use crate::format::{FormatOptions, ReplyFormatter};

#[derive(Debug, Clone, Default)]
pub struct FinalizeOptions {
    pub format: FormatOptions,
    pub export: ExportOptions,
}

impl FinalizeOptions {
    pub fn from_settings(settings: &ScrapeSettings, export: ExportOptions) -> Self {
        Self {
            format: FormatOptions::from(settings),
            export: ExportOptions {
                export_short_links: settings.export_short_links,
                ..export
            },
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FinalizeError {
    #[error(transparent)]
    Run(#[from] RunError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Formats a finished run and writes its artifacts.
///
/// Fails with [`RunError::EmptyResult`] and writes nothing when no snapshot
/// survives formatting; that covers both "no matching posts" and "page
/// structure did not match".
pub fn finalize_run(
    target: &str,
    snapshots: &[PostSnapshot],
    options: &FinalizeOptions,
) -> Result<ExportSummary, FinalizeError> {
    let output = ReplyFormatter::new(options.format).format(target, snapshots);
    if output.is_empty() {
        scrape_warn!(
            "No replies survived formatting ({} snapshots collected)",
            snapshots.len()
        );
        return Err(RunError::EmptyResult.into());
    }
    Ok(export_replies(target, &output, &options.export)?)
}
