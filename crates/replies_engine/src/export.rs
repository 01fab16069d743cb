use std::path::PathBuf;

use scrape_logging::scrape_info;

use crate::format::FormattedOutput;
use crate::persist::{AtomicFileWriter, PersistError};

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub output_dir: PathBuf,
    /// Write `<identity>_tco_links.txt` when short links were found.
    pub export_short_links: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            export_short_links: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub reply_count: usize,
    pub replies_path: PathBuf,
    pub short_links_path: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

pub fn replies_filename(identity: &str) -> String {
    format!("{}_replies.txt", sanitize_identity(identity))
}

pub fn short_links_filename(identity: &str) -> String {
    format!("{}_tco_links.txt", sanitize_identity(identity))
}

/// Writes the reply blocks separated by blank lines and, when enabled and
/// non-empty, the short links one per line. No retries on failure.
pub fn export_replies(
    identity: &str,
    output: &FormattedOutput,
    options: &ExportOptions,
) -> Result<ExportSummary, ExportError> {
    let writer = AtomicFileWriter::new(options.output_dir.clone());

    let replies_path = writer.write(&replies_filename(identity), &output.blocks().join("\n\n"))?;
    scrape_info!(
        "Exported {} replies to {:?}",
        output.replies.len(),
        replies_path
    );

    let short_links_path = if options.export_short_links && !output.short_links.is_empty() {
        let path = writer.write(
            &short_links_filename(identity),
            &output.short_links.to_lines(),
        )?;
        scrape_info!(
            "Exported {} short links to {:?}",
            output.short_links.len(),
            path
        );
        Some(path)
    } else {
        None
    };

    Ok(ExportSummary {
        reply_count: output.replies.len(),
        replies_path,
        short_links_path,
    })
}

/// Keeps the identity usable as a file name on every platform.
fn sanitize_identity(identity: &str) -> String {
    let cleaned: String = identity
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim_matches(&['_', ' ', '.'][..]);
    if cleaned.is_empty() {
        "unknown".to_string()
    } else {
        cleaned.to_string()
    }
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}
