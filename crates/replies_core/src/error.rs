use thiserror::Error;

/// User-facing failures of a collection run. Each one ends the current
/// operation only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    #[error("Could not determine username from the URL: {location}")]
    IdentityResolution { location: String },
    #[error("No scraping process is currently running.")]
    NoActiveRun,
    #[error("No replies found. They might not have loaded correctly.")]
    EmptyResult,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("scroll_factor must be a positive number, got {0}")]
    ScrollFactor(f64),
    #[error("check_interval_ms must be greater than zero")]
    ZeroInterval,
}
