use std::io;
use std::path::PathBuf;

use crate::persist::PersistError;

pub type JobId = u64;

/// One short link and what it resolved to, already rendered as an output line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    pub url: String,
    pub outcome: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveSummary {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub resolved: usize,
}

#[derive(Debug)]
pub enum ResolveEvent {
    Progress { job_id: JobId, link: ResolvedLink },
    Completed {
        job_id: JobId,
        result: Result<ResolveSummary, ResolveError>,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("failed to build http client: {0}")]
    Client(String),
    #[error("failed to start resolver runtime: {0}")]
    Runtime(#[source] io::Error),
    #[error("timeout")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("failed to read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Persist(#[from] PersistError),
}
