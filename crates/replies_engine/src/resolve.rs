use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::{stream, StreamExt};
use reqwest::header::LOCATION;
use scrape_logging::{scrape_debug, scrape_info};

use crate::persist::AtomicFileWriter;
use crate::{ResolveError, ResolveSummary, ResolvedLink};

const LINK_FILE_SUFFIX: &str = "tco_links.txt";

#[derive(Debug, Clone)]
pub struct ResolveSettings {
    pub request_timeout: Duration,
    /// Requests in flight at once.
    pub concurrency: usize,
}

impl Default for ResolveSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            concurrency: 10,
        }
    }
}

#[async_trait::async_trait]
pub trait ShortLinkResolver: Send + Sync {
    /// Where `url` redirects to, or `None` when the response names no target.
    async fn resolve(&self, url: &str) -> Result<Option<String>, ResolveError>;
}

/// Issues one request per link without following redirects and reads the
/// `Location` header of the response.
#[derive(Debug, Clone)]
pub struct ReqwestResolver {
    client: reqwest::Client,
}

impl ReqwestResolver {
    pub fn new(settings: &ResolveSettings) -> Result<Self, ResolveError> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|err| ResolveError::Client(err.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl ShortLinkResolver for ReqwestResolver {
    async fn resolve(&self, url: &str) -> Result<Option<String>, ResolveError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        Ok(response
            .headers()
            .get_all(LOCATION)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(|value| value.trim().to_string())
            .last())
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ResolveError {
    if err.is_timeout() {
        return ResolveError::Timeout;
    }
    ResolveError::Network(err.to_string())
}

/// Output line for one link: the target, or a note saying why there is none.
pub fn describe_resolution(url: &str, result: Result<Option<String>, ResolveError>) -> String {
    match result {
        Ok(Some(location)) => location,
        Ok(None) => format!("No Location header found for {url}"),
        Err(err) => format!("Error processing {url}: {err}"),
    }
}

/// Resolves `urls` with at most `concurrency` requests in flight. Results come
/// back in completion order, one per input.
pub async fn resolve_all(
    resolver: &dyn ShortLinkResolver,
    urls: Vec<String>,
    concurrency: usize,
    mut on_done: impl FnMut(&ResolvedLink),
) -> Vec<ResolvedLink> {
    let mut pending = stream::iter(urls)
        .map(|url| async move {
            let result = resolver.resolve(&url).await;
            let outcome = describe_resolution(&url, result);
            ResolvedLink { url, outcome }
        })
        .buffer_unordered(concurrency.max(1));

    let mut resolved = Vec::new();
    while let Some(link) = pending.next().await {
        scrape_debug!("Processed URL: {} -> {}", link.url, link.outcome);
        on_done(&link);
        resolved.push(link);
    }
    resolved
}

/// `alice_tco_links.txt` becomes `alice_converted_links.txt` next to it.
pub fn converted_filename(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().replace("tco_links", "converted_links"))
        .unwrap_or_else(|| "converted_links.txt".to_string());
    input.with_file_name(name)
}

/// Link files in `dir` (names ending in `tco_links.txt`), sorted.
pub fn find_link_files(dir: &Path) -> Result<Vec<PathBuf>, ResolveError> {
    let read_err = |source| ResolveError::Read {
        path: dir.to_path_buf(),
        source,
    };
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(read_err)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(LINK_FILE_SUFFIX))
        .map(|entry| entry.path())
        .collect();
    files.sort();
    Ok(files)
}

/// Resolves every non-empty line of `input` and writes the outcomes, one per
/// line, to [`converted_filename`].
pub async fn resolve_links_file(
    resolver: &dyn ShortLinkResolver,
    input: &Path,
    concurrency: usize,
    on_done: impl FnMut(&ResolvedLink),
) -> Result<ResolveSummary, ResolveError> {
    let content = fs::read_to_string(input).map_err(|source| ResolveError::Read {
        path: input.to_path_buf(),
        source,
    })?;
    let urls: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
        .collect();

    let resolved = resolve_all(resolver, urls, concurrency, on_done).await;

    let output_path = converted_filename(input);
    let mut body = String::new();
    for link in &resolved {
        body.push_str(&link.outcome);
        body.push('\n');
    }
    let dir = output_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let file_name = output_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "converted_links.txt".to_string());
    let written = AtomicFileWriter::new(dir).write(&file_name, &body)?;
    scrape_info!("Results saved to {:?}", written);

    Ok(ResolveSummary {
        input_path: input.to_path_buf(),
        output_path: written,
        resolved: resolved.len(),
    })
}
