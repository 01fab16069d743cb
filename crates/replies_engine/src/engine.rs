use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use crate::resolve::{resolve_links_file, ReqwestResolver, ResolveSettings};
use crate::{JobId, ResolveError, ResolveEvent, ShortLinkResolver};

enum ResolveCommand {
    ResolveFile { job_id: JobId, path: PathBuf },
}

/// Background short-link resolution: owns a tokio runtime on its own thread so
/// callers on the collection loop never block on the network.
pub struct ResolveHandle {
    cmd_tx: mpsc::Sender<ResolveCommand>,
    event_rx: mpsc::Receiver<ResolveEvent>,
    next_job: JobId,
}

impl ResolveHandle {
    pub fn new(settings: ResolveSettings) -> Result<Self, ResolveError> {
        let resolver: Arc<dyn ShortLinkResolver> = Arc::new(ReqwestResolver::new(&settings)?);
        Self::with_resolver(resolver, settings.concurrency)
    }

    pub fn with_resolver(
        resolver: Arc<dyn ShortLinkResolver>,
        concurrency: usize,
    ) -> Result<Self, ResolveError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new().map_err(ResolveError::Runtime)?;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let resolver = resolver.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(resolver.as_ref(), concurrency, command, event_tx).await;
                });
            }
        });

        Ok(Self {
            cmd_tx,
            event_rx,
            next_job: 0,
        })
    }

    /// Queues `path` for resolution and returns the job id its events carry.
    pub fn resolve_file(&mut self, path: impl Into<PathBuf>) -> JobId {
        self.next_job += 1;
        let job_id = self.next_job;
        let _ = self.cmd_tx.send(ResolveCommand::ResolveFile {
            job_id,
            path: path.into(),
        });
        job_id
    }

    pub fn try_recv(&self) -> Option<ResolveEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<ResolveEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    resolver: &dyn ShortLinkResolver,
    concurrency: usize,
    command: ResolveCommand,
    event_tx: mpsc::Sender<ResolveEvent>,
) {
    match command {
        ResolveCommand::ResolveFile { job_id, path } => {
            let result = resolve_links_file(resolver, &path, concurrency, |link| {
                let _ = event_tx.send(ResolveEvent::Progress {
                    job_id,
                    link: link.clone(),
                });
            })
            .await;
            let _ = event_tx.send(ResolveEvent::Completed { job_id, result });
        }
    }
}
