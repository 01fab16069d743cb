use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use scrape_logging::{scrape_info, scrape_trace};

use crate::decode::{decode_frame, DecodeError};

/// The page being harvested: something that can be scrolled and that renders
/// more content some time after it is scrolled.
pub trait RenderHost {
    /// Advances the viewport by `fraction` of its visible height.
    fn scroll_by(&mut self, fraction: f64);
    /// The document as currently rendered.
    fn document_html(&self) -> &str;
}

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("failed to read frames from {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("frame {path:?}: {source}")]
    Decode { path: PathBuf, source: DecodeError },
    #[error("no .html frames found")]
    Empty,
}

/// Replays a captured timeline.
///
/// Frame `k` is the document as it looked after `k` viewport-heights of
/// scrolling. Scrolling past the last frame keeps showing it, which is what
/// lets the stability heuristic end a replayed run.
#[derive(Debug, Clone)]
pub struct FrameReplayHost {
    frames: Vec<String>,
    offset: f64,
}

impl FrameReplayHost {
    pub fn from_frames(frames: Vec<String>) -> Result<Self, FrameError> {
        if frames.is_empty() {
            return Err(FrameError::Empty);
        }
        Ok(Self {
            frames,
            offset: 0.0,
        })
    }

    /// Loads every `*.html` / `*.htm` file in `dir`, ordered by file name.
    pub fn load_dir(dir: &Path) -> Result<Self, FrameError> {
        let io_err = |source: io::Error| FrameError::Io {
            path: dir.to_path_buf(),
            source,
        };
        let mut paths: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(io_err)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
                    .unwrap_or(false)
            })
            .collect();
        paths.sort();

        let mut frames = Vec::with_capacity(paths.len());
        for path in paths {
            let bytes = fs::read(&path).map_err(|source| FrameError::Io {
                path: path.clone(),
                source,
            })?;
            let html = decode_frame(&bytes).map_err(|source| FrameError::Decode {
                path: path.clone(),
                source,
            })?;
            frames.push(html);
        }
        scrape_info!("Loaded {} frames from {:?}", frames.len(), dir);
        Self::from_frames(frames)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frame_index(&self) -> usize {
        (self.offset.floor() as usize).min(self.frames.len() - 1)
    }
}

impl RenderHost for FrameReplayHost {
    fn scroll_by(&mut self, fraction: f64) {
        if fraction.is_finite() && fraction > 0.0 {
            self.offset += fraction;
        }
        scrape_trace!("Viewport offset {:.2} -> frame {}", self.offset, self.frame_index());
    }

    fn document_html(&self) -> &str {
        &self.frames[self.frame_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::{FrameError, FrameReplayHost, RenderHost};

    #[test]
    fn half_scrolls_advance_every_second_tick() {
        let mut host =
            FrameReplayHost::from_frames(vec!["a".into(), "b".into(), "c".into()]).unwrap();
        assert_eq!(host.document_html(), "a");
        host.scroll_by(0.5);
        assert_eq!(host.document_html(), "a");
        host.scroll_by(0.5);
        assert_eq!(host.document_html(), "b");
        for _ in 0..10 {
            host.scroll_by(1.0);
        }
        assert_eq!(host.document_html(), "c");
    }

    #[test]
    fn empty_frames_are_rejected() {
        assert!(matches!(
            FrameReplayHost::from_frames(Vec::new()),
            Err(FrameError::Empty)
        ));
    }
}
