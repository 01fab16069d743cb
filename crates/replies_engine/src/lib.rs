//! Replies engine: document extraction, formatting, export and short-link
//! resolution around the pure collection loop.
mod decode;
mod engine;
mod export;
mod extract;
mod finalize;
mod format;
mod host;
mod persist;
mod resolve;
mod text;
mod types;

pub use decode::{decode_frame, DecodeError};
pub use engine::ResolveHandle;
pub use export::{
    export_replies, replies_filename, short_links_filename, ExportError, ExportOptions,
    ExportSummary,
};
pub use extract::{ArticleExtractor, PostExtractor};
pub use finalize::{finalize_run, FinalizeError, FinalizeOptions};
pub use format::{
    is_short_link, FormatOptions, FormattedOutput, FormattedReply, ReplyFormatter, ShortLinkSet,
    SHORT_LINK_HOST,
};
pub use host::{FrameError, FrameReplayHost, RenderHost};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use resolve::{
    converted_filename, describe_resolution, find_link_files, resolve_all, resolve_links_file,
    ReqwestResolver, ResolveSettings, ShortLinkResolver,
};
pub use types::{JobId, ResolveError, ResolveEvent, ResolveSummary, ResolvedLink};
