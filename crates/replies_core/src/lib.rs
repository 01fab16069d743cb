//! Replies core: pure collection state machine and the types it moves around.
mod effect;
mod error;
mod location;
mod msg;
mod post;
mod settings;
mod state;
mod store;
mod update;
mod view_model;

pub use effect::{Effect, FinishReason, Notice};
pub use error::{RunError, SettingsError};
pub use location::{is_replies_timeline, resolve_target_identity};
pub use msg::Msg;
pub use post::{is_permalink, PostSnapshot, RenderedPost};
pub use settings::ScrapeSettings;
pub use state::{AppState, RunId, RunState, SessionState};
pub use store::CollectionStore;
pub use update::update;
pub use view_model::RunView;
