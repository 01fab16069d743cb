#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User asked to start collecting on the page at `location`.
    StartClicked { location: String },
    /// User asked to stop and export what has been collected.
    StopClicked,
    /// One timer tick: the viewport was advanced and these posts were
    /// rendered afterwards.
    Tick {
        run_id: crate::RunId,
        posts: Vec<crate::RenderedPost>,
    },
}
