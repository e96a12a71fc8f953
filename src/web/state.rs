use crate::agent::Summarizer;
use std::path::PathBuf;

/// Shared, read-only state handed to every handler.
pub struct AppState {
    pub summarizer: Summarizer,
    /// Directory backing `/static/`
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(summarizer: Summarizer) -> Self {
        let static_dir = summarizer.config().server.static_dir.clone();
        Self {
            summarizer,
            static_dir,
        }
    }
}
