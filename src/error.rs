use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid JSON format: expected a list at the root")]
    NotAList,

    #[error("no blocks found in input")]
    Empty,

    #[error("block at position {position}: {reason}")]
    InvalidBlock { position: usize, reason: String },

    #[error("cannot write {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ConvertError {
    /// Input that is well-formed JSON but not a project. The caller should
    /// report it and produce nothing, without treating it as a failure.
    pub fn is_rejection(&self) -> bool {
        matches!(self, ConvertError::NotAList | ConvertError::Empty)
    }
}
