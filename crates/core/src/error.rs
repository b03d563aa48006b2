use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenameError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("path does not exist: {}", .0.display())]
    NotFound(PathBuf),
    #[error("rename failed: {} -> {}: {reason}", from.display(), to.display())]
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        reason: String,
    },
}
