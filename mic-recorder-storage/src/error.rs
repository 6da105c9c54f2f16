use std::path::PathBuf;

use thiserror::Error;

use mic_recorder_core::RecorderError;

/// Why a medium could not be mounted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MountError {
    #[error("no card attached at {0}")]
    NoCard(PathBuf),

    #[error("mount point {0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("failed to format {path}: {reason}")]
    FormatFailed { path: PathBuf, reason: String },
}

impl From<MountError> for RecorderError {
    fn from(e: MountError) -> Self {
        RecorderError::BackendUnavailable(e.to_string())
    }
}
