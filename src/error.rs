use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop a manifest run.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("cannot find folder: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("no image files found under {} (check extensions and path)", .0.display())]
    NoImagesFound(PathBuf),

    #[error("no folder groups under {} (check the stimuli directory layout)", .0.display())]
    NoFolderGroups(PathBuf),

    #[error("per-folder sample size must be at least 1")]
    InvalidSampleSize,

    #[error("failed to walk {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize manifest: {0}")]
    Json(#[from] serde_json::Error),
}

impl ManifestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ManifestError>;
