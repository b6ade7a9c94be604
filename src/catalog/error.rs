use super::PlatformKey;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseErrorKind {
    #[error("could not read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unexpected structure: {0}")]
    Structure(String),
    #[error("platform {0} is already loaded from another file")]
    DuplicatePlatform(PlatformKey),
}

/// A platform file that could not be loaded. Collected, never fatal.
#[derive(Debug, Error)]
#[error("Failed to load platform file {}: {kind}", path.display())]
pub struct ParseError {
    pub path: PathBuf,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(path: impl Into<PathBuf>, kind: impl Into<ParseErrorKind>) -> Self {
        Self {
            path: path.into(),
            kind: kind.into(),
        }
    }

    pub(crate) fn structure(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::new(path, ParseErrorKind::Structure(message.into()))
    }
}

#[derive(Debug, Error)]
pub enum WriteErrorKind {
    #[error("could not write file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not serialize platform: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("no such platform in the catalog")]
    UnknownPlatform,
    #[error("save task did not complete: {0}")]
    Queue(#[from] crate::task_queue::QueueError),
}

/// A platform that could not be persisted. Reported per platform, per save.
#[derive(Debug, Error)]
#[error("Failed to save platform {platform} to {}: {kind}", path.display())]
pub struct WriteError {
    pub platform: PlatformKey,
    pub path: PathBuf,
    pub kind: WriteErrorKind,
}

/// The only way loading a whole catalog can fail.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Platforms root {} is not readable: {source}", path.display())]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
