use std::path::PathBuf;

use thiserror::Error;

use crate::block::SpanKind;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong while compiling markdown or generating pages.
#[derive(Debug, Error)]
pub enum Error {
    /// A render node was built in violation of its invariants.
    #[error("{0}")]
    Construction(String),

    #[error("Unmatched delimiter '{delimiter}' in text: {text}")]
    UnmatchedDelimiter { delimiter: String, text: String },

    #[error("Unknown text type: {0}")]
    UnknownSpanKind(String),

    #[error("{0} spans require a URL")]
    MissingUrl(SpanKind),

    #[error("No h1 header found in the markdown file.")]
    MissingTitle,

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Error::Io { path, source }
    }
}
