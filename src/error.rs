// Error taxonomy for artifact loading and clustering preconditions.
//
// Three failure classes cover everything that can go wrong outside pure
// computation: a referenced artifact path is missing or unreadable, an
// artifact loads but has the wrong shape, or clustering is requested
// before a fitted complex exists. Numeric edge cases (zero std, zero
// mean) are NOT errors — they produce sentinel values downstream.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The referenced artifact path does not exist or could not be read.
    #[error("could not access the {} artifact at {}: {}", .artifact, .path.display(), .source)]
    FileAccess {
        artifact: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The artifact loaded but is missing expected keys or has the wrong
    /// shape. The detail preserves the parser's diagnostic so the user can
    /// tell which reference points at the wrong file.
    #[error(
        "there was an error reading your {artifact} data: {detail}. \
         Make sure your {artifact} reference points at the correct artifact"
    )]
    Format {
        artifact: &'static str,
        detail: String,
    },

    /// An operation was requested before its inputs exist (e.g. clustering
    /// without a fitted complex).
    #[error("{0}")]
    Precondition(String),
}

impl Error {
    pub(crate) fn format(artifact: &'static str, detail: impl Into<String>) -> Self {
        Error::Format {
            artifact,
            detail: detail.into(),
        }
    }
}
