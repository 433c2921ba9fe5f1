//! Errors surfaced by document I/O.

use thiserror::Error;

/// Everything that can go wrong loading or saving a document.
#[derive(Debug, Error)]
pub enum Error {
    /// The underlying filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A save was requested on a document that has never been given a path.
    #[error("document has no filename")]
    NoFilename,
}
