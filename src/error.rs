//! Error types for pdfoutline library.

use std::io;
use thiserror::Error;

/// Result type alias for pdfoutline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reading fragment feeds and inferring outlines.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted and cannot be read.
    #[error("Document is encrypted")]
    Encrypted,

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// A fragment violates the feed contract (missing text, bad geometry, bad size).
    #[error("Malformed fragment #{index}: {reason}")]
    MalformedFragment {
        /// Position of the offending fragment in the feed
        index: usize,
        /// What is wrong with it
        reason: String,
    },

    /// Fragments are not delivered in reading order.
    #[error("Fragment feed is out of reading order: {0}")]
    UnorderedFeed(String),

    /// A serialized fragment feed could not be decoded.
    #[error("Feed decoding error: {0}")]
    FeedDecode(String),

    /// A configuration file could not be decoded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error during rendering (JSON, Markdown).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}
