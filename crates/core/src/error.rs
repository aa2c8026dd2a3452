//! Error types for the presentation generation pipeline.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can abort a pipeline run.
///
/// Recoverable issues (clipped bullets, unresolved audio, unmatched images)
/// never appear here; they are carried as warning strings on the run instead.
#[derive(Error, Debug)]
pub enum Error {
    /// The specification violates one or more invariants.
    /// Every violation is listed, not just the first.
    #[error("Invalid specification: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// No usable input was supplied (no description, images, or audio).
    #[error("No usable input: {0}")]
    Input(String),

    /// A corpus was present but could not be processed into the required
    /// slide structure.
    #[error("Content processing error: {0}")]
    Content(String),

    /// Inputs were supplied but normalized to an empty corpus
    /// (e.g. every audio file unresolved and no description text).
    #[error("Insufficient content: {0}")]
    InsufficientContent(String),

    /// The requested language code is not registered in the catalog.
    #[error("Unknown language code: {0}")]
    UnknownLanguage(String),

    /// A structural violation reached a renderer.
    #[error("Render error on slide {slide}: {reason}")]
    Render { slide: usize, reason: String },

    /// Failed to read or write an artifact.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP packaging error (PPTX output).
    #[error("ZIP error: {0}")]
    Zip(String),

    /// XML writing error (PPTX output).
    #[error("XML error: {0}")]
    Xml(String),
}

impl Error {
    /// Build a render error for the given slide index.
    pub fn render(slide: usize, reason: impl Into<String>) -> Self {
        Self::Render {
            slide,
            reason: reason.into(),
        }
    }
}
