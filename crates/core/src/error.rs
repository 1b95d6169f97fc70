//! Error types for slide deck generation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading input, structuring, or rendering a deck.
///
/// Segmentation itself never fails; these cover the surfaces around it.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open, read, or write a file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The input document format is not supported or could not be detected.
    #[error("Unsupported or unrecognized document format: {0}")]
    UnsupportedFormat(String),

    /// An AI response could not be turned into an outline.
    #[error("Malformed AI response: {0}")]
    MalformedResponse(String),

    /// Failed to render the output presentation.
    #[error("Render error: {0}")]
    RenderError(String),

    /// ZIP archive error (for PPTX and DOCX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML reading or writing error.
    #[error("XML error: {0}")]
    XmlError(String),
}
