//! Error types for the bulletin export pipeline.

use std::io;
use thiserror::Error;

/// Result type alias for export operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can abort an export.
///
/// Recoverable conditions (a missing page node, an image that never
/// finished loading) are logged by the pipeline and never surface here.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed JSON in a document or service response.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The top-level preview container is absent from the view.
    #[error("Preview container not found: {0}")]
    ContainerNotFound(String),

    /// The requested section selection cannot be exported.
    #[error("Invalid section selection: {0}")]
    InvalidSelection(String),

    /// A capture backend failed to produce raster bytes.
    #[error("Capture failed: {0}")]
    Capture(String),

    /// The rendering service answered with a non-success status.
    ///
    /// Displays the service's `details` string verbatim.
    #[error("{details}")]
    RenderService {
        /// HTTP status code
        status: u16,
        /// Error detail reported by the service
        details: String,
    },

    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A captured image could not be decoded or encoded.
    #[error("Image error: {0}")]
    ImageDecode(String),

    /// ZIP archive assembly failed.
    #[error("ZIP error: {0}")]
    Zip(String),

    /// PDF assembly failed.
    #[error("PDF error: {0}")]
    Pdf(String),

    /// The content provider could not supply a document.
    #[error("Content error: {0}")]
    Content(String),

    /// The operation is not available on this surface or backend.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Every page was skipped, so there is nothing to package.
    #[error("No pages were captured")]
    NothingCaptured,

    /// The export was cancelled between steps.
    #[error("Export cancelled")]
    Cancelled,
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::Pdf(err.to_string()),
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::ImageDecode(err.to_string())
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            _ => Error::Zip(err.to_string()),
        }
    }
}
