//! Error types for the upload flows.
//!
//! # Design
//! The screen shows a single "Request errored!" outcome for every fault,
//! but the variants stay distinct so the developer log says what actually
//! went wrong. An echo that simply lacks the file field is not an error; it
//! is the `NotSent` verdict.

use std::path::PathBuf;

use thiserror::Error;

/// Faults raised while building, sending or parsing an upload.
#[derive(Debug, Error)]
pub enum UploadError {
    /// A send was requested with no image selected.
    #[error("no image selected")]
    NoImage,

    /// The selected image could not be read from disk.
    #[error("failed to read image {path:?}: {source}")]
    ReadImage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The host could not complete the HTTP round-trip.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The endpoint answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The response body was not valid JSON.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The echo was JSON but not shaped like an echoed request, e.g.
    /// `postData` without `params`.
    #[error("malformed echo: {0}")]
    MalformedEcho(String),

    /// The pinning configuration asks for something the transport cannot do.
    #[error("unsupported pinning configuration: {0}")]
    UnsupportedPinning(String),
}

/// Faults raised by an image picker. Cancellation is not a fault.
#[derive(Debug, Error)]
pub enum PickerError {
    #[error("picker unavailable: {0}")]
    Unavailable(String),

    #[error("failed to load image {path:?}: {message}")]
    Load { path: PathBuf, message: String },

    #[error("failed to write cropped image: {0}")]
    Write(String),
}
