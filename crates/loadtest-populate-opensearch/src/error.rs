//! Error types for the OpenSearch populator.

use thiserror::Error;

/// Errors from a single request to the store.
///
/// The populate loop logs these and moves on to the next batch.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Connection, TLS or timeout failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-2xx status.
    #[error("Request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the JSON we expected.
    #[error("Malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    /// A required response field was absent.
    #[error("Response is missing '{0}'")]
    MissingField(&'static str),

    /// Reading TLS material failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors loading documents from a CSV or JSON file.
#[derive(Error, Debug)]
pub enum SourceError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A JSON entry was not an object.
    #[error("Entry {0} is not a JSON object")]
    NotAnObject(usize),
}

/// Errors that abort a populate run.
#[derive(Error, Debug)]
pub enum PopulatorError {
    /// Writing the output file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A document could not be serialized.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Document source error.
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}
