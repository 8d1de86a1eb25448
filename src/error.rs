use thiserror::Error;

/// Errors surfaced by the stats client.
#[derive(Debug, Error)]
pub enum Error {
    /// Client misconfiguration, detected at construction time.
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid or conflicting call arguments, detected before any network call.
    #[error("argument error: {0}")]
    Argument(String),

    /// The API answered with a non-success status.
    #[error("API request failed with status {status}: {message}")]
    Request {
        status: reqwest::StatusCode,
        /// Last non-blank line of the response body.
        message: String,
    },

    /// Transport-level failure (connection, TLS, body decoding).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
