/// Errors from talking to the fleet backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request could not be sent or the response could not be read.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// The `message` property of the error body.
        message: String,
    },

    /// A response body was not the expected JSON.
    #[error("{0}")]
    Decode(#[from] serde_json::Error),
}
