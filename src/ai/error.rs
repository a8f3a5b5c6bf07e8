use thiserror::Error;

/// Failures talking to, or interpreting output from, the chat-completions API.
#[derive(Error, Debug)]
pub enum LlmError {
    /// Credential rejected (HTTP 401/403)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Rate limit exceeded (HTTP 429)
    #[error("Rate limit exceeded: {message}")]
    RateLimit { message: String },

    /// Any other non-success status
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Network or connection error, including timeouts
    #[error("Network error: {source}")]
    Network {
        #[from]
        source: reqwest::Error,
    },

    /// The model answered, but not in the shape we asked for
    #[error("Invalid model response: {message}")]
    InvalidResponse { message: String },
}

impl LlmError {
    pub fn invalid_response<S: Into<String>>(message: S) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    pub fn api_error(status: u16, message: String) -> Self {
        Self::Api { status, message }
    }
}
