use thiserror::Error;

/// Failures talking to the expense API.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Network(String),

    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Status(u16),

    #[error("failed to parse response: {0}")]
    Decode(String),

    #[error("failed to serialize request: {0}")]
    Encode(String),
}

impl ApiError {
    /// Text suitable for a toast: the server's own message when it sent one.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Server { message, .. } => message.clone(),
            ApiError::Network(_) => "Could not reach the server".to_string(),
            ApiError::Status(status) => format!("Request failed with status {}", status),
            ApiError::Decode(_) => "Unexpected response from the server".to_string(),
            ApiError::Encode(_) => "Could not prepare the request".to_string(),
        }
    }
}

/// Client-side form validation failures. Checked before any request is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Description is required")]
    MissingDescription,

    #[error("Valid amount is required")]
    InvalidAmount,

    #[error("Category is required")]
    MissingCategory,
}
