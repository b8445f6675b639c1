use thiserror::Error;

/// Errors that can occur while talking to the generation API or handling user input
#[derive(Error, Debug)]
pub enum HealthError {
    /// Network failure while calling the generation API
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The generation API answered with a non-success status or an error body
    #[error("Gemini API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The generation API answered, but not in the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// No API key in the environment or the secrets store
    #[error("Set GEMINI_API_KEY or GOOGLE_API_KEY in environment, or api_key in config.toml")]
    MissingApiKey,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Uploaded file is not an accepted image
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// Form input rejected before any request is made
    #[error("{0}")]
    InvalidInput(String),

    /// The web listener could not be bound or failed while serving
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_message_names_sources() {
        let message = HealthError::MissingApiKey.to_string();
        assert!(message.contains("GEMINI_API_KEY"));
        assert!(message.contains("GOOGLE_API_KEY"));
        assert_ne!(message, format!("{:?}", HealthError::MissingApiKey));
    }

    #[test]
    fn test_io_error_is_wrapped() {
        let err: HealthError =
            std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use").into();
        assert_eq!(err.to_string(), "Server error: address in use");
    }
}
