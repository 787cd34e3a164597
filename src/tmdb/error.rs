use thiserror::Error;

/// Every way a gateway call can fail. `Display` is the text shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Failed to fetch data. Invalid API key. Please check your TMDB API key.")]
    InvalidCredential,
    #[error("Failed to fetch data. Resource not found.")]
    NotFound,
    #[error("Failed to fetch data. Too many requests. Please wait a moment.")]
    RateLimited,
    #[error("Failed to fetch data. Error {status}: {message}")]
    Http { status: u16, message: String },
    #[error("Failed to fetch data. Please try again. ({0})")]
    Network(String),
    #[error("Failed to fetch data. Unexpected response: {0}")]
    Decode(String),
    #[error("Failed to fetch data. Task error: {0}")]
    Task(String),
}

impl ApiError {
    /// Map an HTTP failure status to its error. `message` is the server's
    /// `status_message` when the error body had one, else the status text.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => ApiError::InvalidCredential,
            404 => ApiError::NotFound,
            429 => ApiError::RateLimited,
            _ => ApiError::Http { status, message },
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(ApiError::from_status(401, String::new()), ApiError::InvalidCredential);
        assert_eq!(ApiError::from_status(404, String::new()), ApiError::NotFound);
        assert_eq!(ApiError::from_status(429, String::new()), ApiError::RateLimited);
        assert_eq!(
            ApiError::from_status(500, "Internal error".to_string()),
            ApiError::Http { status: 500, message: "Internal error".to_string() }
        );
    }

    #[test]
    fn test_user_facing_messages() {
        assert!(ApiError::RateLimited.to_string().contains("wait a moment"));
        assert!(ApiError::InvalidCredential.to_string().contains("Invalid API key"));
        assert!(ApiError::NotFound.to_string().contains("not found"));
        assert_eq!(
            ApiError::Http { status: 503, message: "Service Unavailable".to_string() }.to_string(),
            "Failed to fetch data. Error 503: Service Unavailable"
        );
    }
}
