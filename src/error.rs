// src/error.rs
//! Error taxonomy for client operations

/// Fallback shown when a failed response carries no body
pub const GENERIC_FAILURE: &str = "Request failed";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A local precondition failed; nothing was sent
    #[error("{0}")]
    Validation(String),

    /// Non-2xx response; holds the body text as-is
    #[error("{0}")]
    Request(String),

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response from job service: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No analyzed job with id {0}")]
    UnknownJob(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Build a request failure from a response body
    pub fn from_body(body: &str) -> Self {
        if body.trim().is_empty() {
            ClientError::Request(GENERIC_FAILURE.to_string())
        } else {
            ClientError::Request(body.to_string())
        }
    }

    /// Text surfaced to the user in the status banner
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_falls_back_to_generic_message() {
        assert_eq!(ClientError::from_body("").user_message(), GENERIC_FAILURE);
        assert_eq!(ClientError::from_body("  \n").user_message(), GENERIC_FAILURE);
    }

    #[test]
    fn test_body_text_is_surfaced_verbatim() {
        let err = ClientError::from_body("{\"detail\":\"No URLs provided\"}");
        assert_eq!(err.user_message(), "{\"detail\":\"No URLs provided\"}");
        assert!(!err.is_validation());
    }
}
