//! Storefront API-specific error types.

/// Errors that can occur during storefront API operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request exceeded the client-side deadline
    #[error("Request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    /// Transport-level failure before a response arrived
    #[error("Network request failed: {0}")]
    Network(#[source] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("Server rejected request (status {status}): {message}")]
    Rejected { status: u16, message: String },

    /// Delete refused because dependent records still reference the entity
    #[error("Entity is still referenced by dependent records")]
    Constraint,

    /// Response body did not match the expected shape
    #[error("Failed to deserialize API response: {0}")]
    Deserialization(#[from] serde_json::Error),
}

impl ApiError {
    /// Whether the failure is a referential-integrity delete rejection.
    ///
    pub fn is_constraint(&self) -> bool {
        matches!(self, ApiError::Constraint)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout(err)
        } else {
            ApiError::Network(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let error = ApiError::Rejected {
            status: 500,
            message: "Internal error".to_string(),
        };
        let error_str = error.to_string();
        assert!(error_str.contains("500"));
        assert!(error_str.contains("Internal error"));

        let error = ApiError::Constraint;
        assert!(error.to_string().contains("referenced"));
    }

    #[test]
    fn test_is_constraint() {
        assert!(ApiError::Constraint.is_constraint());
        assert!(!ApiError::Rejected {
            status: 404,
            message: "Not found".to_string(),
        }
        .is_constraint());
    }
}
