//! Error types for portfolio operations
//!
//! Every variant's `Display` text is a sentence the assistant can say out
//! loud. The public operations on [`crate::PortfolioAssistant`] turn errors
//! into those sentences instead of propagating them.

use thiserror::Error;

/// Portfolio specific errors
#[derive(Debug, Error)]
pub enum PortfolioError {
    /// No company, article or record matched
    #[error("{0}")]
    NotFound(String),

    /// Ranking or aggregation field outside the field registry
    #[error("The field '{field}' is not supported. Please choose one of: {supported}.")]
    UnsupportedField { field: String, supported: String },

    /// Backing file missing or malformed
    #[error("Error loading {dataset} data: {reason}")]
    DataUnavailable { dataset: String, reason: String },

    /// Comparison phrase did not have the "compare A and B" shape
    #[error("I'm sorry, I couldn't extract two companies to compare from your query.")]
    MalformedCompareQuery,

    /// Tool parameters that parse but cannot be used
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl PortfolioError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn data_unavailable(dataset: impl Into<String>, reason: impl ToString) -> Self {
        Self::DataUnavailable {
            dataset: dataset.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for portfolio operations
pub type Result<T> = std::result::Result<T, PortfolioError>;

/// Convert PortfolioError to agent_core::Error
impl From<PortfolioError> for agent_core::Error {
    fn from(err: PortfolioError) -> Self {
        match err {
            PortfolioError::InvalidParameters(msg) => agent_core::Error::InvalidParameters(msg),
            PortfolioError::ConfigError(msg) => agent_core::Error::InitializationFailed(msg),
            other => agent_core::Error::ProcessingFailed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PortfolioError::UnsupportedField {
            field: "nonexistent_field".to_string(),
            supported: "valuation, excitement".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "The field 'nonexistent_field' is not supported. Please choose one of: valuation, excitement."
        );

        let err = PortfolioError::data_unavailable("news", "No such file or directory");
        assert_eq!(err.to_string(), "Error loading news data: No such file or directory");

        let err = PortfolioError::not_found("No news found for Acme.");
        assert_eq!(err.to_string(), "No news found for Acme.");
    }

    #[test]
    fn test_error_conversion() {
        let agent_err: agent_core::Error =
            PortfolioError::InvalidParameters("limit must be a number".to_string()).into();
        assert!(matches!(agent_err, agent_core::Error::InvalidParameters(_)));

        let agent_err: agent_core::Error = PortfolioError::MalformedCompareQuery.into();
        match agent_err {
            agent_core::Error::ProcessingFailed(msg) => assert!(msg.contains("compare")),
            _ => panic!("Expected ProcessingFailed variant"),
        }
    }
}
