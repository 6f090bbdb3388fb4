use thiserror::Error;

use crate::analyzer::AnalyzerError;
use crate::store::StoreError;

/// Application-level error type.
/// Every service in the crate returns `Result<T, AppError>`; outer layers map
/// `code()` onto their own transport.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Analyzer unavailable: {0}")]
    AnalyzerUnavailable(#[from] AnalyzerError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::AnalyzerUnavailable(_) => "ANALYZER_UNAVAILABLE",
            AppError::Store(_) => "STORE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the (code, message) pair safe to show to a caller.
    /// Store and internal failures are logged here and replaced by a generic message.
    pub fn public_message(&self) -> (&'static str, String) {
        let message = match self {
            AppError::NotFound(msg) | AppError::Validation(msg) => msg.clone(),
            AppError::AnalyzerUnavailable(e) => {
                tracing::error!("Analyzer error: {e}");
                "The text analysis service is unavailable".to_string()
            }
            AppError::Store(e) => {
                tracing::error!("Store error: {e}");
                "A storage error occurred".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal error occurred".to_string()
            }
        };
        (self.code(), message)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}
