//! Error types for the Elidune portal core

use serde::Deserialize;
use thiserror::Error;

use crate::models::ItemId;

/// Main portal error type
#[derive(Error, Debug)]
pub enum PortalError {
    /// Transport failure, timeout, or an unreadable response
    #[error("Network error: {0}")]
    Network(String),

    /// The API refused the caller's credentials (401/403)
    #[error("Not authorized")]
    Unauthorized,

    /// The API answered but refused the operation
    #[error("Rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Item {0} already has a request in flight")]
    Busy(ItemId),

    #[error("A reading request is already being sent")]
    SubmissionInFlight,

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error body returned by the Elidune API
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl PortalError {
    /// Headline shown to the user when the error surfaces in a notification
    pub fn user_message(&self) -> String {
        match self {
            PortalError::Network(_) => "Connection problem, please try again".to_string(),
            PortalError::Unauthorized => "Please sign in to continue".to_string(),
            PortalError::Rejected { message, .. } if !message.is_empty() => message.clone(),
            PortalError::Rejected { .. } => "The library could not complete this action".to_string(),
            PortalError::Validation(msg) => msg.clone(),
            PortalError::Busy(_) | PortalError::SubmissionInFlight => {
                "Please wait for the previous action to finish".to_string()
            }
            PortalError::Config(_) | PortalError::Internal(_) => "Something went wrong".to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, PortalError::Unauthorized)
    }
}

impl From<reqwest::Error> for PortalError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            PortalError::Network(format!("request timed out: {}", e))
        } else {
            PortalError::Network(e.to_string())
        }
    }
}

impl From<validator::ValidationErrors> for PortalError {
    fn from(errors: validator::ValidationErrors) -> Self {
        // First message wins; the form shows one inline error at a time
        let message = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| errors.to_string());
        PortalError::Validation(message)
    }
}

/// Result type alias for portal operations
pub type PortalResult<T> = Result<T, PortalError>;
