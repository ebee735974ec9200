use thiserror::Error;

use crate::application::error::ApplicationError;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Storage provider error: {0}")]
    ProviderError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl StorageError {
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            404 => StorageError::NotFound(message),
            401 | 403 => StorageError::Unauthorized(message),
            _ => StorageError::ProviderError(message),
        }
    }

    /// The upstream message without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            StorageError::NotFound(msg)
            | StorageError::Unauthorized(msg)
            | StorageError::NetworkError(msg)
            | StorageError::InvalidCredentials(msg)
            | StorageError::ProviderError(msg)
            | StorageError::InternalError(msg) => msg,
        }
    }
}

// Remote failures, not-found included, all surface as 500s to the client.
impl From<StorageError> for ApplicationError {
    fn from(error: StorageError) -> Self {
        ApplicationError::Remote(error.message().to_string())
    }
}

impl From<reqwest::Error> for StorageError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            StorageError::NetworkError("Request timeout".to_string())
        } else if error.is_connect() {
            StorageError::NetworkError(format!("Connection failed: {}", error))
        } else if let Some(status) = error.status() {
            StorageError::from_status(status.as_u16(), error.to_string())
        } else {
            StorageError::InternalError(error.to_string())
        }
    }
}

/// Extracts the human-readable message from a provider error body.
///
/// Handles both the Drive API shape (`{"error": {"message": ...}}`) and the
/// OAuth token endpoint shape (`{"error": ..., "error_description": ...}`).
pub fn provider_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    if let Some(message) = value
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
    {
        return Some(message.to_string());
    }

    value
        .get("error_description")
        .or_else(|| value.get("error"))
        .and_then(|m| m.as_str())
        .map(str::to_string)
}
