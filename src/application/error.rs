use thiserror::Error;

const UNKNOWN_ERROR: &str = "Unknown error";

#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Missing or malformed client input.
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// The remote provider call failed; carries its message.
    #[error("{0}")]
    Remote(String),

    #[error("{0}")]
    InternalError(String),

    /// A remote or internal failure annotated with the operation that failed.
    #[error("{action}: {message}")]
    Failed {
        action: &'static str,
        message: String,
    },
}

impl ApplicationError {
    /// Prefixes remote and internal failures with `action`. Client errors
    /// keep their own message.
    pub fn context(self, action: &'static str) -> Self {
        match self {
            ApplicationError::Remote(message) | ApplicationError::InternalError(message) => {
                let message = if message.trim().is_empty() {
                    UNKNOWN_ERROR.to_string()
                } else {
                    message
                };
                ApplicationError::Failed { action, message }
            }
            other => other,
        }
    }
}

pub trait ResultExt<T> {
    fn context(self, action: &'static str) -> Result<T, ApplicationError>;
}

impl<T> ResultExt<T> for Result<T, ApplicationError> {
    fn context(self, action: &'static str) -> Result<T, ApplicationError> {
        self.map_err(|e| e.context(action))
    }
}
