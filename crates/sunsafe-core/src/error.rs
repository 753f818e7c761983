//! Application error hierarchy.
//!
//! Library crates report their own `thiserror` enums; the front end folds
//! them into [`AppError`], whose `user_message()` is what the screen shows.

use thiserror::Error;

/// Top-level application error type.
///
/// Use `user_message()` to get a display-appropriate message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("UV service error: {0}")]
    Uv(#[from] UvError),
}

impl AppError {
    /// Returns a user-friendly message suitable for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Storage(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
            AppError::Uv(e) => e.user_message(),
        }
    }

    /// Whether a manual retry makes sense for this error.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Network(_) => true,
            AppError::Uv(e) => e.is_retryable(),
            _ => false,
        }
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Request cancelled")]
    Cancelled,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to connect. Check your internet connection."
            }
            NetworkError::Timeout => "The request timed out. Please try again.",
            NetworkError::Cancelled => "The request was cancelled.",
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The server is experiencing issues. Please try again later."
            }
            NetworkError::ServerError { .. } => "The request failed. Please try again.",
            NetworkError::InvalidResponse(_) => {
                "Received an unexpected response. Please try again."
            }
        }
    }
}

/// Local key-value storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to write {key}: {message}")]
    WriteFailed { key: String, message: String },
}

impl StorageError {
    pub fn user_message(&self) -> &'static str {
        match self {
            StorageError::WriteFailed { .. } => "Unable to save data. Check disk space and permissions.",
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
        }
    }
}

/// UV service errors.
#[derive(Debug, Error)]
pub enum UvError {
    #[error("Settings incomplete")]
    SettingsIncomplete,

    #[error("UV API error: {0}")]
    ApiError(String),

    #[error("Malformed UV data: {0}")]
    InvalidResponse(String),

    #[error("Service unavailable")]
    ServiceUnavailable,
}

impl UvError {
    pub fn user_message(&self) -> &'static str {
        match self {
            UvError::SettingsIncomplete => {
                "Please complete your settings to view sun safety information."
            }
            UvError::ApiError(_) | UvError::InvalidResponse(_) => {
                "Error loading UV data. Try again later."
            }
            UvError::ServiceUnavailable => "UV service unavailable. Please try again later.",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            UvError::ApiError(_) | UvError::InvalidResponse(_) | UvError::ServiceUnavailable
        )
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_connect() {
            NetworkError::ConnectionFailed(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_non_empty() {
        let messages = [
            NetworkError::Timeout.user_message(),
            NetworkError::Cancelled.user_message(),
            StorageError::WriteFailed {
                key: "k".into(),
                message: "x".into(),
            }
            .user_message(),
            ConfigError::Invalid("x".into()).user_message(),
            UvError::SettingsIncomplete.user_message(),
            UvError::ApiError("x".into()).user_message(),
        ];

        for msg in messages {
            assert!(!msg.is_empty());
        }
    }

    #[test]
    fn test_app_error_conversion() {
        let uv_err = UvError::SettingsIncomplete;
        let app_err: AppError = uv_err.into();
        assert!(matches!(app_err, AppError::Uv(UvError::SettingsIncomplete)));
    }

    #[test]
    fn test_fetch_failures_share_generic_message() {
        let network = AppError::Uv(UvError::ApiError("HTTP 503".into()));
        let parse = AppError::Uv(UvError::InvalidResponse("missing now".into()));
        assert_eq!(network.user_message(), "Error loading UV data. Try again later.");
        assert_eq!(network.user_message(), parse.user_message());
    }

    #[test]
    fn test_server_error_message_depends_on_status() {
        let server = NetworkError::ServerError {
            status: 503,
            message: "unavailable".into(),
        };
        let client = NetworkError::ServerError {
            status: 404,
            message: "not found".into(),
        };
        assert!(server.user_message().contains("later"));
        assert_eq!(client.user_message(), "The request failed. Please try again.");
    }

    #[test]
    fn test_retryable_classification() {
        assert!(AppError::Uv(UvError::ApiError("x".into())).is_retryable());
        assert!(AppError::Network(NetworkError::Timeout).is_retryable());
        assert!(!AppError::Uv(UvError::SettingsIncomplete).is_retryable());
        assert!(!AppError::Config(ConfigError::Invalid("x".into())).is_retryable());
    }
}
