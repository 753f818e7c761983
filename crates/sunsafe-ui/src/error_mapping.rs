//! Maps UI-side failures to `sunsafe_core::AppError` for consistent user-facing messages.

use sunsafe_core::{AppError, ConfigError, NetworkError, StorageError, UvError};

use crate::services::UvFetchError;

impl From<UvFetchError> for AppError {
    fn from(e: UvFetchError) -> Self {
        match e {
            UvFetchError::Network(s) => AppError::Uv(UvError::ApiError(s)),
            UvFetchError::Status(status) => {
                AppError::Uv(UvError::ApiError(format!("HTTP {}", status)))
            }
            UvFetchError::Parse(s) => AppError::Uv(UvError::InvalidResponse(s)),
            UvFetchError::Config(s) => AppError::Config(ConfigError::Invalid(s)),
            UvFetchError::Cancelled => AppError::Network(NetworkError::Cancelled),
            UvFetchError::NotInitialized => AppError::Uv(UvError::ServiceUnavailable),
        }
    }
}

/// A failed write to the local store under `key`
pub fn storage_write_error(key: &str, e: &sunsafe_uv::UvError) -> AppError {
    AppError::Storage(StorageError::WriteFailed {
        key: key.to_string(),
        message: e.to_string(),
    })
}
