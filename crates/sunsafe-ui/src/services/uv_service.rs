//! UV backend: async UV index fetching.
//! Network work runs on the tokio runtime; results are sent back via mpsc.

use std::sync::mpsc::Sender;
use std::sync::Arc;

use sunsafe_core::error::ReqwestErrorExt;
use sunsafe_uv::{UvError, UvDataset, UvProvider};
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

/// Error type for UV fetch operations
#[derive(Debug, Clone, PartialEq)]
pub enum UvFetchError {
    Network(String),
    Status(u16),
    Parse(String),
    Config(String),
    Cancelled,
    NotInitialized,
}

impl std::fmt::Display for UvFetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UvFetchError::Network(s) => write!(f, "UV network error: {}", s),
            UvFetchError::Status(code) => write!(f, "UV API returned HTTP {}", code),
            UvFetchError::Parse(s) => write!(f, "UV response malformed: {}", s),
            UvFetchError::Config(s) => write!(f, "UV endpoint misconfigured: {}", s),
            UvFetchError::Cancelled => write!(f, "UV fetch cancelled"),
            UvFetchError::NotInitialized => write!(f, "UV service not initialized"),
        }
    }
}

impl std::error::Error for UvFetchError {}

impl From<UvError> for UvFetchError {
    fn from(e: UvError) -> Self {
        match e {
            UvError::Network(e) => UvFetchError::Network(e.into_network_error().to_string()),
            UvError::Status { status } => UvFetchError::Status(status),
            UvError::Parse(s) => UvFetchError::Parse(s),
            UvError::InvalidEndpoint(s) => UvFetchError::Config(s),
            UvError::Cancelled => UvFetchError::Cancelled,
            UvError::Storage(s) => UvFetchError::Network(s),
        }
    }
}

/// Messages sent from async operations back to the controller
#[derive(Debug)]
pub enum UvServiceMessage {
    /// Result of fetch number `request_id`
    FetchDone {
        request_id: u64,
        result: Result<UvDataset, UvFetchError>,
    },
}

/// Request UV data for a location asynchronously.
/// Sends `FetchDone` on the channel when complete or cancelled.
pub fn request_fetch(
    tx: &Sender<UvServiceMessage>,
    runtime: &Handle,
    provider: Option<Arc<UvProvider>>,
    request_id: u64,
    latitude: String,
    longitude: String,
    cancel: CancellationToken,
) {
    let tx = tx.clone();
    let provider = match provider {
        Some(p) => p,
        None => {
            let _ = tx.send(UvServiceMessage::FetchDone {
                request_id,
                result: Err(UvFetchError::NotInitialized),
            });
            return;
        }
    };

    runtime.spawn(async move {
        let result = provider
            .fetch_cancellable(&latitude, &longitude, &cancel)
            .await
            .map_err(UvFetchError::from);
        if let Err(e) = &result {
            tracing::warn!("UV fetch #{} failed: {}", request_id, e);
        }
        // Receiver may be gone during shutdown
        let _ = tx.send(UvServiceMessage::FetchDone { request_id, result });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uv_fetch_error_display() {
        assert!(format!("{}", UvFetchError::Network("refused".into())).contains("network"));
        assert!(format!("{}", UvFetchError::Status(503)).contains("503"));
        assert!(format!("{}", UvFetchError::NotInitialized).contains("not initialized"));
    }

    #[test]
    fn uv_error_conversion() {
        assert_eq!(
            UvFetchError::from(UvError::Status { status: 404 }),
            UvFetchError::Status(404)
        );
        assert_eq!(
            UvFetchError::from(UvError::Parse("x".into())),
            UvFetchError::Parse("x".into())
        );
        assert_eq!(UvFetchError::from(UvError::Cancelled), UvFetchError::Cancelled);
    }

    #[test]
    fn missing_provider_reports_not_initialized() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let (tx, rx) = std::sync::mpsc::channel();
        request_fetch(
            &tx,
            runtime.handle(),
            None,
            3,
            "1".into(),
            "2".into(),
            CancellationToken::new(),
        );

        match rx.try_recv().unwrap() {
            UvServiceMessage::FetchDone { request_id, result } => {
                assert_eq!(request_id, 3);
                assert_eq!(result, Err(UvFetchError::NotInitialized));
            }
        }
    }
}
