//! Shared services for the UV front end.
//!
//! `AppServices` holds the runtime handle, the UV provider and the fetch
//! channel. The provider sits behind an RwLock so the endpoint can be
//! swapped after a config reload without rebuilding the controller.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use sunsafe_core::ApiConfig;
use sunsafe_uv::{UvError, UvProvider};

pub use crate::services::UvServiceMessage;

pub struct AppServices {
    /// Handle to the tokio runtime that runs fetches
    runtime: Handle,

    provider: RwLock<Option<Arc<UvProvider>>>,

    uv_service_tx: Sender<UvServiceMessage>,
    uv_service_rx: Mutex<Receiver<UvServiceMessage>>,

    /// Cancellation token of the fetch currently in flight
    fetch_cancel_token: RwLock<Option<CancellationToken>>,
}

impl AppServices {
    /// Services with no provider yet; fetches report `NotInitialized`.
    pub fn new(runtime: Handle) -> Self {
        let (tx, rx) = mpsc::channel();

        Self {
            runtime,
            provider: RwLock::new(None),
            uv_service_tx: tx,
            uv_service_rx: Mutex::new(rx),
            fetch_cancel_token: RwLock::new(None),
        }
    }

    /// Services wired to the API described by `api`
    pub fn from_config(runtime: Handle, api: &ApiConfig) -> Result<Self, UvError> {
        let services = Self::new(runtime);
        services.init_provider(api)?;
        Ok(services)
    }

    pub fn runtime(&self) -> &Handle {
        &self.runtime
    }

    /// Cancel the fetch in flight and drop the provider.
    pub fn shutdown(&self) {
        tracing::info!("AppServices shutdown initiated");
        self.cancel_fetch();
        *self.provider.write() = None;
        tracing::info!("AppServices shutdown complete");
    }

    // =========== UV Provider ===========

    pub fn provider(&self) -> Option<Arc<UvProvider>> {
        self.provider.read().clone()
    }

    pub fn set_provider(&self, provider: Option<Arc<UvProvider>>) {
        *self.provider.write() = provider;
    }

    pub fn init_provider(&self, api: &ApiConfig) -> Result<(), UvError> {
        let provider = UvProvider::new(&api.base_url, Duration::from_secs(api.timeout_secs))?;
        tracing::info!("UV provider initialized for {}", api.base_url);
        self.set_provider(Some(Arc::new(provider)));
        Ok(())
    }

    // =========== UV Service Channel ===========

    pub fn uv_service_tx(&self) -> Sender<UvServiceMessage> {
        self.uv_service_tx.clone()
    }

    /// Try to receive a message from the UV service channel (non-blocking).
    pub fn try_recv_uv_message(&self) -> Option<UvServiceMessage> {
        self.uv_service_rx.lock().try_recv().ok()
    }

    /// Wait up to `timeout` for the next UV service message.
    pub fn recv_uv_message_timeout(&self, timeout: Duration) -> Option<UvServiceMessage> {
        self.uv_service_rx.lock().recv_timeout(timeout).ok()
    }

    // =========== Fetch Cancellation ===========

    /// Cancel the fetch in flight (if any) and hand out a token for the next one.
    pub fn new_fetch_cancel_token(&self) -> CancellationToken {
        let token = CancellationToken::new();
        if let Some(previous) = self.fetch_cancel_token.write().replace(token.clone()) {
            previous.cancel();
        }
        token
    }

    pub fn cancel_fetch(&self) {
        if let Some(token) = self.fetch_cancel_token.write().take() {
            token.cancel();
        }
    }
}
