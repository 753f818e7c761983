use anyhow::Result;
use std::sync::Arc;

use crate::Config;

/// Main application lifecycle manager
pub struct App {
    config: Arc<Config>,
    initialized: bool,
}

impl App {
    /// Create a new application instance from the on-disk config
    pub fn new() -> Result<Self> {
        let config = Config::load()?;
        Ok(Self::with_config(config))
    }

    /// Create an application instance around an existing config
    pub fn with_config(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            initialized: false,
        }
    }

    /// Validate configuration and prepare the storage directory
    pub fn initialize(&mut self) -> Result<()> {
        let validation = self.config.validate();
        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }
        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        std::fs::create_dir_all(&self.config.storage_dir)?;
        tracing::debug!("Storage directory: {}", self.config.storage_dir.display());

        self.initialized = true;
        tracing::info!("Application initialized successfully");
        Ok(())
    }

    /// Shutdown the application
    pub fn shutdown(&mut self) -> Result<()> {
        tracing::info!("Shutting down application");
        self.initialized = false;
        Ok(())
    }

    /// Get reference to application config
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shared handle to the config
    pub fn shared_config(&self) -> Arc<Config> {
        self.config.clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}
