//! User settings: location and skin type.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::storage::KeyValueStore;
use crate::types::{Coordinates, SkinType, UvError};

pub const SETTINGS_KEY: &str = "sunSafetySettings";

/// Location and skin type as entered in the settings form.
///
/// Fields stay strings so whatever the user typed round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub latitude: String,
    #[serde(default)]
    pub longitude: String,
    #[serde(default)]
    pub skin_type: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            latitude: String::new(),
            longitude: String::new(),
            skin_type: SkinType::I.code().to_string(),
        }
    }
}

/// Problems found by [`Settings::validate`]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsIssue {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("latitude is not a number: {0}")]
    LatitudeNotNumeric(String),
    #[error("latitude {0} is outside -90..90")]
    LatitudeOutOfRange(f64),
    #[error("longitude is not a number: {0}")]
    LongitudeNotNumeric(String),
    #[error("longitude {0} is outside -180..180")]
    LongitudeOutOfRange(f64),
    #[error("unknown skin type: {0}")]
    UnknownSkinType(String),
}

impl SettingsIssue {
    /// Blocking issues prevent saving; the rest are advisory.
    pub fn is_blocking(&self) -> bool {
        !matches!(self, Self::UnknownSkinType(_))
    }
}

impl Settings {
    pub fn new(
        latitude: impl Into<String>,
        longitude: impl Into<String>,
        skin_type: impl Into<String>,
    ) -> Self {
        Self {
            latitude: latitude.into().trim().to_string(),
            longitude: longitude.into().trim().to_string(),
            skin_type: skin_type.into().trim().to_string(),
        }
    }

    /// True iff latitude, longitude and skin type are all non-empty
    pub fn is_complete(&self) -> bool {
        !self.latitude.trim().is_empty()
            && !self.longitude.trim().is_empty()
            && !self.skin_type.trim().is_empty()
    }

    pub fn skin(&self) -> Option<SkinType> {
        SkinType::from_code(&self.skin_type)
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        let latitude = self.latitude.trim().parse::<f64>().ok()?;
        let longitude = self.longitude.trim().parse::<f64>().ok()?;
        Some(Coordinates {
            latitude,
            longitude,
        })
    }

    /// "40.0, -73.0" exactly as entered
    pub fn location_label(&self) -> String {
        format!("{}, {}", self.latitude, self.longitude)
    }

    pub fn validate(&self) -> Vec<SettingsIssue> {
        let mut issues = Vec::new();

        match self.latitude.trim() {
            "" => issues.push(SettingsIssue::Missing("latitude")),
            raw => match raw.parse::<f64>() {
                Ok(lat) if !(-90.0..=90.0).contains(&lat) => {
                    issues.push(SettingsIssue::LatitudeOutOfRange(lat))
                }
                Ok(_) => {}
                Err(_) => issues.push(SettingsIssue::LatitudeNotNumeric(raw.to_string())),
            },
        }

        match self.longitude.trim() {
            "" => issues.push(SettingsIssue::Missing("longitude")),
            raw => match raw.parse::<f64>() {
                Ok(lon) if !(-180.0..=180.0).contains(&lon) => {
                    issues.push(SettingsIssue::LongitudeOutOfRange(lon))
                }
                Ok(_) => {}
                Err(_) => issues.push(SettingsIssue::LongitudeNotNumeric(raw.to_string())),
            },
        }

        if self.skin_type.trim().is_empty() {
            issues.push(SettingsIssue::Missing("skin type"));
        } else if self.skin().is_none() {
            issues.push(SettingsIssue::UnknownSkinType(self.skin_type.clone()));
        }

        issues
    }
}

/// Persists [`Settings`] under [`SETTINGS_KEY`]
#[derive(Debug, Clone)]
pub struct SettingsStore {
    store: Arc<dyn KeyValueStore>,
}

impl SettingsStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored settings, or `None` when absent or unreadable
    pub fn load(&self) -> Option<Settings> {
        let raw = match self.store.get(SETTINGS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Failed to read settings: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(settings) => Some(settings),
            Err(e) => {
                tracing::warn!("Discarding corrupt settings: {}", e);
                None
            }
        }
    }

    pub fn load_or_default(&self) -> Settings {
        self.load().unwrap_or_default()
    }

    pub fn save(&self, settings: &Settings) -> Result<(), UvError> {
        let raw = serde_json::to_string(settings)
            .map_err(|e| UvError::Storage(format!("failed to serialize settings: {}", e)))?;
        self.store.set(SETTINGS_KEY, &raw)?;
        tracing::info!("Settings saved");
        Ok(())
    }
}
