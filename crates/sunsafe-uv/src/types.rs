use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fitzpatrick skin type, I (most sensitive) to VI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkinType {
    I,
    II,
    III,
    IV,
    V,
    VI,
}

impl SkinType {
    pub const ALL: [SkinType; 6] = [
        SkinType::I,
        SkinType::II,
        SkinType::III,
        SkinType::IV,
        SkinType::V,
        SkinType::VI,
    ];

    /// Parse the stored form code ("1".."6")
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "1" => Some(Self::I),
            "2" => Some(Self::II),
            "3" => Some(Self::III),
            "4" => Some(Self::IV),
            "5" => Some(Self::V),
            "6" => Some(Self::VI),
            _ => None,
        }
    }

    /// Code persisted in settings
    pub fn code(&self) -> &'static str {
        match self {
            Self::I => "1",
            Self::II => "2",
            Self::III => "3",
            Self::IV => "4",
            Self::V => "5",
            Self::VI => "6",
        }
    }

    /// Short label for the Home readout
    pub fn label(&self) -> &'static str {
        match self {
            Self::I => "Type I (Very fair)",
            Self::II => "Type II (Fair)",
            Self::III => "Type III (Medium)",
            Self::IV => "Type IV (Olive)",
            Self::V => "Type V (Brown)",
            Self::VI => "Type VI (Dark brown/black)",
        }
    }

    /// Option text for the settings form
    pub fn description(&self) -> &'static str {
        match self {
            Self::I => "Type I - Very fair, always burns",
            Self::II => "Type II - Fair, burns easily",
            Self::III => "Type III - Medium, burns moderately",
            Self::IV => "Type IV - Olive, burns minimally",
            Self::V => "Type V - Brown, rarely burns",
            Self::VI => "Type VI - Dark brown/black, never burns",
        }
    }
}

/// Geographic coordinates in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A single UV reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UvSample {
    pub time: DateTime<Utc>,
    pub uvi: f64,
}

/// UV history, current reading and forecast for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UvDataset {
    pub now: UvSample,
    #[serde(default)]
    pub history: Vec<UvSample>,
    #[serde(default)]
    pub forecast: Vec<UvSample>,
}

impl UvDataset {
    /// History, now and forecast merged and sorted ascending by time.
    /// The sort is stable, so equal timestamps keep history < now < forecast order.
    pub fn points(&self) -> Vec<UvSample> {
        let mut points = Vec::with_capacity(self.history.len() + self.forecast.len() + 1);
        points.extend_from_slice(&self.history);
        points.push(self.now);
        points.extend_from_slice(&self.forecast);
        points.sort_by_key(|p| p.time);
        points
    }

    /// Reject readings that cannot come from a real UV sensor
    pub fn validate(&self) -> Result<(), UvError> {
        let all = self
            .history
            .iter()
            .chain(std::iter::once(&self.now))
            .chain(self.forecast.iter());
        for sample in all {
            if !sample.uvi.is_finite() || sample.uvi < 0.0 {
                return Err(UvError::Parse(format!(
                    "invalid UV index {} at {}",
                    sample.uvi, sample.time
                )));
            }
        }
        Ok(())
    }
}

/// UV service errors
#[derive(Debug, thiserror::Error)]
pub enum UvError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP {status}")]
    Status { status: u16 },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Request cancelled")]
    Cancelled,
}

impl UvError {
    /// Transport failures and unsuccessful HTTP statuses
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Status { .. })
    }
}
