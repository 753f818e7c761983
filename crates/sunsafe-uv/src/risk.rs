/// UV risk band
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskLevel {
    NoUv,
    Low,
    Moderate,
    High,
    VeryHigh,
    Extreme,
}

impl RiskLevel {
    /// Bands: <1, <3, <6, <8, <11, else Extreme. NaN counts as no UV.
    pub fn classify(uvi: f64) -> Self {
        if uvi.is_nan() || uvi < 1.0 {
            Self::NoUv
        } else if uvi < 3.0 {
            Self::Low
        } else if uvi < 6.0 {
            Self::Moderate
        } else if uvi < 8.0 {
            Self::High
        } else if uvi < 11.0 {
            Self::VeryHigh
        } else {
            Self::Extreme
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::NoUv => "No UV",
            Self::Low => "Low UV",
            Self::Moderate => "Moderate UV",
            Self::High => "High UV",
            Self::VeryHigh => "Very High UV",
            Self::Extreme => "Extreme UV",
        }
    }

    /// Hex colour used for the dial
    pub fn color(&self) -> &'static str {
        match self {
            Self::NoUv => "#1E90FF",
            Self::Low => "#2ed573",
            Self::Moderate => "#ffa502",
            Self::High => "#ff7f50",
            Self::VeryHigh => "#ff4757",
            Self::Extreme => "#9c27b0",
        }
    }
}
