use serde::Serialize;

pub const CRITICAL_THRESHOLD: f64 = 0.8;
pub const HIGH_THRESHOLD: f64 = 0.5;

/// Color band shared by the gauge, the probability cell, the row highlight
/// and the tier badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTier {
    Low,
    High,
    Critical,
}

impl RiskTier {
    pub fn label(self) -> &'static str {
        match self {
            RiskTier::Low => "LOW",
            RiskTier::High => "HIGH",
            RiskTier::Critical => "CRITICAL",
        }
    }

    pub fn color_name(self) -> &'static str {
        match self {
            RiskTier::Low => "green",
            RiskTier::High => "orange",
            RiskTier::Critical => "red",
        }
    }

    pub fn color_hex(self) -> &'static str {
        match self {
            RiskTier::Low => "#10b981",
            RiskTier::High => "#f97316",
            RiskTier::Critical => "#ef4444",
        }
    }

    /// Only critical rows get the feed highlight.
    pub fn highlights_row(self) -> bool {
        self == RiskTier::Critical
    }
}

/// Pin a probability to [0, 1]. NaN maps to 0.
pub fn clamp_probability(probability: f64) -> f64 {
    if probability.is_nan() {
        return 0.0;
    }
    probability.clamp(0.0, 1.0)
}

/// Both thresholds are strict: 0.8 is HIGH, 0.5 is LOW.
pub fn classify(probability: f64) -> RiskTier {
    let p = clamp_probability(probability);
    if p > CRITICAL_THRESHOLD {
        RiskTier::Critical
    } else if p > HIGH_THRESHOLD {
        RiskTier::High
    } else {
        RiskTier::Low
    }
}

/// Needle angle on the half-circle gauge: 0 → 0°, 1 → 180°.
pub fn gauge_rotation_degrees(probability: f64) -> f64 {
    clamp_probability(probability) * 180.0
}
