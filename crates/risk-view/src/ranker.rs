//! Top-K ranking of feature attributions.

use serde::Serialize;

pub const ATTRIBUTION_TOP_K: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributionSign {
    IncreasesRisk,
    DecreasesRisk,
}

impl AttributionSign {
    /// Strictly positive values increase risk; zero counts as decreasing.
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            AttributionSign::IncreasesRisk
        } else {
            AttributionSign::DecreasesRisk
        }
    }

    pub fn color_hex(self) -> &'static str {
        match self {
            AttributionSign::IncreasesRisk => "#ef4444",
            AttributionSign::DecreasesRisk => "#10b981",
        }
    }

    pub fn legend(self) -> &'static str {
        match self {
            AttributionSign::IncreasesRisk => "increases risk",
            AttributionSign::DecreasesRisk => "decreases risk",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribution {
    pub label: String,
    pub value: f64,
    pub sign: AttributionSign,
}

fn label_for(index: usize, names: &[String]) -> String {
    match names.get(index) {
        Some(name) if !name.trim().is_empty() => name.clone(),
        _ => format!("Feature {}", index),
    }
}

/// Rank by descending |value| and keep the top [`ATTRIBUTION_TOP_K`].
///
/// `names` is positional; missing or blank entries fall back to
/// `"Feature <index>"`.
pub fn rank_attributions(contributions: &[f64], names: &[String]) -> Vec<Attribution> {
    rank_attributions_top(contributions, names, ATTRIBUTION_TOP_K)
}

pub fn rank_attributions_top(contributions: &[f64], names: &[String], k: usize) -> Vec<Attribution> {
    let mut indexed: Vec<(usize, f64)> = contributions.iter().copied().enumerate().collect();
    // sort_by is stable, so equal magnitudes keep their original order.
    indexed.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));

    indexed
        .into_iter()
        .take(k)
        .map(|(index, value)| Attribution {
            label: label_for(index, names),
            value,
            sign: AttributionSign::of(value),
        })
        .collect()
}
