//! View models handed to the grid, gauge and chart renderers.

use std::cmp::Ordering;

use common::TradeRow;
use serde::Serialize;

use crate::classifier::{classify, clamp_probability, gauge_rotation_degrees, RiskTier};
use crate::ranker::{rank_attributions, Attribution, AttributionSign};

/// `0.92` → `"92.0%"`.
pub fn format_probability(probability: f64) -> String {
    format!("{:.1}%", clamp_probability(probability) * 100.0)
}

// ── Gauge ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeView {
    pub rotation_degrees: f64,
    pub tier: RiskTier,
    pub percent_text: String,
    /// Badge text uses the service's own label.
    pub badge_text: String,
}

impl GaugeView {
    pub fn for_row(row: &TradeRow) -> Self {
        Self {
            rotation_degrees: gauge_rotation_degrees(row.failure_probability),
            tier: classify(row.failure_probability),
            percent_text: format_probability(row.failure_probability),
            badge_text: format!("{} RISK", row.risk_level),
        }
    }
}

// ── Attribution chart ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBar {
    pub label: String,
    pub value: f64,
    pub sign: AttributionSign,
    pub fill: &'static str,
    pub tooltip: String,
}

impl From<Attribution> for ChartBar {
    fn from(attribution: Attribution) -> Self {
        let tooltip = format!(
            "{}: {:+.4} ({})",
            attribution.label,
            attribution.value,
            attribution.sign.legend()
        );
        Self {
            fill: attribution.sign.color_hex(),
            label: attribution.label,
            value: attribution.value,
            sign: attribution.sign,
            tooltip,
        }
    }
}

/// Bars for the selected trade, largest drivers first.
pub fn chart_bars(row: &TradeRow, feature_names: &[String]) -> Vec<ChartBar> {
    rank_attributions(&row.shap_explanation.feature_contributions, feature_names)
        .into_iter()
        .map(ChartBar::from)
        .collect()
}

// ── Feed grid ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FeedColumn {
    TradeId,
    Asset,
    Counterparty,
    Probability,
    Risk,
}

impl FeedColumn {
    pub const ALL: [FeedColumn; 5] = [
        FeedColumn::TradeId,
        FeedColumn::Asset,
        FeedColumn::Counterparty,
        FeedColumn::Probability,
        FeedColumn::Risk,
    ];

    pub fn header(self) -> &'static str {
        match self {
            FeedColumn::TradeId => "Trade ID",
            FeedColumn::Asset => "Asset",
            FeedColumn::Counterparty => "Counterparty",
            FeedColumn::Probability => "Prob",
            FeedColumn::Risk => "Risk",
        }
    }

    /// Accepts header names and a few short aliases, case-insensitively.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "trade_id" | "trade id" | "id" => Some(FeedColumn::TradeId),
            "asset" | "asset_class" => Some(FeedColumn::Asset),
            "counterparty" | "cp" => Some(FeedColumn::Counterparty),
            "prob" | "probability" | "failure_probability" => Some(FeedColumn::Probability),
            "risk" | "risk_level" => Some(FeedColumn::Risk),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedRowView {
    pub trade_id: String,
    pub asset: String,
    pub counterparty: String,
    pub probability: f64,
    pub probability_text: String,
    pub risk_level: String,
    /// Drives both the probability cell color and the risk badge.
    pub tier: RiskTier,
    pub highlighted: bool,
    pub selected: bool,
}

impl FeedRowView {
    fn from_row(row: &TradeRow, selected_id: Option<&str>) -> Self {
        let tier = classify(row.failure_probability);
        Self {
            trade_id: row.trade_id.clone(),
            asset: row.asset_class.clone(),
            counterparty: row.counterparty.clone(),
            probability: row.failure_probability,
            probability_text: format_probability(row.failure_probability),
            risk_level: row.risk_level.clone(),
            tier,
            highlighted: tier.highlights_row(),
            selected: selected_id == Some(row.trade_id.as_str()),
        }
    }

    pub fn cell(&self, column: FeedColumn) -> &str {
        match column {
            FeedColumn::TradeId => &self.trade_id,
            FeedColumn::Asset => &self.asset,
            FeedColumn::Counterparty => &self.counterparty,
            FeedColumn::Probability => &self.probability_text,
            FeedColumn::Risk => &self.risk_level,
        }
    }

    fn compare(&self, other: &Self, column: FeedColumn) -> Ordering {
        match column {
            FeedColumn::Probability => self.probability.total_cmp(&other.probability),
            FeedColumn::Risk => self.tier.cmp(&other.tier),
            _ => self.cell(column).cmp(other.cell(column)),
        }
    }
}

/// Grid projection of the feed. Sorting and filtering act on this view only;
/// the store order is never touched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeedView {
    pub rows: Vec<FeedRowView>,
}

impl FeedView {
    pub fn build(rows: &[TradeRow], selected_id: Option<&str>) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|row| FeedRowView::from_row(row, selected_id))
                .collect(),
        }
    }

    /// Stable sort, so equal keys keep feed order.
    pub fn sorted(mut self, column: FeedColumn, direction: SortDirection) -> Self {
        self.rows.sort_by(|a, b| {
            let ord = a.compare(b, column);
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
        self
    }

    /// Keep rows where any cell contains `needle` (case-insensitive).
    pub fn filtered(mut self, needle: &str) -> Self {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return self;
        }
        self.rows.retain(|row| {
            FeedColumn::ALL
                .iter()
                .any(|col| row.cell(*col).to_lowercase().contains(&needle))
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use common::ShapExplanation;

    use super::*;

    fn row(id: &str, asset: &str, probability: f64, level: &str) -> TradeRow {
        TradeRow {
            trade_id: id.into(),
            asset_class: asset.into(),
            counterparty: "Goldman Sachs".into(),
            failure_probability: probability,
            risk_level: level.into(),
            shap_explanation: ShapExplanation {
                base_value: 0.0,
                feature_contributions: vec![0.5, -0.3, 0.0],
            },
        }
    }

    #[test]
    fn test_gauge_view_for_critical_trade() {
        let gauge = GaugeView::for_row(&row("TRD-1", "Corp Bond", 0.92, "CRITICAL"));

        assert!((gauge.rotation_degrees - 165.6).abs() < 1e-9);
        assert_eq!(gauge.tier, RiskTier::Critical);
        assert_eq!(gauge.percent_text, "92.0%");
        assert_eq!(gauge.badge_text, "CRITICAL RISK");
    }

    #[test]
    fn test_row_surfaces_agree_on_tier() {
        let view = FeedView::build(
            &[row("A", "FX", 0.92, "CRITICAL"), row("B", "FX", 0.8, "HIGH")],
            Some("B"),
        );

        assert_eq!(view.rows[0].tier, RiskTier::Critical);
        assert!(view.rows[0].highlighted);
        assert!(!view.rows[0].selected);
        assert_eq!(view.rows[1].tier, RiskTier::High);
        assert!(!view.rows[1].highlighted);
        assert!(view.rows[1].selected);
    }

    #[test]
    fn test_sort_and_filter_do_not_touch_source() {
        let rows = vec![
            row("TRD-2024-001", "Corp Bond", 0.92, "CRITICAL"),
            row("TRD-2024-002", "Equity", 0.05, "LOW"),
            row("TRD-2024-003", "FX", 0.12, "LOW"),
        ];

        let ascending = FeedView::build(&rows, None).sorted(FeedColumn::Probability, SortDirection::Ascending);
        let ids: Vec<&str> = ascending.rows.iter().map(|r| r.trade_id.as_str()).collect();
        assert_eq!(ids, vec!["TRD-2024-002", "TRD-2024-003", "TRD-2024-001"]);

        let filtered = FeedView::build(&rows, None).filtered("equity");
        assert_eq!(filtered.rows.len(), 1);
        assert_eq!(filtered.rows[0].trade_id, "TRD-2024-002");

        assert_eq!(rows[0].trade_id, "TRD-2024-001");
    }

    #[test]
    fn test_chart_bars_are_colored_by_sign() {
        let bars = chart_bars(&row("TRD-1", "Corp Bond", 0.92, "CRITICAL"), &[]);

        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].label, "Feature 0");
        assert_eq!(bars[0].fill, "#ef4444");
        assert_eq!(bars[1].fill, "#10b981");
        assert_eq!(bars[2].fill, "#10b981");
        assert_eq!(bars[0].tooltip, "Feature 0: +0.5000 (increases risk)");
    }

    #[test]
    fn test_column_aliases() {
        assert_eq!(FeedColumn::parse("Prob"), Some(FeedColumn::Probability));
        assert_eq!(FeedColumn::parse(" id "), Some(FeedColumn::TradeId));
        assert_eq!(FeedColumn::parse("volume"), None);
    }
}
