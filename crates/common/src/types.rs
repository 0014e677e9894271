//! Scoring contract and display entities.
//!
//! Field names on the wire follow the scoring service exactly
//! (`Notional_Amount_USD`, `failure_probability`, ...).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ── Scoring request ──────────────────────────────────────────────────

/// Standing settlement instruction state of a trade versus its counterparty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum SsiStatus {
    Match,
    Mismatch,
}

/// Body of `POST /predict`.
///
/// Only presence of the required fields is enforced here; the service owns
/// semantic validation. Optional fields are left out of the body when absent
/// so the service applies its own defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TradeRequest {
    #[serde(rename = "Notional_Amount_USD")]
    pub notional_amount_usd: f64,
    #[serde(rename = "Market_Volatility_Index")]
    pub market_volatility_index: f64,
    #[serde(rename = "Asset_Class")]
    pub asset_class: String,
    #[serde(rename = "Counterparty_Rating")]
    pub counterparty_rating: String,
    #[serde(rename = "SSI_Status")]
    pub ssi_status: SsiStatus,
    #[serde(rename = "Liquidity_Score")]
    pub liquidity_score: String,
    #[serde(rename = "Custodian_Location", default, skip_serializing_if = "Option::is_none")]
    pub custodian_location: Option<String>,
    #[serde(rename = "Operation_Type", default, skip_serializing_if = "Option::is_none")]
    pub operation_type: Option<String>,
    #[serde(rename = "Currency", default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(rename = "Trade_Day", default, skip_serializing_if = "Option::is_none")]
    pub trade_day: Option<String>,
    #[serde(rename = "Trade_Hour", default, skip_serializing_if = "Option::is_none")]
    pub trade_hour: Option<f64>,
}

// ── Scoring response ─────────────────────────────────────────────────

/// Additive per-feature decomposition of a prediction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ShapExplanation {
    #[serde(default)]
    pub base_value: f64,
    /// One entry per model feature, in the order fixed by the service.
    #[serde(default)]
    pub feature_contributions: Vec<f64>,
}

/// Body returned by `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PredictionResponse {
    /// Probability of settlement failure, expected in [0, 1].
    pub failure_probability: f64,
    /// Tier label as computed by the service (LOW / HIGH / CRITICAL).
    pub risk_level: String,
    #[serde(default)]
    pub shap_explanation: ShapExplanation,
}

// ── Display entities ─────────────────────────────────────────────────

/// One row of the live trade feed: a scoring result plus identity fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRow {
    #[serde(rename = "Trade_ID")]
    pub trade_id: String,
    #[serde(rename = "Asset_Class")]
    pub asset_class: String,
    #[serde(rename = "Counterparty")]
    pub counterparty: String,
    pub failure_probability: f64,
    pub risk_level: String,
    #[serde(default)]
    pub shap_explanation: ShapExplanation,
}

impl TradeRow {
    /// Build a row from a fresh scoring response.
    pub fn from_prediction(
        trade_id: impl Into<String>,
        asset_class: impl Into<String>,
        counterparty: impl Into<String>,
        prediction: PredictionResponse,
    ) -> Self {
        Self {
            trade_id: trade_id.into(),
            asset_class: asset_class.into(),
            counterparty: counterparty.into(),
            failure_probability: prediction.failure_probability,
            risk_level: prediction.risk_level,
            shap_explanation: prediction.shap_explanation,
        }
    }

    /// Overwrite the scored fields, keeping identity and display fields.
    pub fn merged_with(&self, prediction: PredictionResponse) -> Self {
        Self {
            trade_id: self.trade_id.clone(),
            asset_class: self.asset_class.clone(),
            counterparty: self.counterparty.clone(),
            failure_probability: prediction.failure_probability,
            risk_level: prediction.risk_level,
            shap_explanation: prediction.shap_explanation,
        }
    }
}

/// `GET /health` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
