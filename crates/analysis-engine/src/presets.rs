//! Fixed requests and sample rows used by the dashboard workflows.

use common::{ShapExplanation, SsiStatus, TradeRequest, TradeRow};
use uuid::Uuid;

pub const SIMULATED_ASSET_CLASS: &str = "Corp Bond";
pub const SIMULATED_COUNTERPARTY: &str = "Risky Bank Intl";

/// A trade built to fail: CCC counterparty, illiquid corporate bond, high
/// volatility, and settlement instructions that do not match.
pub fn risky_trade_request() -> TradeRequest {
    TradeRequest {
        notional_amount_usd: 15_000_000.0,
        market_volatility_index: 35.0,
        asset_class: SIMULATED_ASSET_CLASS.to_string(),
        counterparty_rating: "CCC".to_string(),
        ssi_status: SsiStatus::Mismatch,
        liquidity_score: "Low".to_string(),
        custodian_location: Some("EU".to_string()),
        operation_type: Some("DVP".to_string()),
        currency: Some("EUR".to_string()),
        trade_day: None,
        trade_hour: None,
    }
}

/// The risky trade with its SSI fixed.
pub fn corrected_trade_request() -> TradeRequest {
    TradeRequest {
        ssi_status: SsiStatus::Match,
        ..risky_trade_request()
    }
}

/// `TRD-` plus eight upper-case hex digits.
pub fn new_trade_id() -> String {
    let raw = Uuid::new_v4().simple().to_string();
    format!("TRD-{}", raw[..8].to_ascii_uppercase())
}

fn demo_row(
    trade_id: &str,
    asset_class: &str,
    counterparty: &str,
    probability: f64,
    risk_level: &str,
    contributions: Vec<f64>,
) -> TradeRow {
    TradeRow {
        trade_id: trade_id.to_string(),
        asset_class: asset_class.to_string(),
        counterparty: counterparty.to_string(),
        failure_probability: probability,
        risk_level: risk_level.to_string(),
        shap_explanation: ShapExplanation {
            base_value: 0.0,
            feature_contributions: contributions,
        },
    }
}

/// Sample feed shown before any trade has been scored.
pub fn demo_trades() -> Vec<TradeRow> {
    vec![
        demo_row("TRD-2024-001", "Corp Bond", "Lehman Bros Legacy", 0.92, "CRITICAL", vec![0.5, 0.3, 0.0]),
        demo_row("TRD-2024-002", "Equity", "Goldman Sachs", 0.05, "LOW", Vec::new()),
        demo_row("TRD-2024-003", "FX", "JP Morgan", 0.12, "LOW", Vec::new()),
    ]
}
