//! HTTP client for the settlement-failure scoring service.
//!
//! One request per call: no retry, no caching. Identical requests are
//! always re-sent.

use std::time::Duration;

use async_trait::async_trait;
use common::{HealthStatus, PredictionResponse, TradeRequest};
use reqwest::Client;
use tracing::{debug, instrument};

use crate::error::{summarize_response_body, ScoringError};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

const PREDICT_PATH: &str = "/predict";
const HEALTH_PATH: &str = "/health";

/// Anything that can score a trade. The orchestrator depends on this rather
/// than on the HTTP client directly.
#[async_trait]
pub trait ScoringService: Send + Sync {
    async fn score(&self, request: &TradeRequest) -> Result<PredictionResponse, ScoringError>;
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

#[derive(Debug, Clone)]
pub struct ScoringClient {
    client: Client,
    base_url: String,
}

impl ScoringClient {
    /// Build a client against `base_url`.
    ///
    /// `timeout_ms = None` keeps the transport default (no explicit deadline).
    pub fn new(base_url: &str, timeout_ms: Option<u64>) -> Result<Self, ScoringError> {
        let mut builder = Client::builder();
        if let Some(ms) = timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let client = builder.build().map_err(|e| ScoringError::transport(&e))?;

        Ok(Self {
            client,
            base_url: normalize_base_url(base_url),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ScoringError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ScoringError::HttpStatus {
            status: status.as_u16(),
            body: summarize_response_body(&body),
        })
    }

    /// `POST /predict` with the trade as a JSON body.
    #[instrument(skip(self, request), fields(ssi_status = ?request.ssi_status))]
    pub async fn score(&self, request: &TradeRequest) -> Result<PredictionResponse, ScoringError> {
        let response = self
            .client
            .post(self.url(PREDICT_PATH))
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| ScoringError::transport(&e))?;

        let response = Self::check_status(response).await?;
        let prediction: PredictionResponse = response
            .json()
            .await
            .map_err(|e| ScoringError::Decode(e.to_string()))?;

        debug!(
            probability = prediction.failure_probability,
            risk_level = %prediction.risk_level,
            contributions = prediction.shap_explanation.feature_contributions.len(),
            "scored trade"
        );
        Ok(prediction)
    }

    /// `GET /health`.
    pub async fn health(&self) -> Result<HealthStatus, ScoringError> {
        let response = self
            .client
            .get(self.url(HEALTH_PATH))
            .send()
            .await
            .map_err(|e| ScoringError::transport(&e))?;

        Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ScoringError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ScoringService for ScoringClient {
    async fn score(&self, request: &TradeRequest) -> Result<PredictionResponse, ScoringError> {
        ScoringClient::score(self, request).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use common::SsiStatus;
    use serde_json::{json, Value};

    use super::*;

    fn risky_request() -> TradeRequest {
        TradeRequest {
            notional_amount_usd: 15_000_000.0,
            market_volatility_index: 35.0,
            asset_class: "Corp Bond".into(),
            counterparty_rating: "CCC".into(),
            ssi_status: SsiStatus::Mismatch,
            liquidity_score: "Low".into(),
            custodian_location: Some("EU".into()),
            operation_type: Some("DVP".into()),
            currency: Some("EUR".into()),
            trade_day: None,
            trade_hour: None,
        }
    }

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });
        format!("http://{}/", addr)
    }

    async fn echo_predict(State(hits): State<Arc<AtomicUsize>>, Json(body): Json<Value>) -> Json<Value> {
        hits.fetch_add(1, Ordering::SeqCst);
        let probability = if body["SSI_Status"] == "Mismatch" { 0.92 } else { 0.05 };
        Json(json!({
            "failure_probability": probability,
            "risk_level": if probability > 0.8 { "CRITICAL" } else { "LOW" },
            "shap_explanation": {"base_value": 0.0, "feature_contributions": [0.5, 0.3, 0.0]}
        }))
    }

    #[tokio::test]
    async fn test_score_posts_request_and_decodes_response() {
        let hits = Arc::new(AtomicUsize::new(0));
        let router = Router::new()
            .route("/predict", post(echo_predict))
            .with_state(hits.clone());
        let base = spawn(router).await;

        let client = ScoringClient::new(&base, Some(2_000)).expect("client should build");
        let prediction = client.score(&risky_request()).await.expect("score should succeed");

        assert_eq!(prediction.failure_probability, 0.92);
        assert_eq!(prediction.risk_level, "CRITICAL");
        assert_eq!(prediction.shap_explanation.feature_contributions, vec![0.5, 0.3, 0.0]);

        // No caching: the same request goes over the wire again.
        client.score(&risky_request()).await.expect("second score should succeed");
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_non_success_status_is_scoring_error() {
        let router = Router::new().route(
            "/predict",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"detail": "Model not loaded"})),
                )
            }),
        );
        let base = spawn(router).await;

        let client = ScoringClient::new(&base, None).expect("client should build");
        let err = client.score(&risky_request()).await.expect_err("500 must fail");

        match err {
            ScoringError::HttpStatus { status, body } => {
                assert_eq!(status, 500);
                assert!(body.contains("Model not loaded"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_garbled_body_is_decode_error() {
        let router = Router::new().route("/predict", post(|| async { "not json" }));
        let base = spawn(router).await;

        let client = ScoringClient::new(&base, None).expect("client should build");
        let err = client.score(&risky_request()).await.expect_err("garbage must fail");
        assert!(matches!(err, ScoringError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);

        let client =
            ScoringClient::new(&format!("http://{}", addr), Some(1_000)).expect("client should build");
        let err = client.score(&risky_request()).await.expect_err("closed port must fail");
        assert!(matches!(err, ScoringError::Transport(_)));
    }

    #[tokio::test]
    async fn test_health_reports_model_state() {
        let router = Router::new().route(
            "/health",
            get(|| async { Json(json!({"status": "no_model", "service": "api-gateway"})) }),
        );
        let base = spawn(router).await;

        let client = ScoringClient::new(&base, None).expect("client should build");
        let health = client.health().await.expect("health should succeed");
        assert_eq!(health.service, "api-gateway");
        assert!(!health.is_healthy());
    }

    #[test]
    fn test_base_url_is_normalized() {
        let client = ScoringClient::new("  http://localhost:8000/ ", None).expect("client should build");
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
        assert_eq!(client.url(PREDICT_PATH), "http://localhost:8000/predict");
    }
}
