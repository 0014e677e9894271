use std::path::Path;

use common::Error;
use serde::Deserialize;
use tracing::{info, warn};

pub const API_URL_ENV: &str = "SETTLEMENT_GUARD_API_URL";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Unset keeps the HTTP transport's own default.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_true")]
    pub seed_demo_trades: bool,
    /// Positional labels for attribution bars; blanks fall back to "Feature i".
    #[serde(default)]
    pub feature_names: Vec<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            seed_demo_trades: default_true(),
            feature_names: Vec::new(),
        }
    }
}

fn default_base_url() -> String {
    scoring_client::client::DEFAULT_BASE_URL.into()
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    /// Read `path` if it exists, otherwise start from defaults. The
    /// `SETTLEMENT_GUARD_API_URL` override is applied last.
    pub fn load(path: &Path) -> common::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str::<AppConfig>(&content)
                .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?
        } else {
            info!("No config at {}; using defaults", path.display());
            AppConfig::default()
        };
        config.apply_env_override(std::env::var(API_URL_ENV).ok());
        Ok(config)
    }

    fn apply_env_override(&mut self, raw: Option<String>) {
        let Some(raw) = raw else {
            return;
        };
        let normalized = raw.trim().trim_end_matches('/').to_string();
        if normalized.is_empty() {
            warn!("Ignoring empty {} override", API_URL_ENV);
            return;
        }
        info!("Using {} override: {}", API_URL_ENV, normalized);
        self.scoring.base_url = normalized;
    }
}
