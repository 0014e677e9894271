mod config;
mod dashboard;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use common::{PredictionResponse, SsiStatus, TradeRequest};
use config::AppConfig;
use dashboard::Dashboard;
use risk_view::{classify, format_probability, rank_attributions};
use scoring_client::ScoringClient;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "settlement-guard", about = "Trade settlement failure risk dashboard")]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Emit logs as JSON lines.
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Seed the feed, ingest a risky trade, then auto-correct it.
    Demo,
    /// Operator console reading commands from stdin.
    Interactive,
    /// Score one trade and print the ranked explanation.
    Score(ScoreArgs),
    /// Check the scoring service's health endpoint.
    Health,
    /// Print JSON schemas for the scoring request and response.
    Schema,
}

#[derive(clap::Args, Debug)]
struct ScoreArgs {
    #[arg(long, default_value_t = 15_000_000.0)]
    notional: f64,
    #[arg(long, default_value_t = 35.0)]
    volatility: f64,
    #[arg(long, default_value = "Corp Bond")]
    asset_class: String,
    #[arg(long, default_value = "CCC")]
    rating: String,
    /// Settlement instructions match the counterparty's.
    #[arg(long)]
    ssi_match: bool,
    #[arg(long, default_value = "Low")]
    liquidity: String,
    #[arg(long)]
    custodian: Option<String>,
    #[arg(long)]
    operation: Option<String>,
    #[arg(long)]
    currency: Option<String>,
    #[arg(long)]
    trade_day: Option<String>,
    #[arg(long)]
    trade_hour: Option<f64>,
}

impl From<ScoreArgs> for TradeRequest {
    fn from(args: ScoreArgs) -> Self {
        TradeRequest {
            notional_amount_usd: args.notional,
            market_volatility_index: args.volatility,
            asset_class: args.asset_class,
            counterparty_rating: args.rating,
            ssi_status: if args.ssi_match {
                SsiStatus::Match
            } else {
                SsiStatus::Mismatch
            },
            liquidity_score: args.liquidity,
            custodian_location: args.custodian,
            operation_type: args.operation,
            currency: args.currency,
            trade_day: args.trade_day,
            trade_hour: args.trade_hour,
        }
    }
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print_prediction(prediction: &PredictionResponse, feature_names: &[String]) {
    let tier = classify(prediction.failure_probability);
    println!(
        "failure_probability: {} (service: {}, display tier: {})",
        format_probability(prediction.failure_probability),
        prediction.risk_level,
        tier.label()
    );
    println!("base_value: {:.4}", prediction.shap_explanation.base_value);
    for attribution in rank_attributions(&prediction.shap_explanation.feature_contributions, feature_names) {
        println!(
            "  {:<24} {:+.4}  {}",
            attribution.label,
            attribution.value,
            attribution.sign.legend()
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.json_logs);

    let config = AppConfig::load(&cli.config)?;
    info!("Loaded configuration: {:?}", config);

    let client = ScoringClient::new(&config.scoring.base_url, config.scoring.timeout_ms)?;

    match cli.command {
        Commands::Demo => {
            let mut dashboard = Dashboard::new(client, &config.dashboard);
            dashboard.run_demo().await?;
        }
        Commands::Interactive => {
            let mut dashboard = Dashboard::new(client, &config.dashboard);
            dashboard.run_interactive().await?;
        }
        Commands::Score(args) => {
            let request = TradeRequest::from(args);
            let prediction = client.score(&request).await?;
            print_prediction(&prediction, &config.dashboard.feature_names);
        }
        Commands::Health => {
            let health = client.health().await?;
            println!("{} ({})", health.status, health.service);
            if !health.is_healthy() {
                anyhow::bail!("scoring service at {} reports {}", client.base_url(), health.status);
            }
        }
        Commands::Schema => {
            let schemas = serde_json::json!({
                "TradeRequest": schemars::schema_for!(TradeRequest),
                "PredictionResponse": schemars::schema_for!(PredictionResponse),
            });
            println!("{}", serde_json::to_string_pretty(&schemas)?);
        }
    }

    Ok(())
}
