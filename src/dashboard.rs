use analysis_engine::{demo_trades, AnalysisOrchestrator, AnalysisOutcome, TradeFeed};
use anyhow::{bail, Result};
use risk_view::{chart_bars, FeedColumn, FeedView, GaugeView, SortDirection};
use scoring_client::ScoringService;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::config::DashboardConfig;
use crate::render;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Simulate,
    Select(String),
    Fix,
    Show,
    Sort(FeedColumn, SortDirection),
    Unsort,
    Filter(String),
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let Some(head) = parts.next() else {
            bail!("empty command");
        };
        let rest: Vec<&str> = parts.collect();

        let command = match head.to_ascii_lowercase().as_str() {
            "simulate" | "ingest" | "new" => Command::Simulate,
            "select" | "sel" => match rest.as_slice() {
                [id] => Command::Select((*id).to_string()),
                _ => bail!("usage: select <trade-id>"),
            },
            "fix" | "correct" | "autocorrect" => Command::Fix,
            "show" | "refresh" => Command::Show,
            "sort" => match rest.as_slice() {
                [] => Command::Unsort,
                [col] => Command::Sort(parse_column(col)?, SortDirection::Descending),
                [col, dir] => Command::Sort(parse_column(col)?, parse_direction(dir)?),
                _ => bail!("usage: sort <column> [asc|desc]"),
            },
            "filter" => Command::Filter(rest.join(" ")),
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => bail!("unknown command '{}'; type 'help'", other),
        };
        Ok(command)
    }
}

fn parse_column(raw: &str) -> Result<FeedColumn> {
    match FeedColumn::parse(raw) {
        Some(col) => Ok(col),
        None => bail!("unknown column '{}'; expected id|asset|counterparty|prob|risk", raw),
    }
}

fn parse_direction(raw: &str) -> Result<SortDirection> {
    match raw.to_ascii_lowercase().as_str() {
        "asc" | "ascending" => Ok(SortDirection::Ascending),
        "desc" | "descending" => Ok(SortDirection::Descending),
        other => bail!("invalid sort direction '{}'; expected asc|desc", other),
    }
}

pub const HELP: &str = "\
commands:
  simulate              score a new high-risk trade and put it on top
  select <trade-id>     select a trade
  fix                   auto-correct SSI on the selected trade and re-score
  show                  redraw the dashboard
  sort [col] [asc|desc] sort the feed view (no column clears sorting)
  filter [text]         filter the feed view (no text clears the filter)
  quit
";

pub struct Dashboard<S> {
    orchestrator: AnalysisOrchestrator<S>,
    feature_names: Vec<String>,
    sort: Option<(FeedColumn, SortDirection)>,
    filter: String,
}

impl<S: ScoringService> Dashboard<S> {
    pub fn new(service: S, config: &DashboardConfig) -> Self {
        let feed = if config.seed_demo_trades {
            TradeFeed::with_rows(demo_trades())
        } else {
            TradeFeed::new()
        };
        Self {
            orchestrator: AnalysisOrchestrator::new(service, feed),
            feature_names: config.feature_names.clone(),
            sort: None,
            filter: String::new(),
        }
    }

    /// Full screen: header, feed, and the analytics panels for the selection.
    pub fn render(&self) -> String {
        let analyzing = self.orchestrator.is_analyzing();
        let feed = self.orchestrator.snapshot();

        let mut view = FeedView::build(feed.rows(), feed.selected_id());
        if let Some((column, direction)) = self.sort {
            view = view.sorted(column, direction);
        }
        view = view.filtered(&self.filter);

        let mut out = render::header(analyzing);
        out.push('\n');
        out.push_str(&render::feed_table(&view));
        out.push('\n');

        match feed.selected() {
            Some(row) => {
                out.push_str(&render::gauge(&GaugeView::for_row(row)));
                out.push('\n');
                out.push_str(&render::action_panel(analyzing));
                out.push('\n');
                out.push_str(&render::attribution_chart(&chart_bars(row, &self.feature_names)));
            }
            None => out.push_str("Select a trade to view risk analysis\n"),
        }

        let notes = self.orchestrator.notifications();
        if !notes.is_empty() {
            out.push('\n');
            out.push_str(&render::notifications(&notes[notes.len().saturating_sub(3)..]));
        }
        out
    }

    /// Apply one command. Returns false when the operator asked to quit.
    pub async fn handle(&mut self, command: Command) -> Result<bool> {
        match command {
            Command::Simulate => {
                report(self.orchestrator.simulate_new_trade().await);
            }
            Command::Fix => {
                report(self.orchestrator.auto_correct().await);
            }
            Command::Select(id) => self.orchestrator.select(&id)?,
            Command::Sort(column, direction) => self.sort = Some((column, direction)),
            Command::Unsort => self.sort = None,
            Command::Filter(text) => self.filter = text,
            Command::Show => {}
            Command::Help => {
                print!("{}", HELP);
                return Ok(true);
            }
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    /// Seed → simulate → auto-correct, drawing the screen after each step.
    pub async fn run_demo(&mut self) -> Result<()> {
        println!("{}", self.render());
        for command in [Command::Simulate, Command::Fix] {
            info!("demo step: {:?}", command);
            self.handle(command).await?;
            println!("{}", self.render());
        }
        Ok(())
    }

    pub async fn run_interactive(&mut self) -> Result<()> {
        println!("{}", self.render());
        print!("{}", HELP);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(e) => {
                    println!("{}", e);
                    continue;
                }
            };
            let redraw = !matches!(command, Command::Help | Command::Quit);
            match self.handle(command).await {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    println!("{}", e);
                    continue;
                }
            }
            if redraw {
                println!("{}", self.render());
            }
        }
        Ok(())
    }
}

fn report(outcome: AnalysisOutcome) {
    match outcome {
        AnalysisOutcome::Inserted(row) => info!("New trade {} scored {}", row.trade_id, row.risk_level),
        AnalysisOutcome::Corrected(row) => info!("Trade {} re-scored {}", row.trade_id, row.risk_level),
        AnalysisOutcome::Busy => warn!("Analysis already running; try again when it finishes"),
        AnalysisOutcome::NoSelection => warn!("Select a trade before auto-correcting"),
        AnalysisOutcome::Failed(reason) => warn!("Analysis failed: {}", reason),
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use common::{PredictionResponse, ShapExplanation, TradeRequest};
    use scoring_client::ScoringError;

    use super::*;

    /// Mismatched SSI scores critical, matched SSI scores low.
    struct FakeModel;

    #[async_trait]
    impl ScoringService for FakeModel {
        async fn score(&self, request: &TradeRequest) -> Result<PredictionResponse, ScoringError> {
            let (probability, level) = match request.ssi_status {
                common::SsiStatus::Mismatch => (0.97, "CRITICAL"),
                common::SsiStatus::Match => (0.04, "LOW"),
            };
            Ok(PredictionResponse {
                failure_probability: probability,
                risk_level: level.into(),
                shap_explanation: ShapExplanation {
                    base_value: 0.1,
                    feature_contributions: vec![0.6, -0.1, 0.2],
                },
            })
        }
    }

    fn dashboard() -> Dashboard<FakeModel> {
        Dashboard::new(FakeModel, &DashboardConfig::default())
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("simulate").unwrap(), Command::Simulate);
        assert_eq!(Command::parse("select TRD-1").unwrap(), Command::Select("TRD-1".into()));
        assert_eq!(
            Command::parse("sort prob asc").unwrap(),
            Command::Sort(FeedColumn::Probability, SortDirection::Ascending)
        );
        assert_eq!(Command::parse("sort").unwrap(), Command::Unsort);
        assert_eq!(Command::parse("filter Goldman Sachs").unwrap(), Command::Filter("Goldman Sachs".into()));
        assert!(Command::parse("select").is_err());
        assert!(Command::parse("sort volume").is_err());
        assert!(Command::parse("dance").is_err());
    }

    #[test]
    fn test_initial_render_shows_seeded_selection() {
        let screen = dashboard().render();

        assert!(screen.contains("TRD-2024-001"));
        assert!(screen.contains("<CRITICAL RISK>"));
        assert!(screen.contains("[Auto-Correct SSI]"));
        assert!(screen.contains("Feature 0"));
    }

    #[test]
    fn test_empty_feed_prompts_for_selection() {
        let config = DashboardConfig {
            seed_demo_trades: false,
            feature_names: Vec::new(),
        };
        let screen = Dashboard::new(FakeModel, &config).render();

        assert!(screen.contains("(no trades)"));
        assert!(screen.contains("Select a trade to view risk analysis"));
    }

    #[tokio::test]
    async fn test_simulate_then_fix_round() {
        let mut dash = dashboard();

        assert!(dash.handle(Command::Simulate).await.unwrap());
        let selected = dash.orchestrator.selected().expect("new trade selected");
        assert_eq!(selected.risk_level, "CRITICAL");
        assert_eq!(dash.orchestrator.snapshot().rows()[0].trade_id, selected.trade_id);

        assert!(dash.handle(Command::Fix).await.unwrap());
        let fixed = dash.orchestrator.selected().expect("still selected");
        assert_eq!(fixed.trade_id, selected.trade_id);
        assert_eq!(fixed.risk_level, "LOW");
        assert!(dash.render().contains("<LOW RISK>"));
    }

    #[tokio::test]
    async fn test_filter_and_sort_only_change_the_view() {
        let mut dash = dashboard();
        dash.handle(Command::Filter("goldman".into())).await.unwrap();
        let screen = dash.render();
        assert!(screen.contains("TRD-2024-002"));
        assert!(!screen.contains("TRD-2024-003"));

        dash.handle(Command::Filter(String::new())).await.unwrap();
        dash.handle(Command::Sort(FeedColumn::Probability, SortDirection::Ascending))
            .await
            .unwrap();
        let screen = dash.render();
        let low = screen.find("TRD-2024-002").expect("row 002 shown");
        let high = screen.find("TRD-2024-001").expect("row 001 shown");
        assert!(low < high);
        assert_eq!(dash.orchestrator.snapshot().rows()[0].trade_id, "TRD-2024-001");
    }

    #[tokio::test]
    async fn test_select_unknown_trade_is_error() {
        let mut dash = dashboard();
        assert!(dash.handle(Command::Select("TRD-404".into())).await.is_err());
        assert!(!dash.handle(Command::Quit).await.unwrap());
    }
}
