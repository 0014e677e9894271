pub mod feed;
pub mod orchestrator;
pub mod presets;

pub use feed::TradeFeed;
pub use orchestrator::{AnalysisOrchestrator, AnalysisOutcome, Notification, NotificationLevel};
pub use presets::{corrected_trade_request, demo_trades, new_trade_id, risky_trade_request};
