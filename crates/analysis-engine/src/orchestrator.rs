//! Simulate-and-correct workflows over the trade feed.
//!
//! Each trigger is a short state transition: claim the in-flight slot, call
//! the scoring service, and on success apply one feed mutation. Failures are
//! logged and recorded as notifications; they never reach the feed.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use common::{PredictionResponse, TradeRequest, TradeRow};
use scoring_client::{ScoringError, ScoringService};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::feed::TradeFeed;
use crate::presets::{
    corrected_trade_request, new_trade_id, risky_trade_request, SIMULATED_ASSET_CLASS,
    SIMULATED_COUNTERPARTY,
};

const MAX_NOTIFICATIONS: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    /// A freshly scored trade was put at the front of the feed and selected.
    Inserted(TradeRow),
    /// The target row was re-scored in place.
    Corrected(TradeRow),
    /// Another scoring call is still outstanding; nothing was sent.
    Busy,
    /// Auto-correct with nothing selected.
    NoSelection,
    /// The scoring call failed; feed and selection are untouched.
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Error,
}

/// Non-blocking message for the operator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub at: DateTime<Utc>,
    pub level: NotificationLevel,
    pub message: String,
}

/// Clears the in-flight flag when dropped, on every exit path.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn claim(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct AnalysisOrchestrator<S> {
    service: S,
    feed: Mutex<TradeFeed>,
    analyzing: AtomicBool,
    notifications: Mutex<VecDeque<Notification>>,
}

impl<S: ScoringService> AnalysisOrchestrator<S> {
    pub fn new(service: S, feed: TradeFeed) -> Self {
        Self {
            service,
            feed: Mutex::new(feed),
            analyzing: AtomicBool::new(false),
            notifications: Mutex::new(VecDeque::new()),
        }
    }

    fn lock_feed(&self) -> MutexGuard<'_, TradeFeed> {
        self.feed.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn notify(&self, level: NotificationLevel, message: String) {
        let mut queue = self
            .notifications
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if queue.len() == MAX_NOTIFICATIONS {
            queue.pop_front();
        }
        queue.push_back(Notification {
            at: Utc::now(),
            level,
            message,
        });
    }

    /// True while a scoring call is outstanding. Views disable triggers on it.
    pub fn is_analyzing(&self) -> bool {
        self.analyzing.load(Ordering::Acquire)
    }

    /// Copy of the feed for rendering.
    pub fn snapshot(&self) -> TradeFeed {
        self.lock_feed().clone()
    }

    pub fn selected(&self) -> Option<TradeRow> {
        self.lock_feed().selected().cloned()
    }

    pub fn select(&self, trade_id: &str) -> Result<(), common::Error> {
        self.lock_feed().select(trade_id)
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .cloned()
            .collect()
    }

    async fn score(
        &self,
        request: &TradeRequest,
        workflow: &str,
    ) -> Result<PredictionResponse, ScoringError> {
        let result = self.service.score(request).await;
        if let Err(e) = &result {
            error!(workflow, error = %e, "scoring call failed");
            self.notify(NotificationLevel::Error, format!("{} failed: {}", workflow, e));
        }
        result
    }

    /// Score the fixed risky trade and put it at the front of the feed.
    pub async fn simulate_new_trade(&self) -> AnalysisOutcome {
        let Some(_in_flight) = InFlight::claim(&self.analyzing) else {
            warn!("simulate ignored: analysis already in flight");
            return AnalysisOutcome::Busy;
        };

        let request = risky_trade_request();
        let prediction = match self.score(&request, "simulate").await {
            Ok(prediction) => prediction,
            Err(e) => return AnalysisOutcome::Failed(e.to_string()),
        };

        let row = {
            let mut feed = self.lock_feed();
            let mut trade_id = new_trade_id();
            while feed.contains(&trade_id) {
                trade_id = new_trade_id();
            }
            let row = TradeRow::from_prediction(
                trade_id,
                SIMULATED_ASSET_CLASS,
                SIMULATED_COUNTERPARTY,
                prediction,
            );
            feed.insert_front(row.clone());
            if let Err(e) = feed.select(&row.trade_id) {
                warn!(error = %e, "new trade could not be selected");
            }
            row
        };

        info!(
            trade_id = %row.trade_id,
            probability = row.failure_probability,
            risk_level = %row.risk_level,
            "ingested simulated trade"
        );
        self.notify(
            NotificationLevel::Info,
            format!("{} scored {}", row.trade_id, row.risk_level),
        );
        AnalysisOutcome::Inserted(row)
    }

    /// Re-score the selected trade with its settlement instructions fixed.
    ///
    /// The target is the trade selected when the call is issued. If the
    /// operator selects another trade meanwhile, the result still lands on
    /// the original trade and the selection is left where the operator put it.
    pub async fn auto_correct(&self) -> AnalysisOutcome {
        let target_id = self.lock_feed().selected_id().map(str::to_string);
        let Some(target_id) = target_id else {
            return AnalysisOutcome::NoSelection;
        };

        let Some(_in_flight) = InFlight::claim(&self.analyzing) else {
            warn!(trade_id = %target_id, "auto-correct ignored: analysis already in flight");
            return AnalysisOutcome::Busy;
        };

        let request = corrected_trade_request();
        let prediction = match self.score(&request, "auto-correct").await {
            Ok(prediction) => prediction,
            Err(e) => return AnalysisOutcome::Failed(e.to_string()),
        };

        let merged = {
            let mut feed = self.lock_feed();
            let Some(current) = feed.get(&target_id) else {
                warn!(trade_id = %target_id, "corrected trade no longer in feed");
                return AnalysisOutcome::Failed(format!("trade {} no longer in feed", target_id));
            };
            let merged = current.merged_with(prediction);
            feed.update_by_key(&target_id, merged.clone());
            if feed.selected_id() != Some(target_id.as_str()) {
                info!(trade_id = %target_id, "selection moved during correction; leaving it");
            }
            merged
        };

        info!(
            trade_id = %merged.trade_id,
            probability = merged.failure_probability,
            risk_level = %merged.risk_level,
            "auto-corrected trade"
        );
        self.notify(
            NotificationLevel::Info,
            format!("{} re-scored {}", merged.trade_id, merged.risk_level),
        );
        AnalysisOutcome::Corrected(merged)
    }
}
