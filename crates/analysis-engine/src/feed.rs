//! Ordered list of scored trades plus the operator's selection.

use common::{Error, TradeRow};

/// Newest simulated trade sits at index 0. Updates happen in place and never
/// reorder the list. The selection is held by Trade_ID, so it survives rows
/// being inserted in front of it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeFeed {
    rows: Vec<TradeRow>,
    selected_id: Option<String>,
}

impl TradeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a feed; the first row (if any) becomes the selection.
    pub fn with_rows(rows: Vec<TradeRow>) -> Self {
        let selected_id = rows.first().map(|row| row.trade_id.clone());
        Self { rows, selected_id }
    }

    pub fn rows(&self) -> &[TradeRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn position(&self, trade_id: &str) -> Option<usize> {
        self.rows.iter().position(|row| row.trade_id == trade_id)
    }

    pub fn get(&self, trade_id: &str) -> Option<&TradeRow> {
        self.rows.iter().find(|row| row.trade_id == trade_id)
    }

    pub fn contains(&self, trade_id: &str) -> bool {
        self.position(trade_id).is_some()
    }

    /// Prepend without any duplicate check.
    pub fn insert_front(&mut self, row: TradeRow) {
        self.rows.insert(0, row);
    }

    /// Replace the first row keyed `trade_id`, keeping its index.
    /// Returns false (and changes nothing) when the key is absent.
    pub fn update_by_key(&mut self, trade_id: &str, row: TradeRow) -> bool {
        match self.position(trade_id) {
            Some(index) => {
                self.rows[index] = row;
                true
            }
            None => false,
        }
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn selected(&self) -> Option<&TradeRow> {
        self.selected_id.as_deref().and_then(|id| self.get(id))
    }

    /// Row-click selection. Unknown ids leave the selection unchanged.
    pub fn select(&mut self, trade_id: &str) -> Result<(), Error> {
        if !self.contains(trade_id) {
            return Err(Error::UnknownTrade(trade_id.to_string()));
        }
        self.selected_id = Some(trade_id.to_string());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected_id = None;
    }
}

#[cfg(test)]
mod tests {
    use common::ShapExplanation;

    use super::*;

    fn row(id: &str, probability: f64) -> TradeRow {
        TradeRow {
            trade_id: id.into(),
            asset_class: "FX".into(),
            counterparty: "JP Morgan".into(),
            failure_probability: probability,
            risk_level: "LOW".into(),
            shap_explanation: ShapExplanation::default(),
        }
    }

    fn ids(feed: &TradeFeed) -> Vec<&str> {
        feed.rows().iter().map(|r| r.trade_id.as_str()).collect()
    }

    #[test]
    fn test_insert_front_prepends() {
        let mut feed = TradeFeed::with_rows(vec![row("A", 0.1), row("B", 0.2)]);
        feed.insert_front(row("C", 0.3));

        assert_eq!(ids(&feed), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_insert_front_allows_duplicates() {
        let mut feed = TradeFeed::new();
        feed.insert_front(row("A", 0.1));
        feed.insert_front(row("A", 0.9));

        assert_eq!(feed.len(), 2);
        assert_eq!(feed.get("A").map(|r| r.failure_probability), Some(0.9));
    }

    #[test]
    fn test_update_by_key_keeps_position() {
        let mut feed = TradeFeed::with_rows(vec![row("A", 0.1), row("B", 0.2), row("C", 0.3)]);

        assert!(feed.update_by_key("B", row("B", 0.99)));
        assert_eq!(ids(&feed), vec!["A", "B", "C"]);
        assert_eq!(feed.rows()[1].failure_probability, 0.99);
    }

    #[test]
    fn test_update_by_missing_key_is_noop() {
        let mut feed = TradeFeed::with_rows(vec![row("A", 0.1)]);
        let before = feed.clone();

        assert!(!feed.update_by_key("Z", row("Z", 0.5)));
        assert_eq!(feed, before);
    }

    #[test]
    fn test_selection_follows_identity_not_index() {
        let mut feed = TradeFeed::with_rows(vec![row("A", 0.1), row("B", 0.2)]);
        feed.select("B").expect("B exists");
        feed.insert_front(row("C", 0.3));

        assert_eq!(feed.selected().map(|r| r.trade_id.as_str()), Some("B"));
    }

    #[test]
    fn test_select_unknown_keeps_selection() {
        let mut feed = TradeFeed::with_rows(vec![row("A", 0.1)]);

        assert!(matches!(feed.select("nope"), Err(Error::UnknownTrade(_))));
        assert_eq!(feed.selected_id(), Some("A"));
    }
}
