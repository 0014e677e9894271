//! Display-side risk derivations.
//!
//! Everything here is a pure function of the trade data and is recomputed on
//! every render; nothing is cached.

pub mod classifier;
pub mod ranker;
pub mod views;

pub use classifier::{classify, clamp_probability, gauge_rotation_degrees, RiskTier};
pub use ranker::{
    rank_attributions, rank_attributions_top, Attribution, AttributionSign, ATTRIBUTION_TOP_K,
};
pub use views::{
    chart_bars, format_probability, ChartBar, FeedColumn, FeedRowView, FeedView, GaugeView,
    SortDirection,
};
