pub mod client;
pub mod error;

pub use client::{ScoringClient, ScoringService};
pub use error::ScoringError;
