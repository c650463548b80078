//! Domain facades and pipeline stages for task prioritization.
//!
//! `RankingDomain` drives the pipeline; the stage modules are public so each
//! can be used and tested on its own.

pub mod calendar;
mod config;
pub mod deps;
pub mod explain;
pub mod normalize;
mod ranking;
pub mod scoring;

pub use calendar::HolidayCalendar;
pub use config::ConfigDomain;
pub use deps::DependencyGraph;
pub use explain::ExplanationBuilder;
pub use normalize::{canonical_key, Normalizer};
pub use ranking::{local_today, RankingDomain};
pub use scoring::ScoreCalculator;
