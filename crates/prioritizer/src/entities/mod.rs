//! Core data structures for task prioritization.

mod config;
mod task;
mod weights;

pub use config::ScoringConfig;
pub use task::{CycleAnnotation, NormalizedTask, RawTask, ScoreBreakdown, ScoredTask};
pub use weights::{WeightConfig, DEFAULT_WEIGHT};
