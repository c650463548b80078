#![warn(clippy::pedantic)]
// Allow common pedantic lints that don't affect correctness
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::similar_names)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::map_unwrap_or)]

//! # Prioritizer
//!
//! Scores and ranks a batch of tasks so the most pressing work comes first.
//!
//! This crate provides:
//! - Lenient decoding and normalization of loosely-typed task records
//! - Business-day aware urgency, importance, effort and dependency scoring
//! - Dependency cycle detection with human-readable cycle paths
//! - Ranked lists with per-task explanations
//! - CLI and HTTP server interfaces
//!
//! ## Example
//!
//! ```rust,ignore
//! use prioritizer::{RankingDomain, ScoringConfig, WeightConfig};
//!
//! let domain = RankingDomain::new(ScoringConfig::default())?;
//! let ranked = domain.analyze(&tasks, &WeightConfig::default(), today)?;
//! ```

// Core entities
pub mod entities;

// Error types
pub mod errors;

// Pipeline stages and facades
pub mod domain;

// Batch decoding
pub mod payload;

// Service configuration
pub mod config;

// HTTP server
pub mod server;

// Terminal UI helpers
pub mod ui;

// Re-export key types for convenience
pub use config::{LogFormat, ServerConfig};
pub use domain::{local_today, ConfigDomain, RankingDomain};
pub use entities::{
    CycleAnnotation, NormalizedTask, RawTask, ScoreBreakdown, ScoredTask, ScoringConfig,
    WeightConfig,
};
pub use errors::{PrioritizerError, PrioritizerResult};
pub use payload::{BatchQuery, TaskBatch};
pub use server::{build_router, run_server, AppState};
