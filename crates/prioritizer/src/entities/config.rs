//! Scoring configuration entities.

use serde::{Deserialize, Serialize};

/// Tunable constants of the scoring pipeline.
///
/// Every field has a default so a partial JSON file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Days over which urgency decays from 10 to 0
    #[serde(default = "default_urgency_horizon_days")]
    pub urgency_horizon_days: i64,

    /// Score added per task that directly depends on the scored one
    #[serde(default = "default_dependent_increment")]
    pub dependent_increment: f64,

    /// Window (days) in which a deadline is reported as "Due in N days"
    #[serde(default = "default_due_soon_days")]
    pub due_soon_days: i64,

    /// Importance at or above which "High importance" is reported
    #[serde(default = "default_high_importance")]
    pub high_importance: f64,

    /// Importance at or below which "Lower importance" is reported
    #[serde(default = "default_low_importance")]
    pub low_importance: f64,

    /// Effort component at or above which a task counts as a quick win
    #[serde(default = "default_quick_win_effort")]
    pub quick_win_effort: f64,

    /// Importance used when the supplied value is missing or non-numeric
    #[serde(default = "default_importance")]
    pub default_importance: f64,

    /// Number of tasks returned by suggest when the caller gives no limit
    #[serde(default = "default_suggest_limit")]
    pub suggest_limit: usize,

    /// Non-working days: recurring `MM-DD` or one-off `YYYY-MM-DD`
    #[serde(default = "default_holidays")]
    pub holidays: Vec<String>,
}

const fn default_urgency_horizon_days() -> i64 {
    30
}

const fn default_dependent_increment() -> f64 {
    2.0
}

const fn default_due_soon_days() -> i64 {
    3
}

const fn default_high_importance() -> f64 {
    7.0
}

const fn default_low_importance() -> f64 {
    3.0
}

const fn default_quick_win_effort() -> f64 {
    8.0
}

const fn default_importance() -> f64 {
    5.0
}

const fn default_suggest_limit() -> usize {
    3
}

fn default_holidays() -> Vec<String> {
    // New Year's Day, Independence Day, Christmas Day
    vec!["01-01".to_string(), "07-04".to_string(), "12-25".to_string()]
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            urgency_horizon_days: default_urgency_horizon_days(),
            dependent_increment: default_dependent_increment(),
            due_soon_days: default_due_soon_days(),
            high_importance: default_high_importance(),
            low_importance: default_low_importance(),
            quick_win_effort: default_quick_win_effort(),
            default_importance: default_importance(),
            suggest_limit: default_suggest_limit(),
            holidays: default_holidays(),
        }
    }
}

impl ScoringConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }
}
