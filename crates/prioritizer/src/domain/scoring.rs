//! Weighted composite scoring.
//!
//! ```text
//! score = w.urgency    * urgency     (0-10, linear decay over the horizon)
//!       + w.importance * importance  (1-10, as normalized)
//!       + w.effort     * effort      (1-10, clamp(10 - hours))
//!       + w.dependency * dependents * increment
//! ```

use chrono::NaiveDate;

use super::normalize::{MAX_IMPORTANCE, MIN_IMPORTANCE};
use crate::entities::{NormalizedTask, ScoreBreakdown, ScoringConfig, WeightConfig};

/// Ceiling of the urgency and effort scales
pub const MAX_COMPONENT: f64 = 10.0;
/// Floor of the effort scale
pub const MIN_EFFORT: f64 = 1.0;

/// Scores tasks for one request.
pub struct ScoreCalculator<'a> {
    config: &'a ScoringConfig,
    weights: WeightConfig,
    today: NaiveDate,
}

impl<'a> ScoreCalculator<'a> {
    pub fn new(config: &'a ScoringConfig, weights: WeightConfig, today: NaiveDate) -> Self {
        Self {
            config,
            weights,
            today,
        }
    }

    /// 10 when due today or overdue, decaying linearly to 0 at the horizon.
    pub fn urgency(&self, days_until_due: i64) -> f64 {
        if days_until_due <= 0 {
            return MAX_COMPONENT;
        }
        if self.config.urgency_horizon_days <= 0 {
            return 0.0;
        }
        let remaining = 1.0 - days_until_due as f64 / self.config.urgency_horizon_days as f64;
        (MAX_COMPONENT * remaining).max(0.0)
    }

    /// Quick-win reward: `clamp(10 - hours, 1, 10)`.
    ///
    /// Non-increasing in `hours`; anything at or above nine hours sits on the floor.
    pub fn effort(estimated_hours: f64) -> f64 {
        (MAX_COMPONENT - estimated_hours.max(0.0)).clamp(MIN_EFFORT, MAX_COMPONENT)
    }

    /// Component values for a task with `dependents` downstream tasks.
    pub fn breakdown(&self, task: &NormalizedTask, dependents: usize) -> ScoreBreakdown {
        let days_until_due = (task.due_date - self.today).num_days();
        ScoreBreakdown {
            urgency: self.urgency(days_until_due),
            importance: task.importance.clamp(MIN_IMPORTANCE, MAX_IMPORTANCE),
            effort: Self::effort(task.estimated_hours),
            dependency: dependents as f64 * self.config.dependent_increment,
            dependents,
            days_until_due,
        }
    }

    /// Weighted sum of the components, rounded to two decimals.
    pub fn combine(&self, breakdown: &ScoreBreakdown) -> f64 {
        let w = &self.weights;
        let total = w.urgency * breakdown.urgency
            + w.importance * breakdown.importance
            + w.effort * breakdown.effort
            + w.dependency * breakdown.dependency;
        (total * 100.0).round() / 100.0
    }

    pub fn score(&self, task: &NormalizedTask, dependents: usize) -> (f64, ScoreBreakdown) {
        let breakdown = self.breakdown(task, dependents);
        (self.combine(&breakdown), breakdown)
    }
}
