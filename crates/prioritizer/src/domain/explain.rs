//! Natural-language rationale for a score.

use crate::entities::{ScoreBreakdown, ScoringConfig};

/// Used when no other note applies
pub const FALLBACK_EXPLANATION: &str = "Balanced priority based on urgency and importance";

/// Joins notes in a fixed order: urgency, importance, quick win, dependents.
pub struct ExplanationBuilder<'a> {
    config: &'a ScoringConfig,
}

impl<'a> ExplanationBuilder<'a> {
    pub fn new(config: &'a ScoringConfig) -> Self {
        Self { config }
    }

    pub fn explain(&self, breakdown: &ScoreBreakdown) -> String {
        let reasons: Vec<String> = [
            self.urgency_note(breakdown.days_until_due),
            self.importance_note(breakdown.importance),
            self.effort_note(breakdown.effort),
            Self::dependency_note(breakdown.dependents),
        ]
        .into_iter()
        .flatten()
        .collect();

        if reasons.is_empty() {
            FALLBACK_EXPLANATION.to_string()
        } else {
            reasons.join("; ")
        }
    }

    fn urgency_note(&self, days: i64) -> Option<String> {
        match days {
            d if d < 0 => Some(format!("Overdue by {}", plural_days(-d))),
            0 => Some("Due today".to_string()),
            d if d <= self.config.due_soon_days => Some(format!("Due in {}", plural_days(d))),
            d if d < self.config.urgency_horizon_days => {
                Some(format!("Due later (in {})", plural_days(d)))
            }
            _ => None,
        }
    }

    fn importance_note(&self, importance: f64) -> Option<String> {
        if importance >= self.config.high_importance {
            Some("High importance".to_string())
        } else if importance <= self.config.low_importance {
            Some("Lower importance but balances workload".to_string())
        } else {
            None
        }
    }

    fn effort_note(&self, effort: f64) -> Option<String> {
        (effort >= self.config.quick_win_effort).then(|| "Quick win".to_string())
    }

    fn dependency_note(dependents: usize) -> Option<String> {
        match dependents {
            0 => None,
            1 => Some("Unblocks 1 other task".to_string()),
            n => Some(format!("Unblocks {n} other tasks")),
        }
    }
}

fn plural_days(days: i64) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{days} days")
    }
}
