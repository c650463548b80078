//! Ranking domain facade.
//!
//! Sequences normalization, dependency resolution, cycle detection, scoring
//! and explanation for one batch. Pure: the result depends only on the
//! tasks, the weights and the supplied `today`.

use chrono::{Local, NaiveDate};
use tracing::debug;

use super::calendar::HolidayCalendar;
use super::deps::DependencyGraph;
use super::explain::ExplanationBuilder;
use super::normalize::Normalizer;
use super::scoring::ScoreCalculator;
use crate::entities::{RawTask, ScoredTask, ScoringConfig, WeightConfig};
use crate::errors::PrioritizerResult;

/// Current date in the server's local time zone.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Ranking domain facade providing the analyze and suggest operations
#[derive(Debug, Clone)]
pub struct RankingDomain {
    config: ScoringConfig,
    calendar: HolidayCalendar,
}

impl RankingDomain {
    /// Create a ranking domain, validating the configured holidays
    pub fn new(config: ScoringConfig) -> PrioritizerResult<Self> {
        let calendar = HolidayCalendar::from_entries(&config.holidays)?;
        Ok(Self { config, calendar })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score every task and sort by descending score.
    ///
    /// Ties keep input order. Fails only when a task is malformed.
    pub fn analyze(
        &self,
        raw_tasks: &[RawTask],
        weights: &WeightConfig,
        today: NaiveDate,
    ) -> PrioritizerResult<Vec<ScoredTask>> {
        let normalizer = Normalizer::new(&self.calendar, today, self.config.default_importance);
        let tasks = normalizer.normalize_batch(raw_tasks)?;

        let graph = DependencyGraph::build(&tasks);
        let cycles = graph.detect_cycles(&tasks);

        let calculator = ScoreCalculator::new(&self.config, *weights, today);
        let explainer = ExplanationBuilder::new(&self.config);

        let mut scored: Vec<ScoredTask> = tasks
            .iter()
            .zip(cycles)
            .enumerate()
            .map(|(idx, (task, cycle))| {
                let (score, breakdown) = calculator.score(task, graph.dependent_count(idx));
                let explanation = explainer.explain(&breakdown);
                ScoredTask::from_parts(task, score, breakdown, explanation, cycle)
            })
            .collect();

        // Vec::sort_by is stable
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));

        debug!(
            tasks = scored.len(),
            circular = scored.iter().filter(|t| t.circular).count(),
            %today,
            "Ranked task batch"
        );

        Ok(scored)
    }

    /// The first `limit` entries of [`RankingDomain::analyze`].
    ///
    /// `None` uses the configured default (3).
    pub fn suggest(
        &self,
        raw_tasks: &[RawTask],
        weights: &WeightConfig,
        today: NaiveDate,
        limit: Option<usize>,
    ) -> PrioritizerResult<Vec<ScoredTask>> {
        let mut ranked = self.analyze(raw_tasks, weights, today)?;
        ranked.truncate(limit.unwrap_or(self.config.suggest_limit));
        Ok(ranked)
    }
}
