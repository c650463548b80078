//! Task records at each stage of the scoring pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Task as supplied by the caller.
///
/// Every field is loosely typed: numbers may arrive as strings, dependencies
/// as an array or a comma-separated string. Nothing is validated until the
/// record goes through the normalizer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTask {
    /// Optional explicit identifier (string or number)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,

    /// ISO calendar date (`YYYY-MM-DD`) or RFC 3339 timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<Value>,

    /// Intended range 1-10
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<Value>,

    /// References to other tasks by id, title or alias
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Value>,

    /// Additional names other tasks may use to reference this one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aliases: Option<Value>,
}

impl RawTask {
    /// Create a raw task with the required fields set
    pub fn new(title: impl Into<String>, due_date: NaiveDate, estimated_hours: f64) -> Self {
        Self {
            title: Some(Value::String(title.into())),
            due_date: Some(Value::String(due_date.format("%Y-%m-%d").to_string())),
            estimated_hours: Some(Value::from(estimated_hours)),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(Value::String(id.into()));
        self
    }

    pub fn with_importance(mut self, importance: f64) -> Self {
        self.importance = Some(Value::from(importance));
        self
    }

    pub fn with_dependencies(mut self, deps: &[&str]) -> Self {
        self.dependencies = Some(Value::from(deps.to_vec()));
        self
    }

    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = Some(Value::from(aliases.to_vec()));
        self
    }
}

/// Validated, immutable view of a task used by every later stage.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTask {
    /// Synthetic identifier, unique within the batch
    pub identifier: String,

    /// Zero-based position in the submitted batch
    pub position: usize,

    pub title: String,

    /// Due date after the business-day shift
    pub due_date: NaiveDate,

    /// Always `>= 0`
    pub estimated_hours: f64,

    /// Always within `[1, 10]`
    pub importance: f64,

    /// Dependencies as supplied (trimmed), echoed back in the output
    pub dependencies: Vec<String>,

    /// Canonical (trimmed, lowercased, deduplicated) dependency references
    pub dependency_refs: Vec<String>,

    /// Canonical declared aliases
    pub aliases: Vec<String>,
}

/// Marks a task that participates in a dependency cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleAnnotation {
    /// Titles along the cycle, first title repeated at the end
    pub path: Vec<String>,
}

impl CycleAnnotation {
    pub fn new(path: Vec<String>) -> Self {
        Self { path }
    }

    /// Human-readable warning attached to every task on the cycle
    pub fn message(&self) -> String {
        format!("Circular dependency detected between {}", self.path.join(" -> "))
    }
}

impl std::fmt::Display for CycleAnnotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.join(" -> "))
    }
}

/// Raw component values behind a score. Never serialized.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreBreakdown {
    /// 0-10
    pub urgency: f64,
    /// 1-10
    pub importance: f64,
    /// 1-10
    pub effort: f64,
    /// `dependents * increment`, unbounded
    pub dependency: f64,
    /// Number of other tasks that directly depend on this one
    pub dependents: usize,
    /// Negative when overdue
    pub days_until_due: i64,
}

/// Ranked output record.
///
/// Only the caller-facing fields are serialized; the component breakdown and
/// cycle path stay internal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredTask {
    pub title: String,

    #[serde(with = "iso_date")]
    pub due_date: NaiveDate,

    pub estimated_hours: f64,

    pub importance: f64,

    pub dependencies: Vec<String>,

    pub score: f64,

    pub explanation: String,

    pub circular: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub circular_message: Option<String>,

    #[serde(skip)]
    pub cycle: Option<CycleAnnotation>,

    #[serde(skip)]
    pub breakdown: ScoreBreakdown,
}

impl ScoredTask {
    /// Assemble the output record for a normalized task
    pub fn from_parts(
        task: &NormalizedTask,
        score: f64,
        breakdown: ScoreBreakdown,
        explanation: String,
        cycle: Option<CycleAnnotation>,
    ) -> Self {
        Self {
            title: task.title.clone(),
            due_date: task.due_date,
            estimated_hours: task.estimated_hours,
            importance: task.importance,
            dependencies: task.dependencies.clone(),
            score,
            explanation,
            circular: cycle.is_some(),
            circular_message: cycle.as_ref().map(CycleAnnotation::message),
            cycle,
            breakdown,
        }
    }
}

mod iso_date {
    use chrono::NaiveDate;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format("%Y-%m-%d"))
    }
}
