//! Input normalization: raw task records into validated `NormalizedTask`s.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate};
use serde_json::Value;
use tracing::debug;

use super::calendar::HolidayCalendar;
use crate::entities::{NormalizedTask, RawTask};
use crate::errors::{PrioritizerError, PrioritizerResult};

/// Importance bounds
pub const MIN_IMPORTANCE: f64 = 1.0;
pub const MAX_IMPORTANCE: f64 = 10.0;

/// Canonical form used for every reference match: trimmed and lowercased.
pub fn canonical_key(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Normalizes raw tasks against a fixed "today" and holiday calendar.
pub struct Normalizer<'a> {
    calendar: &'a HolidayCalendar,
    today: NaiveDate,
    default_importance: f64,
}

impl<'a> Normalizer<'a> {
    pub fn new(calendar: &'a HolidayCalendar, today: NaiveDate, default_importance: f64) -> Self {
        Self {
            calendar,
            today,
            default_importance: default_importance.clamp(MIN_IMPORTANCE, MAX_IMPORTANCE),
        }
    }

    /// Normalize a whole batch, assigning identifiers that are unique within it.
    ///
    /// The first malformed task aborts the batch.
    pub fn normalize_batch(&self, raw_tasks: &[RawTask]) -> PrioritizerResult<Vec<NormalizedTask>> {
        let mut taken = HashSet::new();
        let mut normalized = Vec::with_capacity(raw_tasks.len());

        for (position, raw) in raw_tasks.iter().enumerate() {
            let mut task = self.normalize(raw, position)?;

            let base = task.identifier.clone();
            let mut suffix = position + 1;
            while !taken.insert(canonical_key(&task.identifier)) {
                task.identifier = format!("{base}#{suffix}");
                suffix += 1;
            }

            normalized.push(task);
        }

        Ok(normalized)
    }

    /// Normalize a single task. The identifier is not yet deduplicated.
    pub fn normalize(&self, raw: &RawTask, position: usize) -> PrioritizerResult<NormalizedTask> {
        let title = parse_title(raw.title.as_ref(), position)?;
        let label = format!("'{title}'");

        let due_date = match raw.due_date.as_ref() {
            None | Some(Value::Null) => {
                return Err(PrioritizerError::malformed(&label, "due_date", "field is required"))
            }
            Some(value) => parse_due_date(value)
                .ok_or_else(|| {
                    PrioritizerError::malformed(&label, "due_date", "must be in YYYY-MM-DD format")
                })
                .map(|date| self.calendar.adjust_due_date(date, self.today))?,
        };

        let estimated_hours = match raw.estimated_hours.as_ref() {
            None | Some(Value::Null) => {
                return Err(PrioritizerError::malformed(
                    &label,
                    "estimated_hours",
                    "field is required",
                ))
            }
            Some(value) => match coerce_number(value) {
                Some(hours) if hours >= 0.0 => hours,
                Some(_) => {
                    return Err(PrioritizerError::malformed(
                        &label,
                        "estimated_hours",
                        "must not be negative",
                    ))
                }
                None => {
                    return Err(PrioritizerError::malformed(
                        &label,
                        "estimated_hours",
                        "must be a number",
                    ))
                }
            },
        };

        let importance = match raw.importance.as_ref().and_then(coerce_number) {
            Some(value) => value.clamp(MIN_IMPORTANCE, MAX_IMPORTANCE),
            None => {
                debug!(task = %title, "Importance missing or non-numeric, using default");
                self.default_importance
            }
        };

        let dependencies = parse_reference_list(raw.dependencies.as_ref(), &label, "dependencies")?;
        let dependency_refs = canonical_set(&dependencies);
        let aliases = canonical_set(&parse_reference_list(raw.aliases.as_ref(), &label, "aliases")?);

        let identifier = raw
            .id
            .as_ref()
            .and_then(scalar_text)
            .unwrap_or_else(|| title.clone());

        Ok(NormalizedTask {
            identifier,
            position,
            title,
            due_date,
            estimated_hours,
            importance,
            dependencies,
            dependency_refs,
            aliases,
        })
    }
}

fn parse_title(value: Option<&Value>, position: usize) -> PrioritizerResult<String> {
    let label = format!("#{}", position + 1);
    match value {
        None | Some(Value::Null) => Err(PrioritizerError::malformed(label, "title", "field is required")),
        Some(value) => match scalar_text(value) {
            Some(title) => Ok(title),
            None if value.is_string() => {
                Err(PrioritizerError::malformed(label, "title", "must not be empty"))
            }
            None => Err(PrioritizerError::malformed(label, "title", "must be a string")),
        },
    }
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (date part only).
fn parse_due_date(value: &Value) -> Option<NaiveDate> {
    let text = value.as_str()?.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
}

/// Numbers and numeric strings; non-finite values are rejected.
fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// Non-empty trimmed text of a string or number.
fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// A JSON array of strings/numbers or a comma-separated string; blanks are dropped.
fn parse_reference_list(
    value: Option<&Value>,
    label: &str,
    field: &str,
) -> PrioritizerResult<Vec<String>> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(s)) => Ok(s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()),
        Some(Value::Array(items)) => {
            let mut refs = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(_) | Value::Number(_) => refs.extend(scalar_text(item)),
                    _ => {
                        return Err(PrioritizerError::malformed(
                            label,
                            field,
                            "entries must be strings or numbers",
                        ))
                    }
                }
            }
            Ok(refs)
        }
        Some(_) => Err(PrioritizerError::malformed(
            label,
            field,
            "must be a list or a comma-separated string",
        )),
    }
}

/// Canonicalize and deduplicate, keeping first-seen order.
fn canonical_set(values: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .iter()
        .map(|v| canonical_key(v))
        .filter(|key| seen.insert(key.clone()))
        .collect()
}
