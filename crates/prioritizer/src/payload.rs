//! Decoding of task batches from request bodies and query strings.
//!
//! Transport-agnostic: callers hand over the raw body JSON and/or the raw
//! query parameters and get back a [`TaskBatch`].

use serde::Deserialize;
use serde_json::Value;

use crate::entities::{RawTask, WeightConfig};
use crate::errors::{PrioritizerError, PrioritizerResult};

const PAYLOAD_SHAPE: &str = "Payload must be a list of tasks or include a 'tasks' array.";

/// Query-string encoding of a batch: every value is itself JSON text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchQuery {
    /// JSON array of tasks (or a `{ "tasks": [...] }` envelope)
    #[serde(default)]
    pub tasks: Option<String>,

    /// JSON object of weights
    #[serde(default)]
    pub weights: Option<String>,

    /// Number of suggestions to return
    #[serde(default)]
    pub limit: Option<usize>,
}

/// A decoded batch ready for ranking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskBatch {
    pub tasks: Vec<RawTask>,
    pub weights: WeightConfig,
    pub limit: Option<usize>,
}

impl TaskBatch {
    /// Decode a bare task array or a `{ "tasks", "weights", "limit" }` envelope.
    pub fn from_json(value: Value) -> PrioritizerResult<Self> {
        let (tasks, weights, limit) = decode_envelope(value)?;
        Ok(Self {
            tasks,
            weights: weights.unwrap_or_default(),
            limit,
        })
    }

    /// Decode a request body; an empty or whitespace-only body is `None`.
    pub fn from_body(body: &[u8]) -> PrioritizerResult<Option<Self>> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        let value: Value = serde_json::from_slice(body)?;
        Self::from_json(value).map(Some)
    }

    /// Combine query and body encodings.
    ///
    /// Query parameters take precedence field by field: `tasks` from the
    /// query replaces the body's tasks, and likewise for `weights` and
    /// `limit`. Returns `None` when neither source carries tasks.
    pub fn resolve(query: &BatchQuery, body: &[u8]) -> PrioritizerResult<Option<Self>> {
        let from_body = Self::from_body(body)?;

        let mut batch = match query.tasks.as_deref() {
            Some(text) => {
                let (tasks, weights, limit) = decode_envelope(parse_query_json(text, "tasks")?)?;
                let body_weights = from_body.as_ref().map(|b| b.weights);
                let body_limit = from_body.as_ref().and_then(|b| b.limit);
                Self {
                    tasks,
                    weights: weights.or(body_weights).unwrap_or_default(),
                    limit: limit.or(body_limit),
                }
            }
            None => match from_body {
                Some(batch) => batch,
                None => return Ok(None),
            },
        };

        if let Some(text) = query.weights.as_deref() {
            batch.weights = WeightConfig::from_value(&parse_query_json(text, "weights")?);
        }
        if query.limit.is_some() {
            batch.limit = query.limit;
        }

        Ok(Some(batch))
    }
}

/// Tasks plus the weights and limit, when the envelope carries them.
type Envelope = (Vec<RawTask>, Option<WeightConfig>, Option<usize>);

fn decode_envelope(value: Value) -> PrioritizerResult<Envelope> {
    match value {
        Value::Array(items) => Ok((decode_tasks(items)?, None, None)),
        Value::Object(mut map) => {
            let Some(Value::Array(items)) = map.remove("tasks") else {
                return Err(invalid(PAYLOAD_SHAPE));
            };
            let weights = map
                .get("weights")
                .filter(|v| !v.is_null())
                .map(WeightConfig::from_value);
            let limit = map
                .get("limit")
                .and_then(Value::as_u64)
                .and_then(|n| usize::try_from(n).ok());
            Ok((decode_tasks(items)?, weights, limit))
        }
        _ => Err(invalid(PAYLOAD_SHAPE)),
    }
}

fn decode_tasks(items: Vec<Value>) -> PrioritizerResult<Vec<RawTask>> {
    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            if !item.is_object() {
                return Err(invalid(format!("Task #{} must be an object.", idx + 1)));
            }
            serde_json::from_value(item).map_err(|e| invalid(format!("Task #{}: {e}", idx + 1)))
        })
        .collect()
}

fn parse_query_json(text: &str, param: &str) -> PrioritizerResult<Value> {
    serde_json::from_str(text)
        .map_err(|_| invalid(format!("Invalid JSON supplied in '{param}' query parameter.")))
}

fn invalid(reason: impl Into<String>) -> PrioritizerError {
    PrioritizerError::InvalidPayload {
        reason: reason.into(),
    }
}
