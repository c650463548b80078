//! Per-component score multipliers.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Multiplier applied when a weight is absent or invalid
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Four non-negative multipliers, one per scoring component.
///
/// Decoding never fails: a missing, negative, non-finite or non-numeric
/// value falls back to [`DEFAULT_WEIGHT`] for that component. Each key is also
/// accepted with a `_weight` suffix; the plain name wins when both appear.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct WeightConfig {
    pub urgency: f64,
    pub importance: f64,
    pub effort: f64,
    pub dependency: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            urgency: DEFAULT_WEIGHT,
            importance: DEFAULT_WEIGHT,
            effort: DEFAULT_WEIGHT,
            dependency: DEFAULT_WEIGHT,
        }
    }
}

impl WeightConfig {
    /// Build a config, replacing invalid multipliers with the default
    pub fn new(urgency: f64, importance: f64, effort: f64, dependency: f64) -> Self {
        Self {
            urgency: sanitize("urgency", urgency),
            importance: sanitize("importance", importance),
            effort: sanitize("effort", effort),
            dependency: sanitize("dependency", dependency),
        }
    }

    /// Leniently decode a JSON object of weights.
    ///
    /// Anything that is not an object yields the defaults.
    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            if !value.is_null() {
                debug!(weights = %value, "Ignoring non-object weight configuration");
            }
            return Self::default();
        };

        let lookup = |name: &str| -> f64 {
            let raw = map
                .get(name)
                .filter(|v| !v.is_null())
                .or_else(|| map.get(&format!("{name}_weight")).filter(|v| !v.is_null()));

            match raw {
                None => DEFAULT_WEIGHT,
                Some(v) => match coerce(v) {
                    Some(w) => sanitize(name, w),
                    None => {
                        debug!(component = name, value = %v, "Non-numeric weight replaced with default");
                        DEFAULT_WEIGHT
                    }
                },
            }
        };

        Self {
            urgency: lookup("urgency"),
            importance: lookup("importance"),
            effort: lookup("effort"),
            dependency: lookup("dependency"),
        }
    }
}

impl From<Value> for WeightConfig {
    fn from(value: Value) -> Self {
        Self::from_value(&value)
    }
}

fn coerce(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn sanitize(component: &str, weight: f64) -> f64 {
    if weight.is_finite() && weight >= 0.0 {
        weight
    } else {
        debug!(component, weight, "Invalid weight replaced with default");
        DEFAULT_WEIGHT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_when_absent() {
        assert_eq!(WeightConfig::from_value(&Value::Null), WeightConfig::default());
        assert_eq!(WeightConfig::from_value(&json!({})), WeightConfig::default());
        assert_eq!(WeightConfig::from_value(&json!([1, 2])), WeightConfig::default());
    }

    #[test]
    fn test_suffix_aliases_and_numeric_strings() {
        let weights = WeightConfig::from_value(&json!({
            "urgency_weight": 0.5,
            "importance": "2",
            "effort_weight": "0",
            "dependency_weight": 3
        }));
        assert_eq!(weights, WeightConfig::new(0.5, 2.0, 0.0, 3.0));
    }

    #[test]
    fn test_plain_name_wins_over_suffix() {
        let weights = WeightConfig::from_value(&json!({
            "urgency": 2.0,
            "urgency_weight": 9.0
        }));
        assert!((weights.urgency - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_weights_fall_back_to_default() {
        let weights = WeightConfig::from_value(&json!({
            "urgency": -3,
            "importance": "heavy",
            "effort": true,
            "dependency": null
        }));
        assert_eq!(weights, WeightConfig::default());
        assert_eq!(WeightConfig::new(f64::NAN, -1.0, 0.0, f64::INFINITY).effort, 0.0);
        assert_eq!(WeightConfig::new(f64::NAN, -1.0, 0.0, f64::INFINITY).urgency, 1.0);
    }

    #[test]
    fn test_deserialize_via_serde() {
        let weights: WeightConfig = serde_json::from_value(json!({ "effort": 0 })).unwrap();
        assert_eq!(weights.effort, 0.0);
        assert_eq!(weights.urgency, 1.0);
    }
}
