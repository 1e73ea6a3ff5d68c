//! Lenient numeric deserializers for the dashboard's hand-edited data files
//!
//! The JSON documents carry numbers, numeric strings, nulls and the odd
//! placeholder text in numeric slots. These helpers turn that into typed
//! values at the load boundary so the formulas never see malformed input.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn coerce(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|x| x.is_finite())
}

/// JSON number only; anything else (including numeric strings) is `None`
pub fn finite_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(Value::as_f64)
        .filter(|x| x.is_finite()))
}

/// JSON number strictly greater than zero, otherwise `None`
pub fn positive_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(finite_number(deserializer)?.filter(|x| *x > 0.0))
}

/// Number or numeric string; missing and malformed values read as zero
pub fn number_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce).unwrap_or(0.0))
}

/// String-keyed map of numbers, malformed entries read as zero
pub fn number_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .map(|(key, value)| {
            let number = coerce(&value).unwrap_or(0.0);
            (key, number)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "positive_number")]
        positive: Option<f64>,
        #[serde(default, deserialize_with = "number_or_zero")]
        lenient: f64,
        #[serde(default, deserialize_with = "number_map")]
        map: BTreeMap<String, f64>,
    }

    fn sample(json: &str) -> Sample {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_positive_number_rejects_non_positive_and_text() {
        assert_eq!(sample(r#"{"positive": 0.25}"#).positive, Some(0.25));
        assert_eq!(sample(r#"{"positive": 0}"#).positive, None);
        assert_eq!(sample(r#"{"positive": -3}"#).positive, None);
        assert_eq!(sample(r#"{"positive": "12"}"#).positive, None);
        assert_eq!(sample(r#"{"positive": null}"#).positive, None);
        assert_eq!(sample("{}").positive, None);
    }

    #[test]
    fn test_number_or_zero_accepts_numeric_strings() {
        assert_eq!(sample(r#"{"lenient": "1500.5"}"#).lenient, 1500.5);
        assert_eq!(sample(r#"{"lenient": 42}"#).lenient, 42.0);
        assert_eq!(sample(r#"{"lenient": "n/a"}"#).lenient, 0.0);
        assert_eq!(sample(r#"{"lenient": null}"#).lenient, 0.0);
        assert_eq!(sample("{}").lenient, 0.0);
    }

    #[test]
    fn test_number_map_zeroes_malformed_entries() {
        let p = sample(r#"{"map": {"green": 40, "water": "10", "mixed": null, "residential": []}}"#);
        assert_eq!(p.map["green"], 40.0);
        assert_eq!(p.map["water"], 10.0);
        assert_eq!(p.map["mixed"], 0.0);
        assert_eq!(p.map["residential"], 0.0);
    }
}
