//! Tolerant fare extraction from predictor responses

use serde::Serialize;
use serde_json::Value;

/// Output keys accepted from the predictor, in lookup order
pub const FARE_RESPONSE_KEYS: [&str; 4] = ["fare", "prediction", "pred", "y_pred"];

/// A fare found in a predictor response
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExtractedFare {
    /// Key the value was read from
    pub key: &'static str,
    /// Fare amount
    pub amount: f64,
}

/// Find the first usable fare under one of [`FARE_RESPONSE_KEYS`]
///
/// A key counts when its value is a finite number, a numeric string, or a
/// one-element array holding either. Null or non-numeric values are skipped
/// and the next key is tried. Non-object bodies yield `None`.
#[must_use]
pub fn extract_fare(body: &Value) -> Option<ExtractedFare> {
    let object = body.as_object()?;

    FARE_RESPONSE_KEYS.iter().find_map(|&key| {
        object
            .get(key)
            .and_then(numeric_value)
            .map(|amount| ExtractedFare { key, amount })
    })
}

fn numeric_value(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Array(items) if items.len() == 1 => return numeric_value(&items[0]),
        _ => None,
    }?;

    amount.is_finite().then_some(amount)
}
