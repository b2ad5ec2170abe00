// src/common/utils.rs
use serde::de::DeserializeOwned;
use serde_json::Value;

// Parse an optional numeric field, keeping only finite values above zero
pub fn positive_f64(value: Option<&str>) -> Option<f64> {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v > 0.0)
}

// Read a JSON string or number as a finite positive f64
pub fn value_f64(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::String(s) => positive_f64(Some(s.as_str())),
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite() && *v > 0.0),
        _ => None,
    }
}

// Deserialize each row on its own, skipping the ones with an unexpected shape
pub fn parse_rows<T: DeserializeOwned>(rows: Vec<Value>) -> Vec<T> {
    rows.into_iter()
        .filter_map(|row| serde_json::from_value(row).ok())
        .collect()
}
