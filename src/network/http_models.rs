use crate::error::{Result, RosterError};
use crate::projection::Projection;
use crate::types::{FrequencyEntry, Record, Value};
use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use std::collections::HashMap;

// --- Response envelope ---
// Every response is a JSON object with a "type" of "success" or "error".
// Errors carry a human-readable reason; write successes carry an empty one.

#[derive(Serialize)]
pub struct ApiResponse {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonValue>,
}

impl ApiResponse {
    pub fn success(data: JsonValue) -> Self {
        Self {
            kind: "success",
            reason: String::new(),
            data: Some(data),
        }
    }

    /// A bare success for write operations, no payload.
    pub fn ok() -> Self {
        Self {
            kind: "success",
            reason: String::new(),
            data: None,
        }
    }

    pub fn error(reason: impl Into<String>) -> Self {
        Self {
            kind: "error",
            reason: reason.into(),
            data: None,
        }
    }
}

// --- Data Conversion Functions ---

/// Converts a `Record` into a client-friendly `serde_json::Value`. The id is
/// stripped: clients address records by id but payloads never echo it.
pub fn record_to_json(record: &Record) -> JsonValue {
    let mut map = serde_json::Map::new();
    for (key, value) in &record.data {
        map.insert(key.clone(), value_to_json(value));
    }
    JsonValue::Object(map)
}

/// Renders a projected field map (a basic view) as a JSON object.
pub fn view_to_json(view: &HashMap<String, Value>) -> JsonValue {
    let map = view
        .iter()
        .map(|(k, v)| (k.clone(), value_to_json(v)))
        .collect();
    JsonValue::Object(map)
}

/// Renders a specific-field projection: ethnicity as an array of category
/// names, degree as an object of its non-empty components, anything else as
/// the raw value.
pub fn projection_to_json(projection: &Projection) -> JsonValue {
    match projection {
        Projection::Ethnicity(categories) => json!(categories),
        Projection::Degree(components) => {
            let map = components
                .iter()
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect();
            JsonValue::Object(map)
        }
        Projection::Raw(value) => value_to_json(value),
    }
}

/// Renders a frequency report as `{value: {frequency, percentage}, ...}`.
pub fn frequency_to_json(report: &HashMap<String, FrequencyEntry>) -> JsonValue {
    let map = report
        .iter()
        .map(|(key, entry)| {
            (
                key.clone(),
                json!({
                    "frequency": entry.frequency,
                    "percentage": entry.percentage,
                }),
            )
        })
        .collect();
    JsonValue::Object(map)
}

/// Recursively converts an internal `Value` into a `serde_json::Value`.
pub fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::String(s) => json!(s),
        Value::Int(i) => json!(i),
        Value::Float(f) => json!(f),
        Value::Bool(b) => json!(b),
        Value::Array(arr) => JsonValue::Array(arr.iter().map(value_to_json).collect()),
        Value::Object(obj) => {
            let map = obj
                .iter()
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect();
            JsonValue::Object(map)
        }
    }
}

/// Converts an incoming `serde_json::Value` (a request's userdata) into the
/// `HashMap<String, Value>` that `insert_record` expects. Client-provided ids
/// are ignored; the store assigns its own.
pub fn json_to_insert_data(json: JsonValue) -> Result<HashMap<String, Value>> {
    let map = json.as_object().ok_or(RosterError::InvalidUserData)?;

    let mut result = HashMap::new();
    for (key, value) in map {
        if key.to_lowercase() == "id" {
            continue;
        }
        result.insert(key.clone(), json_to_value(value)?);
    }
    Ok(result)
}

/// Recursively converts a `serde_json::Value` into an internal `Value`.
pub fn json_to_value(json_value: &JsonValue) -> Result<Value> {
    match json_value {
        JsonValue::Null => Ok(Value::Null),
        JsonValue::Bool(b) => Ok(Value::Bool(*b)),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Value::Float(f))
            } else {
                Err(RosterError::InvalidValue)
            }
        }
        JsonValue::String(s) => Ok(Value::String(s.clone())),
        JsonValue::Array(arr) => {
            let mut values = Vec::new();
            for item in arr {
                values.push(json_to_value(item)?);
            }
            Ok(Value::Array(values))
        }
        JsonValue::Object(obj) => {
            let mut map = HashMap::new();
            for (k, v) in obj {
                map.insert(k.clone(), json_to_value(v)?);
            }
            Ok(Value::Object(map))
        }
    }
}

/// Interprets a raw query-parameter value: JSON scalars ("2021", "true")
/// become typed values so they match typed record fields, anything else is a
/// plain string.
pub fn parse_param_value(raw: &str) -> Value {
    match serde_json::from_str::<JsonValue>(raw) {
        Ok(parsed) => json_to_value(&parsed).unwrap_or_else(|_| Value::String(raw.to_string())),
        Err(_) => Value::String(raw.to_string()),
    }
}
