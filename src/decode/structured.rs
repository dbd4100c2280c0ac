use serde_json::Value;

use crate::decode::error::DecodeError;
use crate::decode::record::ActionRecord;

/// Body of a ```` ```json ```` fence, or the whole payload when unfenced.
pub fn strip_json_fence(payload: &str) -> &str {
    let body = payload.rsplit("```json").next().unwrap_or_default();
    body.split("```").next().unwrap_or_default().trim()
}

/// Decode a JSON document (fenced or bare) into wire records.
pub fn parse_json(payload: &str) -> Result<Vec<ActionRecord>, DecodeError> {
    let value: Value = serde_json::from_str(strip_json_fence(payload))
        .map_err(|e| DecodeError::MalformedJson(e.to_string()))?;
    into_records(value)
}

/// Decode a YAML document into wire records.
pub fn parse_yaml(payload: &str) -> Result<Vec<ActionRecord>, DecodeError> {
    let value: Value =
        serde_yaml::from_str(payload).map_err(|e| DecodeError::MalformedYaml(e.to_string()))?;
    into_records(value)
}

/// A single mapping is promoted to a one-element list.
fn into_records(value: Value) -> Result<Vec<ActionRecord>, DecodeError> {
    let items = match value {
        Value::Array(items) => items,
        obj @ Value::Object(_) => vec![obj],
        other => return Err(DecodeError::UnexpectedShape(kind_of(&other))),
    };

    Ok(items.into_iter().map(record_from_value).collect())
}

/// Items that do not fit the record shape keep whatever name they carry
/// and fail later as invalid actions.
fn record_from_value(item: Value) -> ActionRecord {
    let name = item
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    match serde_json::from_value::<ActionRecord>(item) {
        Ok(record) => record,
        Err(e) => {
            log::debug!("action item '{}' does not fit the record shape: {}", name, e);
            ActionRecord::named(&name)
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
