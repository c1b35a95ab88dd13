// ABOUTME: Run input validation against an agent's input schema
// ABOUTME: Checks required keys, declared primitive types, and enums

use serde_json::{Map, Value};

/// Validate `input` against the JSON-Schema-like `schema` of an agent.
///
/// Only the subset the catalog uses is honoured: `required`, and per-property
/// `type` and `enum`. Unknown keywords are ignored. All violations are reported.
pub fn validate_input(schema: &Value, input: &Value) -> Result<(), Vec<String>> {
    let Some(fields) = input.as_object() else {
        return Err(vec!["input must be a JSON object".to_string()]);
    };

    let mut errors = Vec::new();

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for key in required.iter().filter_map(Value::as_str) {
            if fields.get(key).map_or(true, Value::is_null) {
                errors.push(format!("{} is required", key));
            }
        }
    }

    if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
        for (key, property) in properties {
            match fields.get(key) {
                Some(value) if !value.is_null() => check_property(key, property, value, &mut errors),
                _ => {}
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_property(key: &str, property: &Value, value: &Value, errors: &mut Vec<String>) {
    if let Some(declared) = property.get("type") {
        let types: Vec<&str> = match declared {
            Value::String(t) => vec![t.as_str()],
            Value::Array(list) => list.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        };
        if !types.is_empty() && !types.iter().any(|t| matches_type(t, value)) {
            errors.push(format!("{} must be of type {}", key, types.join(" or ")));
            return;
        }
    }

    if let Some(allowed) = property.get("enum").and_then(Value::as_array) {
        if !allowed.contains(value) {
            errors.push(format!("{} must be one of the allowed values", key));
        }
    }
}

fn matches_type(declared: &str, value: &Value) -> bool {
    match declared {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        // Unrecognised type names do not constrain the value
        _ => true,
    }
}

/// Missing run input is treated as an empty object
pub fn input_or_empty(input: Option<Value>) -> Value {
    input.unwrap_or_else(|| Value::Object(Map::new()))
}
