//! Conversion of (Extended) JSON documents into status trees.
//!
//! Captured status documents are usually written by the shell in canonical
//! or relaxed Extended JSON, where 64-bit counters look like
//! `{"$numberLong": "9000000000"}`.

use serde_json::{Map, Value};
use serverstat_types::{StatusTree, StatusValue};

use crate::error::SourceError;

/// Parse a JSON status document.
pub fn parse_status(json: &str) -> Result<StatusTree, SourceError> {
    let value: Value = serde_json::from_str(json)?;
    status_from_json(value)
}

/// Convert a JSON value into a status tree. The value must be an object.
pub fn status_from_json(value: Value) -> Result<StatusTree, SourceError> {
    match value {
        Value::Object(map) => document(map),
        other => Err(SourceError::Parse(format!(
            "status document must be an object, got {}",
            kind(&other)
        ))),
    }
}

fn document(map: Map<String, Value>) -> Result<StatusTree, SourceError> {
    map.into_iter()
        .map(|(name, value)| Ok((name, convert(value)?)))
        .collect()
}

fn convert(value: Value) -> Result<StatusValue, SourceError> {
    Ok(match value {
        Value::Null => StatusValue::Null,
        Value::Bool(b) => StatusValue::Bool(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => StatusValue::Int(i),
            None => StatusValue::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => StatusValue::Text(s),
        Value::Array(items) => {
            StatusValue::Array(items.into_iter().map(convert).collect::<Result<_, _>>()?)
        }
        Value::Object(map) => match wrapper(&map) {
            Some((tag, inner)) => extended(tag, inner)?,
            None => StatusValue::Document(document(map)?),
        },
    })
}

/// The `$`-tag and payload of a single-key Extended JSON wrapper.
fn wrapper(map: &Map<String, Value>) -> Option<(&str, &Value)> {
    if map.len() != 1 {
        return None;
    }
    let (tag, inner) = map.iter().next()?;
    tag.starts_with('$').then_some((tag.as_str(), inner))
}

fn extended(tag: &str, inner: &Value) -> Result<StatusValue, SourceError> {
    let value = match (tag, inner) {
        ("$numberLong", Value::String(s)) => StatusValue::Long(parse_number(tag, s)?),
        ("$numberLong", Value::Number(n)) => StatusValue::Long(integer(tag, n)?),
        ("$numberInt", Value::String(s)) => StatusValue::Int(parse_number(tag, s)?),
        ("$numberInt", Value::Number(n)) => StatusValue::Int(integer(tag, n)?),
        ("$numberDouble", Value::String(s)) => StatusValue::Float(parse_number(tag, s)?),
        ("$numberDouble", Value::Number(n)) => {
            StatusValue::Float(n.as_f64().unwrap_or(f64::NAN))
        }
        ("$date", Value::String(s)) => StatusValue::Text(s.clone()),
        ("$date", Value::Number(n)) => StatusValue::Text(n.to_string()),
        ("$date", Value::Object(map)) => match wrapper(map) {
            Some(("$numberLong", Value::String(s))) => StatusValue::Text(s.clone()),
            _ => return Err(malformed(tag, inner)),
        },
        ("$numberLong" | "$numberInt" | "$numberDouble" | "$date", _) => {
            return Err(malformed(tag, inner))
        }
        // Other tags ($oid, $timestamp, ...) are kept as plain documents.
        _ => {
            let mut tree = StatusTree::new();
            tree.insert(tag, convert(inner.clone())?);
            StatusValue::Document(tree)
        }
    };
    Ok(value)
}

fn parse_number<T: std::str::FromStr>(tag: &str, s: &str) -> Result<T, SourceError> {
    s.parse()
        .map_err(|_| SourceError::Parse(format!("invalid {} value '{}'", tag, s)))
}

fn integer(tag: &str, n: &serde_json::Number) -> Result<i64, SourceError> {
    n.as_i64()
        .ok_or_else(|| SourceError::Parse(format!("invalid {} value {}", tag, n)))
}

fn malformed(tag: &str, inner: &Value) -> SourceError {
    SourceError::Parse(format!("malformed {} wrapper: {}", tag, inner))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
