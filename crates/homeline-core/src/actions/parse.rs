//! Planner output parsing
//!
//! The model is asked for a bare JSON array but often wraps it in a
//! markdown fence. Parsing strips the fence, then requires an array whose
//! every element is an object. Validation covers the whole array before any
//! action is returned, so a malformed tail never leaves a half-executed
//! batch behind.

use super::action::{classify_key, PlannerAction};
use serde_json::{Map, Value};
use thiserror::Error;

const FENCE: &str = "```";

/// Why planner output could not be turned into actions
#[derive(Debug, Error)]
pub enum PlanError {
    /// Not JSON at all
    #[error("invalid json: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Well-formed JSON whose top level is not an array
    #[error("expected a JSON array, found {0}")]
    NotAnArray(&'static str),

    /// An array element that is not an object
    #[error("entry {index} is {found}, expected an object")]
    EntryNotObject {
        /// Position in the array
        index: usize,
        /// JSON type found instead
        found: &'static str,
    },
}

/// Result of parsing one planner response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPlan {
    /// Actions in array order, then key order within each object
    pub actions: Vec<PlannerAction>,
    /// Keys that matched no action kind
    pub ignored_keys: Vec<String>,
    /// Array entries dropped past the action cap
    pub dropped_entries: usize,
}

/// Remove a surrounding markdown code fence, with or without a language tag
///
/// Text without a fence is returned trimmed.
#[must_use]
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix(FENCE) {
        text = match rest.split_once('\n') {
            Some((tag, body)) if is_language_tag(tag) => body,
            Some(_) => rest,
            None => rest.strip_prefix("json").unwrap_or(rest),
        };
    }

    let text = text.trim_end();
    text.strip_suffix(FENCE).unwrap_or(text).trim()
}

fn is_language_tag(line: &str) -> bool {
    line.trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn payload_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Parse raw planner output into ordered actions
///
/// At most `max_entries` array elements are turned into actions; the rest
/// are counted in `dropped_entries`. Non-string payloads are passed on as
/// their JSON text.
///
/// # Errors
///
/// Returns `PlanError` if the text is not JSON, not an array, or contains a
/// non-object element.
pub fn parse_plan(raw: &str, max_entries: usize) -> Result<ParsedPlan, PlanError> {
    let value: Value = serde_json::from_str(strip_code_fences(raw))?;

    let entries = match value {
        Value::Array(entries) => entries,
        other => return Err(PlanError::NotAnArray(json_type(&other))),
    };

    let objects: Vec<Map<String, Value>> = entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| match entry {
            Value::Object(map) => Ok(map),
            other => Err(PlanError::EntryNotObject {
                index,
                found: json_type(&other),
            }),
        })
        .collect::<Result<_, _>>()?;

    let mut plan = ParsedPlan {
        dropped_entries: objects.len().saturating_sub(max_entries),
        ..ParsedPlan::default()
    };

    for object in objects.into_iter().take(max_entries) {
        for (key, value) in object {
            let kinds = classify_key(&key);
            if kinds.is_empty() {
                plan.ignored_keys.push(key);
                continue;
            }
            let payload = payload_text(value);
            plan.actions
                .extend(kinds.into_iter().map(|kind| PlannerAction::new(kind, payload.clone())));
        }
    }

    Ok(plan)
}
