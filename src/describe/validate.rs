// Normalize a parsed model document into the response shape.
// Clamps sizes, defaults missing fields, rejects empty extractions.

use serde_json::Value;

use super::parser::RawModelDoc;
use super::sanitize::{clean_text, is_garbage};
use super::types::{ExampleSet, RequestExample, ResponseExample};
use super::DescribeError;

/// Maximum notes kept from a model response.
pub const MAX_NOTES: usize = 3;

/// Maximum length of one note (characters).
pub const MAX_NOTE_LENGTH: usize = 220;

/// Maximum request examples kept from a model response.
pub const MAX_EXAMPLE_REQUESTS: usize = 2;

/// Usable content extracted from a model response.
#[derive(Debug, Clone)]
pub struct ValidatedDoc {
    pub medium_description: String,
    pub notes: Vec<String>,
    pub examples: Option<ExampleSet>,
}

/// Validate and normalize a raw model document.
///
/// The description is cleaned and dropped when it fails the garbage check;
/// notes and examples are clamped and coerced. An extraction with nothing
/// usable left is an error so the caller can fall back.
pub fn validate_model_doc(raw: RawModelDoc) -> Result<ValidatedDoc, DescribeError> {
    let medium = raw
        .medium_description
        .as_deref()
        .map(clean_text)
        .filter(|m| !is_garbage(m))
        .unwrap_or_default();

    let notes = sanitize_notes(raw.notes.as_ref());
    let examples = coerce_examples(raw.examples.as_ref());

    if medium.is_empty() && notes.is_empty() && examples.is_none() {
        return Err(DescribeError::UnusableOutput(
            "no usable fields extracted".into(),
        ));
    }

    Ok(ValidatedDoc {
        medium_description: medium,
        notes,
        examples,
    })
}

/// Clamp notes to at most `MAX_NOTES` non-empty strings of at most
/// `MAX_NOTE_LENGTH` characters (ellipsis on truncation).
pub fn sanitize_notes(raw: Option<&Value>) -> Vec<String> {
    let items = match raw.and_then(Value::as_array) {
        Some(arr) => arr,
        None => return Vec::new(),
    };

    let mut out = Vec::new();
    for item in items.iter().take(MAX_NOTES) {
        let text = match item {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => continue,
        };
        let cleaned = clean_text(&text);
        if cleaned.is_empty() {
            continue;
        }
        if cleaned.chars().count() > MAX_NOTE_LENGTH {
            let cut: String = cleaned.chars().take(MAX_NOTE_LENGTH).collect();
            out.push(format!("{cut}…"));
        } else {
            out.push(cleaned);
        }
    }
    out
}

/// Coerce a loosely-shaped `examples` value into `ExampleSet`.
///
/// Expected shape: `{"requests": [{"curl": "..."}], "response": {"status": n,
/// "body": {...}}}`. Requests accept bare strings too; the response status
/// defaults to 200 and the body to an empty object. A non-object input
/// yields `None`.
pub fn coerce_examples(raw: Option<&Value>) -> Option<ExampleSet> {
    let map = raw?.as_object()?;

    let mut requests = Vec::new();
    if let Some(reqs) = map.get("requests").and_then(Value::as_array) {
        for r in reqs {
            if requests.len() >= MAX_EXAMPLE_REQUESTS {
                break;
            }
            let curl = match r {
                Value::Object(o) => o.get("curl").and_then(Value::as_str),
                Value::String(s) => Some(s.as_str()),
                _ => None,
            };
            if let Some(c) = curl.map(str::trim).filter(|c| !c.is_empty()) {
                requests.push(RequestExample {
                    curl: c.to_string(),
                });
            }
        }
    }

    let resp = map.get("response");
    let status = resp
        .and_then(|r| r.get("status"))
        .and_then(coerce_status)
        .unwrap_or(200);
    let body = resp
        .and_then(|r| r.get("body"))
        .filter(|b| b.is_object())
        .cloned()
        .unwrap_or_else(|| Value::Object(Default::default()));

    Some(ExampleSet {
        requests,
        response: Some(ResponseExample { status, body }),
    })
}

fn coerce_status(v: &Value) -> Option<u16> {
    match v {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
