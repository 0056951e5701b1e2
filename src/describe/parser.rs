use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use super::DescribeError;

/// Fields the model is asked to emit. Everything is optional and lenient;
/// coercion to the response shape happens in `validate`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawModelDoc {
    #[serde(default)]
    pub medium_description: Option<String>,
    #[serde(default)]
    pub notes: Option<serde_json::Value>,
    #[serde(default)]
    pub examples: Option<serde_json::Value>,
}

/// Extract the embedded JSON object from raw model text and parse it.
///
/// The match is greedy from the first `{` to the last `}`, which tolerates
/// prose before and after the object as well as nested braces inside it.
pub fn parse_model_response(text: &str) -> Result<RawModelDoc, DescribeError> {
    let json_str = extract_json_object(text)?;
    serde_json::from_str(json_str).map_err(|e| DescribeError::JsonParsing(e.to_string()))
}

fn extract_json_object(text: &str) -> Result<&str, DescribeError> {
    json_object_re()
        .find(text)
        .map(|m| m.as_str())
        .ok_or(DescribeError::NoJsonFound)
}

fn json_object_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("valid JSON object regex"))
}
