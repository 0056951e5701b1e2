use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::DescribeError;

/// Structured descriptor of one API endpoint, as submitted by a caller.
/// Wire shape is camelCase JSON; everything except `symbol` is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeRequest {
    /// Operation id, e.g. `UsersController.getById`.
    pub symbol: String,
    /// "endpoint" or "function".
    #[serde(default = "default_kind")]
    pub kind: String,
    /// e.g. `GET /api/users/{id}`.
    #[serde(default)]
    pub signature: Option<String>,
    /// HTTP method when supplied separately from the signature.
    #[serde(default)]
    pub http: Option<String>,
    /// Path template when supplied separately from the signature.
    #[serde(default)]
    pub path_template: Option<String>,
    /// Raw doc comment / annotation description for the endpoint.
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub params: Vec<ParamSpec>,
    #[serde(default)]
    pub returns: Option<ReturnSpec>,
    /// Technical notes extracted from the implementation (TODOs, caveats).
    #[serde(default)]
    pub impl_notes: Vec<String>,
}

fn default_kind() -> String {
    "endpoint".to_string()
}

impl DescribeRequest {
    /// HTTP method, from the `http` field or the signature prefix. Uppercased.
    pub fn method(&self) -> String {
        if let Some(h) = self.http.as_deref() {
            if !h.trim().is_empty() {
                return h.trim().to_uppercase();
            }
        }
        self.signature
            .as_deref()
            .and_then(|s| s.split_whitespace().next())
            .filter(|tok| tok.chars().all(|c| c.is_ascii_alphabetic()))
            .map(|tok| tok.to_uppercase())
            .unwrap_or_else(|| "GET".to_string())
    }

    /// Path template, from the `pathTemplate` field or the signature.
    pub fn path(&self) -> String {
        if let Some(p) = self.path_template.as_deref() {
            if !p.trim().is_empty() {
                return p.trim().to_string();
            }
        }
        self.signature
            .as_deref()
            .and_then(|s| s.split_whitespace().find(|tok| tok.starts_with('/')))
            .map(|tok| tok.trim_end_matches(':').to_string())
            .unwrap_or_else(|| "/".to_string())
    }

    /// Trimmed comment, or `None` when blank.
    pub fn comment_text(&self) -> Option<&str> {
        self.comment.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    /// Parameter location: query | path | header | body.
    #[serde(rename = "in", default = "default_location")]
    pub location: String,
    #[serde(rename = "type", default)]
    pub param_type: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_location() -> String {
    "query".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReturnSpec {
    #[serde(rename = "type", default)]
    pub return_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Documentation produced for one endpoint. Constructed fresh per request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeResponse {
    pub short_description: String,
    pub medium_description: String,
    pub long_description: String,
    pub param_docs: Vec<ParamDoc>,
    pub return_doc: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<ExampleSet>,
    /// Response status codes derived from the endpoint descriptor.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub statuses: Vec<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParamDoc {
    pub name: String,
    pub doc: String,
}

/// Structured usage example: request commands plus one response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExampleSet {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requests: Vec<RequestExample>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseExample>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestExample {
    pub curl: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseExample {
    pub status: u16,
    pub body: serde_json::Value,
}

/// Description strategy, selectable per request via `?mode=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Only parameter docs are filled; descriptions stay empty.
    Plain,
    /// Deterministic template generation, no model call.
    Rule,
    /// Model-backed generation with post-processing.
    Model,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Plain => "plain",
            Mode::Rule => "rule",
            Mode::Model => "model",
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(Mode::Plain),
            "rule" => Ok(Mode::Rule),
            // "ollama" accepted as a legacy alias for the model mode.
            "model" | "ollama" => Ok(Mode::Model),
            other => Err(format!("unknown mode '{other}' (plain|rule|model)")),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target reader level, steers the model prompt only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Audience {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl Audience {
    pub fn as_str(&self) -> &'static str {
        match self {
            Audience::Beginner => "beginner",
            Audience::Intermediate => "intermediate",
            Audience::Advanced => "advanced",
        }
    }
}

impl FromStr for Audience {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(Audience::Beginner),
            "intermediate" => Ok(Audience::Intermediate),
            "advanced" => Ok(Audience::Advanced),
            other => Err(format!(
                "unknown audience '{other}' (beginner|intermediate|advanced)"
            )),
        }
    }
}

/// Static facts about a generation backend, surfaced by the health endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratorInfo {
    pub backend: &'static str,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Text-generation collaborator abstraction (allows mocking).
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate raw text for a prompt under the given system instruction.
    async fn generate(&self, prompt: &str, system: &str) -> Result<String, DescribeError>;

    /// Can the backend currently serve requests? Never errors; used by health.
    async fn is_reachable(&self) -> bool;

    fn info(&self) -> GeneratorInfo;
}
