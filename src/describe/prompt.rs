use super::types::{Audience, DescribeRequest};

/// Implementation notes forwarded to the model, at most.
const MAX_PROMPT_NOTES: usize = 5;

pub const DESCRIBE_SYSTEM_PROMPT: &str = r#"
You write REST API documentation for engineers, in English.
You return ONLY a valid JSON object in the given schema. No Markdown, no
comments, no extra text. You describe what is in the provided context and
nothing else.
"#;

/// JSON shape the model must emit. Shared by the full and relaxed prompts.
const SCHEMA_TEXT: &str = r#"Return ONLY a valid JSON object of this schema:
{
  "mediumDescription": "string (1-3 sentences, concise, for an engineer)",
  "notes": ["string", "string", "string"],
  "examples": {
    "requests": [{"curl": "curl -X ..."}],
    "response": {"status": 200, "body": {}}
  }
}
Rules: endpoints that create resources use status 201; always return at least one 'curl' example.
"#;

/// Build the full describe prompt for one endpoint.
pub fn build_describe_prompt(req: &DescribeRequest, audience: Audience) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("Reader level: {}.", audience.as_str()));
    lines.push("RULES:".to_string());
    lines.push(
        "- Do not invent statuses or fields; use ONLY what the context provides.".to_string(),
    );
    lines.push("- If something is not in the context, OMIT it (do not guess).".to_string());
    lines.push(
        "- Do not invent business rules (uniqueness, defaults, validations) unless stated."
            .to_string(),
    );
    lines.push(String::new());
    lines.push("Endpoint data:".to_string());

    if let Some(sig) = req.signature.as_deref().filter(|s| !s.trim().is_empty()) {
        lines.push(format!("- Signature: {sig}"));
    } else {
        lines.push(format!("- Signature: {} {}", req.method(), req.path()));
    }
    if let Some(comment) = req.comment_text() {
        lines.push(format!("- Base description: {comment}"));
    }
    if !req.params.is_empty() {
        lines.push("- Parameters:".to_string());
        for p in &req.params {
            lines.push(format!(
                "  - {} ({}, {}, required={}): {}",
                p.name,
                p.location,
                p.param_type.as_deref().unwrap_or(""),
                p.required,
                p.description.as_deref().unwrap_or(""),
            ));
        }
    }
    if let Some(ret) = req.returns.as_ref().and_then(|r| r.return_type.as_deref()) {
        lines.push(format!("- Return type: {ret}"));
    }
    if !req.impl_notes.is_empty() {
        lines.push("- Technical notes:".to_string());
        for note in req.impl_notes.iter().take(MAX_PROMPT_NOTES) {
            lines.push(format!("  - {note}"));
        }
    }

    lines.push(String::new());
    lines.push(SCHEMA_TEXT.to_string());
    lines.join("\n")
}

/// Relaxed prompt for the single re-attempt: the schema plus the bare
/// signature, nothing that could distract a model that failed to comply.
pub fn build_relaxed_prompt(req: &DescribeRequest) -> String {
    let signature = req
        .signature
        .clone()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| format!("{} {}", req.method(), req.path()));
    format!(
        "Document the endpoint `{signature}`.\n\n{SCHEMA_TEXT}\nNo prose. Output starts with '{{' and ends with '}}'."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: &str) -> DescribeRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn prompt_embeds_signature_and_comment() {
        let req = request(
            r#"{"symbol":"s","signature":"GET /api/users/{id}","comment":"Fetches a user."}"#,
        );
        let prompt = build_describe_prompt(&req, Audience::Intermediate);
        assert!(prompt.contains("GET /api/users/{id}"));
        assert!(prompt.contains("Fetches a user."));
        assert!(prompt.contains("Reader level: intermediate."));
    }

    #[test]
    fn prompt_builds_signature_from_parts_when_missing() {
        let req = request(r#"{"symbol":"s","http":"POST","pathTemplate":"/api/orders"}"#);
        let prompt = build_describe_prompt(&req, Audience::Beginner);
        assert!(prompt.contains("- Signature: POST /api/orders"));
    }

    #[test]
    fn prompt_lists_parameters_with_metadata() {
        let req = request(
            r#"{"symbol":"s","params":[{"name":"id","in":"path","type":"UUID","required":true,"description":"User id."}]}"#,
        );
        let prompt = build_describe_prompt(&req, Audience::Intermediate);
        assert!(prompt.contains("- id (path, UUID, required=true): User id."));
    }

    #[test]
    fn prompt_caps_impl_notes_at_five() {
        let req = request(
            r#"{"symbol":"s","implNotes":["n1","n2","n3","n4","n5","n6","n7"]}"#,
        );
        let prompt = build_describe_prompt(&req, Audience::Advanced);
        assert!(prompt.contains("n5"));
        assert!(!prompt.contains("n6"));
    }

    #[test]
    fn prompt_contains_grounding_rules_and_schema() {
        let req = request(r#"{"symbol":"s"}"#);
        let prompt = build_describe_prompt(&req, Audience::Intermediate);
        assert!(prompt.contains("Do not invent statuses or fields"));
        assert!(prompt.contains("mediumDescription"));
        assert!(prompt.contains("status 201"));
    }

    #[test]
    fn relaxed_prompt_is_schema_plus_signature() {
        let req = request(r#"{"symbol":"s","signature":"DELETE /api/orders/{id}"}"#);
        let relaxed = build_relaxed_prompt(&req);
        assert!(relaxed.contains("DELETE /api/orders/{id}"));
        assert!(relaxed.contains("mediumDescription"));
        assert!(!relaxed.contains("Technical notes"));
    }

    #[test]
    fn system_prompt_demands_json_only() {
        assert!(DESCRIBE_SYSTEM_PROMPT.contains("ONLY a valid JSON object"));
        assert!(DESCRIBE_SYSTEM_PROMPT.contains("English"));
    }
}
