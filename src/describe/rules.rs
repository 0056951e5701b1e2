// Deterministic describer: pure function of the endpoint descriptor.
// No model call, no I/O.

use std::sync::OnceLock;

use regex::Regex;

use super::types::{
    DescribeRequest, DescribeResponse, ExampleSet, ParamDoc, ParamSpec, RequestExample,
    ResponseExample,
};

/// Status codes a comment mention is allowed to contribute. Anything else
/// that happens to look like a three-digit number ("port 8080", "top 500")
/// is ignored.
const RECOGNIZED_STATUSES: &[u16] = &[
    200, 201, 202, 204, 301, 302, 304, 400, 401, 403, 404, 409, 410, 415, 422, 429, 500, 502, 503,
];

/// Maximum length of the short description.
const SHORT_MAX_LEN: usize = 100;

/// Sentences kept in the medium description.
const MEDIUM_MAX_SENTENCES: usize = 3;

/// Build the full deterministic description for an endpoint.
pub fn describe_with_rules(req: &DescribeRequest) -> DescribeResponse {
    let return_type = req
        .returns
        .as_ref()
        .and_then(|r| r.return_type.as_deref());
    let return_words = type_to_words(return_type);

    let base = match req.comment_text() {
        Some(c) => ensure_period(c),
        None => format!("Returns {return_words}."),
    };

    let sentences = split_sentences(&base);
    let short = truncate_with_ellipsis(&first_sentence(&base), SHORT_MAX_LEN);
    let medium = if sentences.len() <= MEDIUM_MAX_SENTENCES {
        base.clone()
    } else {
        join_sentences(&sentences, MEDIUM_MAX_SENTENCES)
    };

    // Long form: the full comment plus a return-value sentence when we know
    // the return type and the comment did not already come from it.
    let long = if req.comment_text().is_some() && return_type.is_some() {
        format!("{base} Returns {return_words}.")
    } else {
        base.clone()
    };

    let statuses = derive_statuses(&req.method(), req.comment_text().unwrap_or(""));
    let examples = Some(fallback_example(req, &statuses));

    DescribeResponse {
        short_description: short,
        medium_description: medium,
        long_description: long,
        param_docs: build_param_docs(&req.params),
        return_doc: req
            .returns
            .as_ref()
            .and_then(|r| r.description.clone())
            .unwrap_or_default(),
        notes: Vec::new(),
        examples,
        statuses,
    }
}

/// Fill one doc string per parameter. An explicit description always wins;
/// otherwise the name decides the template.
pub fn build_param_docs(params: &[ParamSpec]) -> Vec<ParamDoc> {
    params
        .iter()
        .map(|p| {
            let explicit = p.description.as_deref().map(str::trim).unwrap_or("");
            let doc = if !explicit.is_empty() {
                explicit.to_string()
            } else {
                template_for_param_name(&p.name)
            };
            ParamDoc {
                name: p.name.clone(),
                doc,
            }
        })
        .collect()
}

fn template_for_param_name(name: &str) -> String {
    let n = name.trim().to_lowercase();
    if n == "id" || n == "userid" || n.ends_with("_id") {
        "Resource identifier.".to_string()
    } else if matches!(n.as_str(), "page" | "size" | "limit") {
        "Pagination parameter.".to_string()
    } else if matches!(n.as_str(), "q" | "query" | "search") {
        "Search phrase.".to_string()
    } else {
        format!("The `{name}` parameter.")
    }
}

/// Derive the response status set for an endpoint.
///
/// Every recognized status code mentioned in the comment as a standalone
/// number is included, in order of first appearance. When no success (2xx)
/// code is mentioned, the method heuristic supplies one up front:
/// POST creates (201), DELETE empties (204), everything else returns 200.
pub fn derive_statuses(method: &str, comment: &str) -> Vec<u16> {
    let mut statuses: Vec<u16> = Vec::new();
    for m in status_token_re().find_iter(comment) {
        if let Ok(code) = m.as_str().parse::<u16>() {
            if RECOGNIZED_STATUSES.contains(&code) && !statuses.contains(&code) {
                statuses.push(code);
            }
        }
    }

    if !statuses.iter().any(|s| (200..300).contains(s)) {
        let success = match method.to_uppercase().as_str() {
            "POST" => 201,
            "DELETE" => 204,
            _ => 200,
        };
        statuses.insert(0, success);
    }

    statuses
}

fn status_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b[1-5]\d{2}\b").expect("valid status token regex"))
}

/// Turn a type name into readable words for the "Returns …" sentence.
pub fn type_to_words(type_name: Option<&str>) -> String {
    let t = match type_name.map(str::trim).filter(|t| !t.is_empty()) {
        Some(t) => t,
        None => return "a response".to_string(),
    };
    let tl = t.to_lowercase();
    if tl.contains("string") {
        "a string".to_string()
    } else if tl.contains("int") || tl.contains("long") {
        "an integer".to_string()
    } else if tl.contains("double") || tl.contains("float") || tl.contains("bigdec") {
        "a number".to_string()
    } else if tl.contains("boolean") {
        "a boolean value (true/false)".to_string()
    } else {
        format!("a `{t}` object")
    }
}

/// Synthesize a fallback usage example: one curl command plus a response
/// stub carrying the primary derived status.
pub fn fallback_example(req: &DescribeRequest, statuses: &[u16]) -> ExampleSet {
    let method = req.method();
    let url = format!("{{{{BASE_URL}}}}{}", req.path());

    let mut curl = format!("curl -X {method} \"{url}\"");
    let has_body = req.params.iter().any(|p| p.location.eq_ignore_ascii_case("body"));
    if has_body {
        curl.push_str(" \\\n  -H \"Content-Type: application/json\"");
        curl.push_str(" \\\n  --data-raw '{}'");
    }

    let status = statuses
        .iter()
        .copied()
        .find(|s| (200..300).contains(s))
        .unwrap_or(200);
    let body = if status == 204 {
        serde_json::Value::Null
    } else {
        serde_json::json!({})
    };

    ExampleSet {
        requests: vec![RequestExample { curl }],
        response: Some(ResponseExample { status, body }),
    }
}

/// Split text into sentences on period boundaries.
pub(crate) fn split_sentences(text: &str) -> Vec<String> {
    text.split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// First sentence of the text, with its period restored.
pub(crate) fn first_sentence(text: &str) -> String {
    match split_sentences(text).into_iter().next() {
        Some(s) => format!("{s}."),
        None => String::new(),
    }
}

fn join_sentences(sentences: &[String], max: usize) -> String {
    let taken: Vec<&str> = sentences.iter().take(max).map(String::as_str).collect();
    if taken.is_empty() {
        return String::new();
    }
    format!("{}.", taken.join(". "))
}

/// Truncate at a char boundary, appending an ellipsis when cut.
pub(crate) fn truncate_with_ellipsis(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let cut: String = s.chars().take(max_chars).collect();
    format!("{cut}…")
}

fn ensure_period(s: &str) -> String {
    let t = s.trim();
    if t.ends_with('.') || t.ends_with('!') || t.ends_with('?') {
        t.to_string()
    } else {
        format!("{t}.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: &str) -> DescribeRequest {
        serde_json::from_str(json).unwrap()
    }

    // ── Status derivation ───────────────────────────────────────────

    #[test]
    fn mentioned_status_appears_in_list() {
        let statuses = derive_statuses("GET", "Returns the user, or 404 when missing.");
        assert!(statuses.contains(&404));
    }

    #[test]
    fn multiple_mentions_kept_in_appearance_order() {
        let statuses = derive_statuses("GET", "May answer 409 on conflict and 404 when gone.");
        let pos409 = statuses.iter().position(|s| *s == 409).unwrap();
        let pos404 = statuses.iter().position(|s| *s == 404).unwrap();
        assert!(pos409 < pos404);
    }

    #[test]
    fn duplicate_mentions_deduplicated() {
        let statuses = derive_statuses("GET", "404 here, 404 there, 404 everywhere.");
        assert_eq!(statuses.iter().filter(|s| **s == 404).count(), 1);
    }

    #[test]
    fn unrecognized_numbers_ignored() {
        let statuses = derive_statuses("GET", "Fetches up to 250 rows from port 418.");
        assert_eq!(statuses, vec![200]);
    }

    #[test]
    fn method_supplies_success_status() {
        assert_eq!(derive_statuses("GET", "")[0], 200);
        assert_eq!(derive_statuses("POST", "")[0], 201);
        assert_eq!(derive_statuses("DELETE", "")[0], 204);
        assert_eq!(derive_statuses("PUT", "")[0], 200);
    }

    #[test]
    fn mentioned_success_suppresses_method_default() {
        let statuses = derive_statuses("POST", "Answers 200 with the merged entity.");
        assert_eq!(statuses, vec![200]);
    }

    #[test]
    fn error_mention_still_gets_method_success() {
        let statuses = derive_statuses("POST", "Rejects duplicates with 409.");
        assert_eq!(statuses, vec![201, 409]);
    }

    // ── Parameter docs ──────────────────────────────────────────────

    #[test]
    fn id_param_gets_fixed_phrase() {
        let req = request(r#"{"symbol":"s","params":[{"name":"id"}]}"#);
        let docs = build_param_docs(&req.params);
        assert_eq!(docs[0].doc, "Resource identifier.");
    }

    #[test]
    fn id_suffix_and_userid_match_identifier_template() {
        let req = request(
            r#"{"symbol":"s","params":[{"name":"order_id"},{"name":"userId"}]}"#,
        );
        let docs = build_param_docs(&req.params);
        assert_eq!(docs[0].doc, "Resource identifier.");
        assert_eq!(docs[1].doc, "Resource identifier.");
    }

    #[test]
    fn pagination_and_search_templates() {
        let req = request(
            r#"{"symbol":"s","params":[{"name":"page"},{"name":"limit"},{"name":"q"}]}"#,
        );
        let docs = build_param_docs(&req.params);
        assert_eq!(docs[0].doc, "Pagination parameter.");
        assert_eq!(docs[1].doc, "Pagination parameter.");
        assert_eq!(docs[2].doc, "Search phrase.");
    }

    #[test]
    fn unknown_name_gets_generic_template() {
        let req = request(r#"{"symbol":"s","params":[{"name":"flavor"}]}"#);
        let docs = build_param_docs(&req.params);
        assert_eq!(docs[0].doc, "The `flavor` parameter.");
    }

    #[test]
    fn explicit_description_wins_over_template() {
        let req = request(
            r#"{"symbol":"s","params":[{"name":"id","description":"Order number."}]}"#,
        );
        let docs = build_param_docs(&req.params);
        assert_eq!(docs[0].doc, "Order number.");
    }

    // ── Descriptions ────────────────────────────────────────────────

    #[test]
    fn empty_comment_falls_back_to_return_type() {
        let req = request(r#"{"symbol":"s","returns":{"type":"String"}}"#);
        let out = describe_with_rules(&req);
        assert_eq!(out.medium_description, "Returns a string.");
        assert_eq!(out.short_description, "Returns a string.");
    }

    #[test]
    fn comment_gets_trailing_period() {
        let req = request(r#"{"symbol":"s","comment":"Fetches the user"}"#);
        let out = describe_with_rules(&req);
        assert_eq!(out.medium_description, "Fetches the user.");
    }

    #[test]
    fn short_is_first_sentence_only() {
        let req = request(
            r#"{"symbol":"s","comment":"Fetches the user. Requires a valid token. Cached for 60s."}"#,
        );
        let out = describe_with_rules(&req);
        assert_eq!(out.short_description, "Fetches the user.");
    }

    #[test]
    fn medium_keeps_at_most_three_sentences() {
        let req = request(
            r#"{"symbol":"s","comment":"One. Two. Three. Four. Five."}"#,
        );
        let out = describe_with_rules(&req);
        assert_eq!(out.medium_description, "One. Two. Three.");
    }

    #[test]
    fn long_appends_return_sentence() {
        let req = request(
            r#"{"symbol":"s","comment":"Fetches the user.","returns":{"type":"UserResponse"}}"#,
        );
        let out = describe_with_rules(&req);
        assert_eq!(
            out.long_description,
            "Fetches the user. Returns a `UserResponse` object."
        );
    }

    #[test]
    fn short_truncated_with_ellipsis() {
        let long_sentence = format!("{} end", "word ".repeat(40));
        let req = request(&format!(
            r#"{{"symbol":"s","comment":"{long_sentence}"}}"#
        ));
        let out = describe_with_rules(&req);
        assert!(out.short_description.chars().count() <= 101);
        assert!(out.short_description.ends_with('…'));
    }

    #[test]
    fn return_doc_copied_from_input() {
        let req = request(
            r#"{"symbol":"s","returns":{"type":"UserResponse","description":"The user."}}"#,
        );
        let out = describe_with_rules(&req);
        assert_eq!(out.return_doc, "The user.");
    }

    #[test]
    fn rule_output_is_deterministic() {
        let req = request(
            r#"{"symbol":"s","signature":"GET /api/users/{id}","comment":"Fetches a user. 404 when missing.","params":[{"name":"id"}]}"#,
        );
        let a = describe_with_rules(&req);
        let b = describe_with_rules(&req);
        assert_eq!(serde_json::to_value(&a).unwrap(), serde_json::to_value(&b).unwrap());
    }

    // ── Type words ──────────────────────────────────────────────────

    #[test]
    fn type_words_cover_builtin_families() {
        assert_eq!(type_to_words(Some("String")), "a string");
        assert_eq!(type_to_words(Some("Integer")), "an integer");
        assert_eq!(type_to_words(Some("long")), "an integer");
        assert_eq!(type_to_words(Some("Double")), "a number");
        assert_eq!(type_to_words(Some("BigDecimal")), "a number");
        assert_eq!(type_to_words(Some("boolean")), "a boolean value (true/false)");
        assert_eq!(type_to_words(Some("OrderResponse")), "a `OrderResponse` object");
        assert_eq!(type_to_words(None), "a response");
    }

    // ── Fallback example ────────────────────────────────────────────

    #[test]
    fn fallback_curl_for_get() {
        let req = request(
            r#"{"symbol":"s","signature":"GET /api/users/{id}"}"#,
        );
        let ex = fallback_example(&req, &[200]);
        assert_eq!(ex.requests.len(), 1);
        assert_eq!(
            ex.requests[0].curl,
            "curl -X GET \"{{BASE_URL}}/api/users/{id}\""
        );
        assert_eq!(ex.response.as_ref().unwrap().status, 200);
    }

    #[test]
    fn fallback_curl_adds_body_for_write() {
        let req = request(
            r#"{"symbol":"s","signature":"POST /api/orders","params":[{"name":"payload","in":"body"}]}"#,
        );
        let ex = fallback_example(&req, &[201]);
        let curl = &ex.requests[0].curl;
        assert!(curl.contains("-X POST"));
        assert!(curl.contains("Content-Type: application/json"));
        assert!(curl.contains("--data-raw"));
        assert_eq!(ex.response.as_ref().unwrap().status, 201);
    }

    #[test]
    fn no_content_response_has_null_body() {
        let req = request(r#"{"symbol":"s","http":"DELETE","pathTemplate":"/api/orders/{id}"}"#);
        let ex = fallback_example(&req, &[204]);
        let resp = ex.response.unwrap();
        assert_eq!(resp.status, 204);
        assert!(resp.body.is_null());
    }
}
