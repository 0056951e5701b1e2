use std::sync::Arc;

use super::parser::parse_model_response;
use super::prompt::{build_describe_prompt, build_relaxed_prompt, DESCRIBE_SYSTEM_PROMPT};
use super::rules::{
    build_param_docs, derive_statuses, fallback_example, first_sentence, truncate_with_ellipsis,
};
use super::sanitize::clean_text;
use super::types::{Audience, DescribeRequest, DescribeResponse, TextGenerator};
use super::validate::{validate_model_doc, ValidatedDoc};
use super::DescribeError;

/// Maximum length of the derived short description.
const SHORT_MAX_LEN: usize = 100;

/// Model-backed describer: prompt → generate → extract → validate.
///
/// Content failures get exactly one re-attempt with a relaxed prompt;
/// transport failures and a second unusable output propagate to the caller,
/// which decides between deterministic fallback and an error status.
pub struct ModelDescriber {
    generator: Arc<dyn TextGenerator>,
}

impl ModelDescriber {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub async fn describe(
        &self,
        req: &DescribeRequest,
        audience: Audience,
    ) -> Result<DescribeResponse, DescribeError> {
        let prompt = build_describe_prompt(req, audience);
        let doc = match self.generate_and_validate(&prompt).await {
            Ok(doc) => doc,
            Err(e) if e.is_unusable_content() => {
                tracing::warn!(symbol = %req.symbol, error = %e, "model output unusable, re-attempting with relaxed prompt");
                let relaxed = build_relaxed_prompt(req);
                self.generate_and_validate(&relaxed).await?
            }
            Err(e) => return Err(e),
        };

        Ok(self.into_response(req, doc))
    }

    async fn generate_and_validate(&self, prompt: &str) -> Result<ValidatedDoc, DescribeError> {
        let raw = self
            .generator
            .generate(prompt, DESCRIBE_SYSTEM_PROMPT)
            .await?;
        let cleaned = clean_text(&raw);
        let parsed = parse_model_response(&cleaned)?;
        validate_model_doc(parsed)
    }

    /// Assemble the final response: model content for the descriptions,
    /// deterministic heuristics for everything the model must not invent
    /// (param docs, return doc, status set, fallback example).
    fn into_response(&self, req: &DescribeRequest, doc: ValidatedDoc) -> DescribeResponse {
        let medium = doc.medium_description;
        let short = truncate_with_ellipsis(&first_sentence(&medium), SHORT_MAX_LEN);
        let long = if doc.notes.is_empty() {
            medium.clone()
        } else {
            format!("{} {}", medium, doc.notes.join(" ")).trim().to_string()
        };

        let statuses = derive_statuses(&req.method(), req.comment_text().unwrap_or(""));
        let examples = doc
            .examples
            .or_else(|| Some(fallback_example(req, &statuses)));

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
            notes: doc.notes,
            examples,
            statuses,
        }
    }
}
