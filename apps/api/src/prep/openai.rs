use async_trait::async_trait;

use crate::errors::AppError;
use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::LlmClient;
use crate::models::prep::PrepTipsResponse;
use crate::prep::analyzer::PrepAnalyzer;
use crate::prep::prompts::{PREP_PROMPT_TEMPLATE, PREP_SYSTEM};

/// Semantic prep analysis through the OpenAI chat-completions API.
pub struct OpenAiPrepAnalyzer(pub LlmClient);

#[async_trait]
impl PrepAnalyzer for OpenAiPrepAnalyzer {
    async fn analyze(&self, jd_text: &str, resume_text: &str) -> Result<PrepTipsResponse, AppError> {
        let prompt = build_prep_prompt(jd_text, resume_text);
        let system = format!("{PREP_SYSTEM} {JSON_ONLY_SYSTEM}");

        let tips: PrepTipsResponse = self
            .0
            .call_json(&prompt, &system)
            .await
            .map_err(|e| AppError::Ai(e.to_string()))?;

        Ok(normalize_tips(tips))
    }

    fn backend(&self) -> &'static str {
        "openai"
    }
}

/// Model output is untrusted: keep the confidence inside [0, 1].
fn normalize_tips(mut tips: PrepTipsResponse) -> PrepTipsResponse {
    tips.match_confidence = if tips.match_confidence.is_nan() {
        0.0
    } else {
        tips.match_confidence.clamp(0.0, 1.0)
    };
    tips
}

fn build_prep_prompt(jd_text: &str, resume_text: &str) -> String {
    fill_template(
        PREP_PROMPT_TEMPLATE,
        &[
            ("grounding", GROUNDING_INSTRUCTION),
            ("jd_text", jd_text),
            ("resume_text", resume_text),
        ],
    )
}

/// Replaces `{name}` placeholders in a single pass over the template, so
/// substituted text is never scanned again. Unknown `{...}` runs (the JSON
/// schema in the template) are copied through.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
