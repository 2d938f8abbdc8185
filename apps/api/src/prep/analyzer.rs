//! Prep analyzers — pluggable, trait-based comparison of a resume against a JD.
//!
//! Default: `StubPrepAnalyzer` (canned output, random confidence band picked
//! by substring checks on the JD). `OpenAiPrepAnalyzer` lives in `openai.rs`.
//!
//! `AppState` holds an `Arc<dyn PrepAnalyzer>`, chosen at startup via `AI_BACKEND`.

use async_trait::async_trait;
use rand::Rng;

use crate::errors::AppError;
use crate::models::prep::PrepTipsResponse;

/// Implement this to swap analysis backends without touching the handler.
#[async_trait]
pub trait PrepAnalyzer: Send + Sync {
    async fn analyze(&self, jd_text: &str, resume_text: &str) -> Result<PrepTipsResponse, AppError>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}

const LOW_MATCH_FEEDBACK: &str = "The JD requires 5+ years experience and deep AWS expertise, \
    which is lightly documented in your 3-year resume. Focus heavily on quantifying project \
    results and proving cloud proficiency.";
const HIGH_MATCH_FEEDBACK: &str = "Your profile is highly compatible with this role's \
    statistical modeling focus. Ensure you have clear STAR examples for data cleaning and \
    visualization challenges.";
const DEFAULT_FEEDBACK: &str = "Good compatibility. Focus on demonstrating transferable skills \
    in Git workflows and problem-solving scenarios during the interview.";

const KEY_TOPICS: [&str; 3] = [
    "Reviewing the difference between synchronous and asynchronous architectures.",
    "Deep dive into multi-threading and concurrency concepts in Python.",
    "Practice explaining the CI/CD pipeline used in Project X (from your resume).",
];
const BEHAVIORAL_QUESTIONS: [&str; 3] = [
    "Tell me about a time you handled a critical deployment failure.",
    "Describe a complex system bug you solved, and how you tracked it.",
    "How do you handle disagreements with a senior developer on a technical design choice?",
];
const TECHNICAL_QUESTIONS: [&str; 3] = [
    "Explain the CAP theorem and its relevance to database design.",
    "Walk me through the design of a resilient microservice.",
    "What are the benefits of using FastAPI over Flask in a large-scale project?",
];

/// Which canned match profile a JD falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchBand {
    Low,
    High,
    Moderate,
}

impl MatchBand {
    pub fn classify(jd_text: &str) -> Self {
        if jd_text.contains("Senior Backend Engineer") {
            MatchBand::Low
        } else if jd_text.contains("Junior Data Scientist") {
            MatchBand::High
        } else {
            MatchBand::Moderate
        }
    }

    /// Inclusive confidence range for the band.
    pub fn confidence_range(self) -> (f64, f64) {
        match self {
            MatchBand::Low => (0.40, 0.55),
            MatchBand::High => (0.80, 0.95),
            MatchBand::Moderate => (0.60, 0.75),
        }
    }

    pub fn feedback(self) -> &'static str {
        match self {
            MatchBand::Low => LOW_MATCH_FEEDBACK,
            MatchBand::High => HIGH_MATCH_FEEDBACK,
            MatchBand::Moderate => DEFAULT_FEEDBACK,
        }
    }
}

/// Canned analyzer: fixed topic and question lists, random confidence in the
/// band selected by the JD. The resume text is not inspected.
pub struct StubPrepAnalyzer;

impl StubPrepAnalyzer {
    pub fn tips_for(jd_text: &str) -> PrepTipsResponse {
        let band = MatchBand::classify(jd_text);
        let (low, high) = band.confidence_range();
        let raw = rand::rng().random_range(low..=high);

        PrepTipsResponse {
            key_topics_to_revise: to_strings(&KEY_TOPICS),
            likely_behavioral_questions: to_strings(&BEHAVIORAL_QUESTIONS),
            likely_technical_questions: to_strings(&TECHNICAL_QUESTIONS),
            match_confidence: round2(raw),
            match_feedback: band.feedback().to_string(),
        }
    }
}

#[async_trait]
impl PrepAnalyzer for StubPrepAnalyzer {
    async fn analyze(&self, jd_text: &str, _resume_text: &str) -> Result<PrepTipsResponse, AppError> {
        Ok(Self::tips_for(jd_text))
    }

    fn backend(&self) -> &'static str {
        "stub"
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
