use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct AiPrepRequest {
    pub app_id: String,
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct PracticeChatRequest {
    pub user_id: String,
    pub message: String,
    #[serde(default)]
    pub app_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PracticeChatResponse {
    pub reply: String,
}

/// Structured interview prep produced by a `PrepAnalyzer`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepTipsResponse {
    /// Topics the user should study before the interview.
    pub key_topics_to_revise: Vec<String>,
    /// STAR method questions personalized to the resume.
    pub likely_behavioral_questions: Vec<String>,
    /// Technical questions based on the JD and resume.
    pub likely_technical_questions: Vec<String>,
    /// Compatibility score between 0.0 and 1.0.
    pub match_confidence: f64,
    pub match_feedback: String,
}
