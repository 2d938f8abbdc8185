// Shared prompt fragments. Each service that needs LLM calls defines its own
// prompts.rs alongside it; this file holds the cross-cutting pieces.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Keeps generated prep anchored to the documents that were supplied.
pub const GROUNDING_INSTRUCTION: &str = "\
    Base every topic and question on the job description and resume provided. \
    Do NOT invent employers, projects or technologies the resume does not mention. \
    When the resume lacks evidence for a requirement, say so in the feedback.";
