/// System prompt for the OpenAI-backed prep analyzer.
pub const PREP_SYSTEM: &str = "You are an experienced technical interviewer and career coach. \
    You compare a candidate's resume against a job description and produce focused interview preparation. \
    Respond with a single JSON object only.";

/// User prompt template. Placeholders: {jd_text}, {resume_text}, {grounding}.
pub const PREP_PROMPT_TEMPLATE: &str = r#"Compare the resume with the job description below.

{grounding}

Return JSON with exactly these keys:
{
  "key_topics_to_revise": [3 short strings],
  "likely_behavioral_questions": [3 STAR-style questions tailored to the resume],
  "likely_technical_questions": [3 questions grounded in the job description],
  "match_confidence": number between 0.0 and 1.0,
  "match_feedback": one or two sentences justifying the confidence
}

JOB DESCRIPTION:
{jd_text}

RESUME:
{resume_text}
"#;
