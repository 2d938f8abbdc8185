// Interview prep: compares a stored resume with an application's JD, plus a
// canned practice chat. All real LLM calls go through llm_client.

pub mod analyzer;
pub mod chat;
pub mod handlers;
pub mod openai;
pub mod prompts;
