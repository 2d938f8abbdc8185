//! Canned mock-interview practice chat.
//!
//! Each user message is routed by keyword to one of three fixed replies:
//! an opening question, a follow-up on a STAR answer, or a behavioral
//! question. No conversation history is kept.

/// Name used when the user has no stored profile name.
pub const GUEST_NAME: &str = "Guest";

const INTERVIEW_CONTEXT: &str = "Data Scientist role focusing on statistical modeling and Python.";
const FOLLOW_UP_REPLY: &str = "That's a good structured answer! Now, can you dive deeper into \
    the **Action** part? Specifically, how did you handle the data cleaning process?";
const BEHAVIORAL_REPLY: &str = "Thank you. Let's move to a behavioral question: *How do you \
    handle disagreements with stakeholders regarding model assumptions?*";

/// Which canned reply a practice message gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatTurn {
    Opening,
    FollowUp,
    Behavioral,
}

impl ChatTurn {
    /// Case-insensitive keyword match; "hello"/"start" win over "star"/"problem".
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("hello") || lower.contains("start") {
            ChatTurn::Opening
        } else if lower.contains("star") || lower.contains("problem") {
            ChatTurn::FollowUp
        } else {
            ChatTurn::Behavioral
        }
    }

    pub fn reply(self, user_name: &str) -> String {
        match self {
            ChatTurn::Opening => format!(
                "Hello, {user_name}! Welcome to your Mock Interview for the **{INTERVIEW_CONTEXT}**. \
                 Let's start. \n\n**Question 1:** *Tell me about a time you used data \
                 visualization to solve a complex business problem.*"
            ),
            ChatTurn::FollowUp => FOLLOW_UP_REPLY.to_string(),
            ChatTurn::Behavioral => BEHAVIORAL_REPLY.to_string(),
        }
    }
}
