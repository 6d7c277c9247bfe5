pub const TUTOR_SYSTEM: &str = "You are a helpful AI Tutor. Explain concepts step by step, \
    check understanding, and keep answers focused on the student's question.";

pub const DEFAULT_CONTEXT: &str = "General knowledge";

/// Placeholders: {context}, {message}
pub const TUTOR_PROMPT_TEMPLATE: &str = "Context: {context}

Student: {message}
Tutor:";

/// Sent when the provider cannot be reached.
pub const TUTOR_UNAVAILABLE_REPLY: &str =
    "I'm having trouble connecting to my brain right now. (Check API Key)";
