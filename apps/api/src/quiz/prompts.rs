pub const QUIZ_SYSTEM: &str = "You are an experienced teacher who writes clear, \
    unambiguous multiple-choice questions. Respond with a raw JSON array only.";

/// Placeholders: {question_count}, {content}
pub const QUIZ_PROMPT_TEMPLATE: &str = r#"Generate a quiz with {question_count} multiple choice questions based on the following content.
Return the response in strictly valid JSON format with the following structure:
[
  {
    "question": "Question text",
    "options": ["Option A", "Option B", "Option C", "Option D"],
    "correctAnswer": "Option A"
  }
]
Each question has exactly four options and correctAnswer repeats one option verbatim.
Do not include any markdown formatting (like ```json). Just the raw JSON array.

Content:
{content}
"#;
