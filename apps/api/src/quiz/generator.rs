//! Quiz generation and grading.
//!
//! Generation never fails from the caller's point of view: a provider error,
//! an unparseable reply or a reply with no usable questions all yield the
//! built-in mock quiz.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::llm_client::prompts::render_template;
use crate::llm_client::{generate_json, TextGenerator};
use crate::quiz::prompts::{QUIZ_PROMPT_TEMPLATE, QUIZ_SYSTEM};

pub const QUESTION_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

impl QuizQuestion {
    /// Non-empty question, at least two distinct options, answer among them.
    pub fn is_well_formed(&self) -> bool {
        let mut options: Vec<&str> = self.options.iter().map(|o| o.trim()).collect();
        options.sort_unstable();
        options.dedup();

        !self.question.trim().is_empty()
            && options.len() >= 2
            && options.len() == self.options.len()
            && self.options.iter().any(|o| o == &self.correct_answer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizOrigin {
    Generated,
    Fallback,
}

pub struct GeneratedQuiz {
    pub questions: Vec<QuizQuestion>,
    pub origin: QuizOrigin,
}

pub async fn generate_quiz(generator: &dyn TextGenerator, content: &str) -> GeneratedQuiz {
    let question_count = QUESTION_COUNT.to_string();
    let prompt = render_template(
        QUIZ_PROMPT_TEMPLATE,
        &[("question_count", question_count.as_str()), ("content", content)],
    );

    match generate_json::<Vec<QuizQuestion>>(generator, &prompt, QUIZ_SYSTEM).await {
        Ok(raw) => {
            let total = raw.len();
            let questions: Vec<QuizQuestion> = raw
                .into_iter()
                .filter(QuizQuestion::is_well_formed)
                .take(QUESTION_COUNT)
                .collect();

            if questions.is_empty() {
                warn!("Quiz reply had no usable questions ({total} returned), using mock quiz");
                return fallback();
            }
            if questions.len() < total {
                info!("Dropped {} malformed quiz questions", total - questions.len());
            }
            GeneratedQuiz {
                questions,
                origin: QuizOrigin::Generated,
            }
        }
        Err(e) => {
            warn!("Quiz generation failed, using mock quiz: {e}");
            fallback()
        }
    }
}

fn fallback() -> GeneratedQuiz {
    GeneratedQuiz {
        questions: mock_quiz(),
        origin: QuizOrigin::Fallback,
    }
}

pub fn mock_quiz() -> Vec<QuizQuestion> {
    let q = |question: &str, options: [&str; 4], answer: &str| QuizQuestion {
        question: question.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        correct_answer: answer.to_string(),
    };
    vec![
        q(
            "What is the main purpose of this topic? (Mock Question)",
            ["To learn", "To sleep", "To eat", "To dance"],
            "To learn",
        ),
        q(
            "Which of the following is true? (Mock Question)",
            ["AI is magic", "AI is math", "AI is food", "AI is a toy"],
            "AI is math",
        ),
        q(
            "Select the correct option. (Mock Question)",
            ["Option A", "Option B", "Option C", "Option D"],
            "Option A",
        ),
        q(
            "Another mock question for testing.",
            ["Yes", "No", "Maybe", "So"],
            "Yes",
        ),
        q("Final mock question.", ["1", "2", "3", "4"], "1"),
    ]
}

/// Number of answers matching the question's correct answer, position by position.
pub fn grade(questions: &[QuizQuestion], answers: &[String]) -> u32 {
    questions
        .iter()
        .zip(answers)
        .filter(|(q, a)| &q.correct_answer == *a)
        .count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::StubGenerator;

    const GOOD_REPLY: &str = r#"```json
    [
      {"question": "What keyword defines a function in Python?", "options": ["func", "def", "fn", "lambda"], "correctAnswer": "def"},
      {"question": "Which type holds text?", "options": ["int", "str", "bool", "float"], "correctAnswer": "str"},
      {"question": "Broken question", "options": ["a", "b"], "correctAnswer": "c"},
    ]
    ```"#;

    #[tokio::test]
    async fn test_generated_quiz_keeps_well_formed_questions() {
        let quiz = generate_quiz(&StubGenerator::replying(GOOD_REPLY), "Python basics").await;
        assert_eq!(quiz.origin, QuizOrigin::Generated);
        assert_eq!(quiz.questions.len(), 2);
        assert_eq!(quiz.questions[0].correct_answer, "def");
    }

    #[tokio::test]
    async fn test_provider_failure_falls_back_to_mock() {
        let quiz = generate_quiz(&StubGenerator::failing(), "anything").await;
        assert_eq!(quiz.origin, QuizOrigin::Fallback);
        assert_eq!(quiz.questions, mock_quiz());
    }

    #[tokio::test]
    async fn test_prose_reply_falls_back_to_mock() {
        let quiz = generate_quiz(&StubGenerator::replying("I can't do that."), "x").await;
        assert_eq!(quiz.origin, QuizOrigin::Fallback);
    }

    #[tokio::test]
    async fn test_all_malformed_falls_back_to_mock() {
        let reply = r#"[{"question": "", "options": ["a", "b"], "correctAnswer": "a"}]"#;
        let quiz = generate_quiz(&StubGenerator::replying(reply), "x").await;
        assert_eq!(quiz.origin, QuizOrigin::Fallback);
    }

    #[test]
    fn test_mock_quiz_is_well_formed() {
        let quiz = mock_quiz();
        assert_eq!(quiz.len(), QUESTION_COUNT);
        assert!(quiz.iter().all(QuizQuestion::is_well_formed));
    }

    #[test]
    fn test_duplicate_options_are_rejected() {
        let q = QuizQuestion {
            question: "Pick".to_string(),
            options: vec!["a".to_string(), "a".to_string()],
            correct_answer: "a".to_string(),
        };
        assert!(!q.is_well_formed());
    }

    #[test]
    fn test_grade_counts_matching_answers() {
        let quiz = mock_quiz();
        let answers: Vec<String> = ["To learn", "AI is magic", "Option A", "Yes", "2"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(grade(&quiz, &answers), 3);
    }

    #[test]
    fn test_question_wire_format_is_camel_case() {
        let value = serde_json::to_value(&mock_quiz()[0]).unwrap();
        assert_eq!(value["correctAnswer"], "To learn");
    }
}
