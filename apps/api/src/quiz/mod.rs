// Quizzes: AI generation from course content, grading, stored results and progress stats.

pub mod generator;
pub mod handlers;
pub mod progress;
pub mod prompts;
