// Job hub: resume text extraction and resume-vs-job-description analysis.

pub mod analyzer;
pub mod extract;
pub mod handlers;
pub mod prompts;
