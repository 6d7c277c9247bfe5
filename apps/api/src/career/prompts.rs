pub const ANALYSIS_SYSTEM: &str = "You are an expert HR and Career Coach. \
    You compare resumes against job descriptions honestly and specifically.";

/// Placeholders: {resume}, {job_description}
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze this Resume against the Job Description.

RESUME:
{resume}

JOB DESCRIPTION:
{job_description}

Return a JSON object with:
1. matchScore (integer 0-100)
2. missingKeywords (array of strings)
3. strengths (array of strings)
4. improvements (array of strings)
5. tailoredCoverLetter (string)
"#;
