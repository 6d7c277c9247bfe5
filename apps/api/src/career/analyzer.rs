//! Resume versus job-description analysis.
//!
//! A provider failure is an error for the caller. A reply that cannot be
//! parsed is not: the raw reply becomes the cover letter and the remaining
//! fields are filled with generic advice.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::career::prompts::{ANALYSIS_PROMPT_TEMPLATE, ANALYSIS_SYSTEM};
use crate::llm_client::json_repair::parse_loose;
use crate::llm_client::prompts::{render_template, JSON_ONLY_SYSTEM};
use crate::llm_client::{LlmError, TextGenerator};

pub const FALLBACK_MATCH_SCORE: u8 = 75;
/// Resume text beyond this many characters is not sent to the model.
pub const MAX_RESUME_CHARS: usize = 20_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysis {
    pub match_score: u8,
    pub missing_keywords: Vec<String>,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub tailored_cover_letter: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisOrigin {
    Generated,
    Fallback,
}

impl AnalysisOrigin {
    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisOrigin::Generated => "generated",
            AnalysisOrigin::Fallback => "fallback",
        }
    }
}

pub struct AnalyzedResume {
    pub analysis: ResumeAnalysis,
    pub origin: AnalysisOrigin,
}

/// Reply shape as the model tends to produce it: any field may be missing
/// and the score may arrive as a float or a string like "82%".
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnalysis {
    #[serde(default)]
    match_score: Value,
    #[serde(default)]
    missing_keywords: Vec<String>,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    improvements: Vec<String>,
    #[serde(default)]
    tailored_cover_letter: String,
}

impl From<RawAnalysis> for ResumeAnalysis {
    fn from(raw: RawAnalysis) -> Self {
        let clean = |items: Vec<String>| -> Vec<String> {
            items
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        };
        ResumeAnalysis {
            match_score: clamp_score(&raw.match_score),
            missing_keywords: clean(raw.missing_keywords),
            strengths: clean(raw.strengths),
            improvements: clean(raw.improvements),
            tailored_cover_letter: raw.tailored_cover_letter.trim().to_string(),
        }
    }
}

/// Coerces a numeric or numeric-string score into 0..=100.
pub fn clamp_score(value: &Value) -> u8 {
    let score = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    match score {
        Some(s) if s.is_finite() => s.round().clamp(0.0, 100.0) as u8,
        _ => 0,
    }
}

pub fn fallback_analysis(raw_reply: &str) -> ResumeAnalysis {
    let list = |items: [&str; 2]| items.iter().map(|s| s.to_string()).collect();
    ResumeAnalysis {
        match_score: FALLBACK_MATCH_SCORE,
        missing_keywords: list(["React Hooks", "System Design"]),
        strengths: list(["Strong Frontend Background", "Experience with Node.js"]),
        improvements: list(["Quantify your achievements", "Add more keywords from the JD"]),
        tailored_cover_letter: raw_reply.trim().to_string(),
    }
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub fn build_prompt(resume_text: &str, job_description: &str) -> String {
    render_template(
        ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("resume", truncate_chars(resume_text.trim(), MAX_RESUME_CHARS)),
            ("job_description", job_description.trim()),
        ],
    )
}

pub async fn analyze_resume(
    generator: &dyn TextGenerator,
    resume_text: &str,
    job_description: &str,
) -> Result<AnalyzedResume, LlmError> {
    let prompt = build_prompt(resume_text, job_description);
    let system = format!("{ANALYSIS_SYSTEM} {JSON_ONLY_SYSTEM}");
    let reply = generator.generate(&prompt, &system).await?;

    match parse_loose::<RawAnalysis>(&reply) {
        Ok(raw) => {
            let analysis = ResumeAnalysis::from(raw);
            info!("Resume analyzed, match score {}", analysis.match_score);
            Ok(AnalyzedResume {
                analysis,
                origin: AnalysisOrigin::Generated,
            })
        }
        Err(e) => {
            warn!("Resume analysis reply was not JSON, using fallback: {e}");
            Ok(AnalyzedResume {
                analysis: fallback_analysis(&reply),
                origin: AnalysisOrigin::Fallback,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::StubGenerator;
    use serde_json::json;

    #[test]
    fn test_clamp_score_variants() {
        assert_eq!(clamp_score(&json!(82)), 82);
        assert_eq!(clamp_score(&json!(81.6)), 82);
        assert_eq!(clamp_score(&json!("64%")), 64);
        assert_eq!(clamp_score(&json!(140)), 100);
        assert_eq!(clamp_score(&json!(-5)), 0);
        assert_eq!(clamp_score(&json!("high")), 0);
        assert_eq!(clamp_score(&Value::Null), 0);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn test_prompt_contains_both_documents() {
        let prompt = build_prompt("  Jane, Rust engineer ", "Senior Rust role\n");
        assert!(prompt.contains("RESUME:\nJane, Rust engineer\n"));
        assert!(prompt.contains("JOB DESCRIPTION:\nSenior Rust role\n"));
    }

    #[test]
    fn test_placeholder_in_resume_stays_literal() {
        let prompt = build_prompt("Skills: {job_description}", "Senior Rust role");
        assert!(prompt.contains("RESUME:\nSkills: {job_description}\n"));
        assert_eq!(prompt.matches("Senior Rust role").count(), 1);
    }

    #[tokio::test]
    async fn test_fenced_reply_is_parsed() {
        let reply = r#"```json
{
  "matchScore": 88,
  "missingKeywords": ["Kubernetes", " "],
  "strengths": ["Rust"],
  "improvements": ["Add metrics"],
  "tailoredCoverLetter": "Dear team,",
}
```"#;
        let result = analyze_resume(&StubGenerator::replying(reply), "resume", "jd")
            .await
            .unwrap();
        assert_eq!(result.origin, AnalysisOrigin::Generated);
        assert_eq!(result.analysis.match_score, 88);
        assert_eq!(result.analysis.missing_keywords, vec!["Kubernetes"]);
        assert_eq!(result.analysis.tailored_cover_letter, "Dear team,");
    }

    #[tokio::test]
    async fn test_out_of_range_score_is_clamped() {
        let reply = r#"{"matchScore": 250, "strengths": []}"#;
        let result = analyze_resume(&StubGenerator::replying(reply), "r", "j")
            .await
            .unwrap();
        assert_eq!(result.analysis.match_score, 100);
        assert!(result.analysis.missing_keywords.is_empty());
    }

    #[tokio::test]
    async fn test_prose_reply_uses_fallback() {
        let reply = "Your resume looks great for this role.";
        let result = analyze_resume(&StubGenerator::replying(reply), "r", "j")
            .await
            .unwrap();
        assert_eq!(result.origin, AnalysisOrigin::Fallback);
        assert_eq!(result.analysis.match_score, FALLBACK_MATCH_SCORE);
        assert_eq!(result.analysis.missing_keywords, vec!["React Hooks", "System Design"]);
        assert_eq!(result.analysis.tailored_cover_letter, reply);
    }

    #[tokio::test]
    async fn test_provider_failure_is_an_error() {
        let result = analyze_resume(&StubGenerator::failing(), "r", "j").await;
        assert!(matches!(result, Err(LlmError::Api { status: 503, .. })));
    }

    #[test]
    fn test_analysis_serializes_camel_case() {
        let value = serde_json::to_value(fallback_analysis("letter")).unwrap();
        assert_eq!(value["matchScore"], 75);
        assert_eq!(value["tailoredCoverLetter"], "letter");
        assert!(value["missingKeywords"].is_array());
    }
}
