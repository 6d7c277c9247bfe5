//! Repair and parse loosely-structured JSON returned by a generative model.
//!
//! Models wrap JSON in markdown fences, prefix it with chatter, leave trailing
//! commas, or emit raw newlines inside strings. `parse_loose` tries
//! progressively more invasive candidates and returns the first that parses.
//! Pure and synchronous; no provider types leak in here.

use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepairError {
    #[error("no JSON object or array found in model output")]
    NoJson,

    #[error("JSON candidate did not parse: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Parses `text` as `T`, repairing common model-output defects on the way.
pub fn parse_loose<T: DeserializeOwned>(text: &str) -> Result<T, RepairError> {
    let cleaned = strip_json_fences(text);

    if let Ok(value) = serde_json::from_str::<T>(&cleaned) {
        return Ok(value);
    }

    let spans = outermost_spans(&cleaned);
    let mut last_error = RepairError::NoJson;
    for span in spans {
        if let Ok(value) = serde_json::from_str::<T>(span) {
            return Ok(value);
        }
        match serde_json::from_str::<T>(&repair(span)) {
            Ok(value) => return Ok(value),
            Err(e) => last_error = RepairError::Invalid(e),
        }
    }
    Err(last_error)
}

/// Removes every ```json / ``` fence marker, wherever it appears.
pub fn strip_json_fences(text: &str) -> String {
    text.replace("```json", "")
        .replace("```JSON", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// One slice per opener, from its first occurrence to the last matching
/// closer, ordered by where they start. Prose like `Score [high]: {...}`
/// yields the bracket span first and the object span second.
fn outermost_spans(text: &str) -> Vec<&str> {
    let mut spans: Vec<(usize, &str)> = [('{', '}'), ('[', ']')]
        .into_iter()
        .filter_map(|(open, close)| {
            let start = text.find(open)?;
            let end = text.rfind(close)?;
            (end > start).then(|| (start, &text[start..=end]))
        })
        .collect();
    spans.sort_by_key(|&(start, _)| start);
    spans.into_iter().map(|(_, span)| span).collect()
}

/// Normalises smart quotes, drops trailing commas and escapes raw control
/// characters inside string literals.
fn repair(span: &str) -> String {
    let normalized;
    let source = if span.contains('"') {
        span
    } else {
        normalized = span.replace(['\u{201C}', '\u{201D}'], "\"");
        &normalized
    };

    let chars: Vec<char> = source.chars().collect();
    let mut out = String::with_capacity(source.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
                out.push(c);
                continue;
            }
            match c {
                '\\' => {
                    escaped = true;
                    out.push(c);
                }
                '"' => {
                    in_string = false;
                    out.push(c);
                }
                '\n' => out.push_str("\\n"),
                '\r' => {}
                '\t' => out.push_str("\\t"),
                _ => out.push(c),
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let next = chars[i + 1..].iter().find(|n| !n.is_whitespace());
                if !matches!(next, Some('}') | Some(']')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::Value;

    #[derive(Debug, Deserialize)]
    struct Question {
        question: String,
        options: Vec<String>,
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_clean_json_parses_directly() {
        let value: Value = parse_loose(r#"[{"question": "Q", "options": []}]"#).unwrap();
        assert!(value.is_array());
    }

    #[test]
    fn test_leading_chatter_is_skipped() {
        let text = "Sure! Here is your quiz:\n[{\"question\": \"What is 2+2?\", \"options\": [\"3\", \"4\"]}]\nGood luck!";
        let quiz: Vec<Question> = parse_loose(text).unwrap();
        assert_eq!(quiz.len(), 1);
        assert_eq!(quiz[0].question, "What is 2+2?");
        assert_eq!(quiz[0].options, vec!["3", "4"]);
    }

    #[test]
    fn test_trailing_commas_are_removed() {
        let text = r#"{"strengths": ["Rust", "SQL",], "matchScore": 80,}"#;
        let value: Value = parse_loose(text).unwrap();
        assert_eq!(value["strengths"].as_array().unwrap().len(), 2);
        assert_eq!(value["matchScore"], 80);
    }

    #[test]
    fn test_comma_inside_string_is_preserved() {
        let text = r#"{"note": "a, }", "n": 1,}"#;
        let value: Value = parse_loose(text).unwrap();
        assert_eq!(value["note"], "a, }");
    }

    #[test]
    fn test_raw_newlines_in_strings_are_escaped() {
        let text = "{\"tailoredCoverLetter\": \"Dear team,\nI am applying.\"}";
        let value: Value = parse_loose(text).unwrap();
        assert_eq!(value["tailoredCoverLetter"], "Dear team,\nI am applying.");
    }

    #[test]
    fn test_smart_quotes_are_normalised() {
        let text = "{\u{201C}reply\u{201D}: \u{201C}ok\u{201D}}";
        let value: Value = parse_loose(text).unwrap();
        assert_eq!(value["reply"], "ok");
    }

    #[test]
    fn test_bracketed_prose_before_object_is_skipped() {
        let value: Value = parse_loose("Score [high]: {\"matchScore\": 80}").unwrap();
        assert_eq!(value["matchScore"], 80);
    }

    #[test]
    fn test_array_wins_when_it_comes_first() {
        let value: Value = parse_loose("Here: [{\"a\": 1}, {\"a\": 2}] done").unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_plain_prose_has_no_json() {
        let err = parse_loose::<Value>("I cannot help with that.").unwrap_err();
        assert!(matches!(err, RepairError::NoJson));
    }

    #[test]
    fn test_unrepairable_json_reports_invalid() {
        let err = parse_loose::<Value>("{\"a\": [1, 2}").unwrap_err();
        assert!(matches!(err, RepairError::Invalid(_)));
    }
}
