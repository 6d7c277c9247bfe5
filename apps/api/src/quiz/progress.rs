//! Progress statistics over a user's quiz results, shaped for a score-over-time chart.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::quiz::QuizResultRow;

const EMPTY_WEEK: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressPoint {
    /// Weekday abbreviation of the attempt.
    pub name: String,
    /// Percent of questions answered correctly.
    pub score: f64,
    pub full_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    pub points: Vec<ProgressPoint>,
    /// Mean percent, one decimal place.
    pub avg_score: f64,
    pub total_quizzes: usize,
    /// Ten points per completed quiz, capped at 100.
    pub completion: u32,
}

/// Builds the report from results already ordered by date.
pub fn progress_report(results: &[QuizResultRow]) -> ProgressReport {
    if results.is_empty() {
        return ProgressReport {
            points: EMPTY_WEEK
                .iter()
                .map(|day| ProgressPoint {
                    name: day.to_string(),
                    score: 0.0,
                    full_date: None,
                })
                .collect(),
            avg_score: 0.0,
            total_quizzes: 0,
            completion: 0,
        };
    }

    let points: Vec<ProgressPoint> = results
        .iter()
        .map(|r| ProgressPoint {
            name: r.date.format("%a").to_string(),
            score: percent(r),
            full_date: Some(r.date.date_naive()),
        })
        .collect();

    let mean = points.iter().map(|p| p.score).sum::<f64>() / points.len() as f64;
    let completion = (results.len() as u32).saturating_mul(10).min(100);

    ProgressReport {
        points,
        avg_score: (mean * 10.0).round() / 10.0,
        total_quizzes: results.len(),
        completion,
    }
}

fn percent(result: &QuizResultRow) -> f64 {
    if result.total_questions <= 0 {
        return 0.0;
    }
    f64::from(result.score) / f64::from(result.total_questions) * 100.0
}
