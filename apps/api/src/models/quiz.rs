use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct QuizResultRow {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    pub course_title: String,
    pub score: i32,
    pub total_questions: i32,
    pub date: DateTime<Utc>,
}
