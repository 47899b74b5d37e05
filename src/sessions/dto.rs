use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::questions::dto::QuestionItem;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub role: String,
    pub experience: String,
    pub topics_to_focus: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Initial question set, typically pre-generated through the AI
    /// endpoint by the client.
    #[serde(default)]
    pub questions: Vec<QuestionAnswerPayload>,
}

#[derive(Debug, Deserialize)]
pub struct QuestionAnswerPayload {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionListItem {
    pub id: Uuid,
    pub role: String,
    pub experience: String,
    pub topics_to_focus: String,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub question_count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDetails {
    pub id: Uuid,
    pub role: String,
    pub experience: String,
    pub topics_to_focus: String,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub questions: Vec<QuestionItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedSessionResponse {
    pub id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub question_count: usize,
}
