use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::questions::repo::Question;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionItem {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    pub note: Option<String>,
    pub is_pinned: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Question> for QuestionItem {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            question: q.question,
            answer: q.answer,
            note: q.note,
            is_pinned: q.is_pinned,
            created_at: q.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddQuestionsRequest {
    pub session_id: Uuid,
    pub questions: Vec<QuestionAnswerPayload>,
}

#[derive(Debug, Deserialize)]
pub struct QuestionAnswerPayload {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub struct NoteRequest {
    #[serde(default)]
    pub note: Option<String>,
}
