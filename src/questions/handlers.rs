use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    questions::dto::{AddQuestionsRequest, NoteRequest, QuestionItem},
    questions::repo::Question,
    sessions::repo::Session,
    state::AppState,
};

pub fn question_routes() -> Router<AppState> {
    Router::new()
        .route("/questions", post(add_questions))
        .route("/questions/:id/pin", post(toggle_pin))
        .route("/questions/:id/note", post(update_note))
}

/// Bulk-append question/answer pairs to an owned session.
#[instrument(skip(state, payload))]
pub async fn add_questions(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<AddQuestionsRequest>,
) -> ApiResult<Json<Vec<QuestionItem>>> {
    if payload.questions.is_empty() {
        return Err(ApiError::bad_request("questions must be non-empty"));
    }

    // Foreign sessions look like missing ones.
    Session::find_owned(&state.db, user_id, payload.session_id)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::not_found("Session not found"))?;

    let pairs: Vec<(String, String)> = payload
        .questions
        .into_iter()
        .map(|q| (q.question, q.answer))
        .collect();

    let inserted = Question::insert_many(&state.db, payload.session_id, &pairs)
        .await
        .map_err(ApiError::Internal)?;

    info!(session_id = %payload.session_id, count = inserted.len(), "questions added");
    Ok(Json(inserted.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn toggle_pin(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<QuestionItem>> {
    Question::find_owned(&state.db, user_id, id)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::not_found("Question not found"))?;

    let updated = Question::toggle_pin(&state.db, id)
        .await
        .map_err(ApiError::Internal)?;

    Ok(Json(updated.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_note(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<NoteRequest>,
) -> ApiResult<Json<QuestionItem>> {
    Question::find_owned(&state.db, user_id, id)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::not_found("Question not found"))?;

    let updated = Question::set_note(&state.db, id, payload.note.as_deref())
        .await
        .map_err(ApiError::Internal)?;

    Ok(Json(updated.into()))
}
