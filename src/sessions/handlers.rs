use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    questions::repo::Question,
    sessions::dto::{
        CreateSessionRequest, CreatedSessionResponse, SessionDetails, SessionListItem,
    },
    sessions::repo::Session,
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", get(list_sessions))
        .route("/sessions/:id", get(get_session))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(create_session))
        .route("/sessions/:id", delete(delete_session))
}

#[instrument(skip(state, payload))]
pub async fn create_session(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateSessionRequest>,
) -> ApiResult<(StatusCode, Json<CreatedSessionResponse>)> {
    if payload.role.trim().is_empty() || payload.experience.trim().is_empty() {
        return Err(ApiError::bad_request("role and experience are required"));
    }

    let session = Session::create(
        &state.db,
        user_id,
        payload.role.trim(),
        payload.experience.trim(),
        payload.topics_to_focus.trim(),
        payload.description.as_deref(),
    )
    .await
    .map_err(ApiError::Internal)?;

    let pairs: Vec<(String, String)> = payload
        .questions
        .into_iter()
        .map(|q| (q.question, q.answer))
        .collect();
    let inserted = if pairs.is_empty() {
        Vec::new()
    } else {
        Question::insert_many(&state.db, session.id, &pairs)
            .await
            .map_err(ApiError::Internal)?
    };

    info!(session_id = %session.id, %user_id, questions = inserted.len(), "session created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedSessionResponse {
            id: session.id,
            created_at: session.created_at,
            question_count: inserted.len(),
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_sessions(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<Vec<SessionListItem>>> {
    let rows = Session::list_by_user(&state.db, user_id)
        .await
        .map_err(ApiError::Internal)?;
    let items = rows
        .into_iter()
        .map(|r| SessionListItem {
            id: r.id,
            role: r.role,
            experience: r.experience,
            topics_to_focus: r.topics_to_focus,
            description: r.description,
            created_at: r.created_at,
            question_count: r.question_count,
        })
        .collect();
    Ok(Json(items))
}

#[instrument(skip(state))]
pub async fn get_session(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SessionDetails>> {
    let session = Session::find_owned(&state.db, user_id, id)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::not_found("Session not found"))?;

    let questions = Question::list_by_session(&state.db, session.id)
        .await
        .map_err(ApiError::Internal)?;

    Ok(Json(SessionDetails {
        id: session.id,
        role: session.role,
        experience: session.experience,
        topics_to_focus: session.topics_to_focus,
        description: session.description,
        created_at: session.created_at,
        questions: questions.into_iter().map(Into::into).collect(),
    }))
}

#[instrument(skip(state))]
pub async fn delete_session(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let deleted = Session::delete_owned(&state.db, user_id, id)
        .await
        .map_err(ApiError::Internal)?;
    if !deleted {
        return Err(ApiError::not_found("Session not found"));
    }
    info!(session_id = %id, %user_id, "session deleted");
    Ok(StatusCode::NO_CONTENT)
}
