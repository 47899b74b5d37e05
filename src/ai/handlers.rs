use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    ai::client::{Explanation, GeneratedQuestion},
    ai::prompts,
    error::{ApiError, ApiResult},
    state::AppState,
};

pub fn ai_routes() -> Router<AppState> {
    Router::new()
        .route("/ai/generate-questions", post(generate_questions))
        .route("/ai/generate-explanation", post(generate_explanation))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuestionsRequest {
    pub role: String,
    pub experience: String,
    pub topics_to_focus: String,
    pub number_of_questions: u32,
}

#[derive(Debug, Deserialize)]
pub struct GenerateExplanationRequest {
    pub question: String,
}

#[instrument(skip(state, payload))]
pub async fn generate_questions(
    State(state): State<AppState>,
    Json(payload): Json<GenerateQuestionsRequest>,
) -> ApiResult<Json<Vec<GeneratedQuestion>>> {
    if payload.role.trim().is_empty() || payload.topics_to_focus.trim().is_empty() {
        return Err(ApiError::bad_request("role and topicsToFocus are required"));
    }
    if payload.number_of_questions == 0 || payload.number_of_questions > 50 {
        return Err(ApiError::bad_request(
            "numberOfQuestions must be between 1 and 50",
        ));
    }

    let prompt = prompts::questions_prompt(
        payload.role.trim(),
        payload.experience.trim(),
        payload.topics_to_focus.trim(),
        payload.number_of_questions,
    );

    let questions = state.ai.generate_questions(&prompt).await?;
    Ok(Json(questions))
}

#[instrument(skip(state, payload))]
pub async fn generate_explanation(
    State(state): State<AppState>,
    Json(payload): Json<GenerateExplanationRequest>,
) -> ApiResult<Json<Explanation>> {
    if payload.question.trim().is_empty() {
        return Err(ApiError::bad_request("question is required"));
    }

    let prompt = prompts::explanation_prompt(payload.question.trim());
    let explanation = state.ai.generate_explanation(&prompt).await?;
    Ok(Json(explanation))
}
