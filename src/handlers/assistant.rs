//! Teaching assistant endpoints. Both answer 503 until an API key is
//! configured; provider failures surface as 502.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::assistant::AssistantClient;
use crate::db;
use crate::domain::Quiz;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AskRequest {
    pub question: String,
    /// When set, the lesson body is handed to the model as context
    pub lesson_id: Option<i64>,
}

#[derive(Serialize)]
pub struct AskResponse {
    pub answer: String,
}

#[derive(Deserialize)]
pub struct DraftRequest {
    pub topic: String,
    pub question_count: Option<usize>,
    pub lesson_id: Option<i64>,
}

#[derive(Serialize)]
pub struct DraftResponse {
    /// Validated draft for the author to review; nothing is persisted
    pub quiz: Quiz,
}

fn client(state: &AppState) -> Result<Arc<AssistantClient>, ApiError> {
    state.assistant.clone().ok_or(ApiError::AssistantDisabled)
}

// The db lock is not held across awaits: lesson context is read in a
// block, then the guard drops before the provider call.
fn lesson_body(state: &AppState, lesson_id: Option<i64>) -> Result<Option<String>, ApiError> {
    let Some(id) = lesson_id else {
        return Ok(None);
    };
    let conn = db::try_lock(&state.pool)?;
    let lesson = db::get_lesson_by_id(&conn, id)?.ok_or(ApiError::NotFound("lesson"))?;
    Ok(Some(lesson.body))
}

pub async fn ask(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    if req.question.trim().is_empty() {
        return Err(ApiError::BadRequest("question must not be empty".to_string()));
    }
    let assistant = client(&state)?;
    let context = lesson_body(&state, req.lesson_id)?;

    let answer = assistant.ask(&req.question, context.as_deref()).await?;
    Ok(Json(AskResponse { answer }))
}

pub async fn draft_quiz(
    State(state): State<AppState>,
    Json(req): Json<DraftRequest>,
) -> Result<Json<DraftResponse>, ApiError> {
    if req.topic.trim().is_empty() {
        return Err(ApiError::BadRequest("topic must not be empty".to_string()));
    }
    let assistant = client(&state)?;
    let context = lesson_body(&state, req.lesson_id)?;

    let quiz = assistant
        .draft_quiz(&req.topic, req.question_count.unwrap_or(5), context.as_deref())
        .await?;
    tracing::info!("Drafted a {}-question quiz on \"{}\"", quiz.questions.len(), req.topic);
    Ok(Json(DraftResponse { quiz }))
}
