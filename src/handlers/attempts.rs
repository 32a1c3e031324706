//! Quiz attempt endpoints: grade-and-store on submit, history reads.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use crate::config;
use crate::db::{self, LogOnError};
use crate::domain::{NotificationKind, QuizAttempt, SubmittedAnswer};
use crate::error::ApiError;
use crate::grading;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SubmitAttemptRequest {
    pub learner_id: String,
    /// Positional answers; may be shorter or longer than the quiz
    #[serde(default)]
    pub answers: Vec<SubmittedAnswer>,
}

#[derive(Deserialize)]
pub struct LearnerQuery {
    pub learner_id: String,
}

/// Grade a submission and persist the attempt. Grading never rejects a
/// submission; only missing resources or enrollment do.
pub async fn submit_attempt(
    State(state): State<AppState>,
    Path(lesson_id): Path<i64>,
    Json(req): Json<SubmitAttemptRequest>,
) -> Result<(StatusCode, Json<QuizAttempt>), ApiError> {
    if req.learner_id.trim().is_empty() {
        return Err(ApiError::BadRequest("learner_id must not be empty".to_string()));
    }

    let conn = db::try_lock(&state.pool)?;
    let lesson = db::get_lesson_by_id(&conn, lesson_id)?.ok_or(ApiError::NotFound("lesson"))?;
    let quiz = lesson.quiz.as_ref().ok_or(ApiError::NotFound("quiz"))?;

    if !db::is_enrolled(&conn, lesson.course_id, &req.learner_id)? {
        return Err(ApiError::Forbidden("learner is not enrolled in this course".to_string()));
    }

    let result = grading::grade(quiz, &req.answers);
    let attempt = db::insert_attempt(&conn, lesson_id, &req.learner_id, &result)?;

    let verdict = if result.passed { "Passed" } else { "Did not pass" };
    db::insert_notification(
        &conn,
        &req.learner_id,
        NotificationKind::QuizResult,
        &format!("{} \"{}\": {}%", verdict, lesson.title, result.percentage),
    )
    .log_warn("Failed to record quiz notification");

    tracing::info!(
        "Attempt {} on lesson {}: {}% ({})",
        attempt.id,
        lesson_id,
        result.percentage,
        verdict
    );
    Ok((StatusCode::CREATED, Json(attempt)))
}

pub async fn list_attempts(
    State(state): State<AppState>,
    Path(lesson_id): Path<i64>,
    Query(query): Query<LearnerQuery>,
) -> Result<Json<Vec<QuizAttempt>>, ApiError> {
    let conn = db::try_lock(&state.pool)?;
    if db::get_lesson_by_id(&conn, lesson_id)?.is_none() {
        return Err(ApiError::NotFound("lesson"));
    }
    let attempts = db::list_attempts(&conn, lesson_id, &query.learner_id, config::ATTEMPTS_LIMIT)?;
    Ok(Json(attempts))
}
