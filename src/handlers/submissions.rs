//! Exercise submission and review endpoints.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;

use crate::db::{self, LogOnError};
use crate::domain::{ExerciseSubmission, NotificationKind, ReviewStatus};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SubmitExerciseRequest {
    pub learner_id: String,
    pub content: String,
}

#[derive(Deserialize)]
pub struct ReviewRequest {
    pub status: ReviewStatus,
    pub feedback: Option<String>,
}

/// Turn in work for one exercise. Any number of submissions per exercise
/// is allowed; the first one opens the completion gate for that slot.
pub async fn submit_exercise(
    State(state): State<AppState>,
    Path((lesson_id, index)): Path<(i64, usize)>,
    Json(req): Json<SubmitExerciseRequest>,
) -> Result<(StatusCode, Json<ExerciseSubmission>), ApiError> {
    if req.learner_id.trim().is_empty() {
        return Err(ApiError::BadRequest("learner_id must not be empty".to_string()));
    }
    if req.content.trim().is_empty() {
        return Err(ApiError::BadRequest("content must not be empty".to_string()));
    }

    let conn = db::try_lock(&state.pool)?;
    let lesson = db::get_lesson_by_id(&conn, lesson_id)?.ok_or(ApiError::NotFound("lesson"))?;
    if index >= lesson.exercises.len() {
        return Err(ApiError::NotFound("exercise"));
    }
    if !db::is_enrolled(&conn, lesson.course_id, &req.learner_id)? {
        return Err(ApiError::Forbidden("learner is not enrolled in this course".to_string()));
    }

    let submission = db::insert_submission(&conn, lesson_id, index, &req.learner_id, &req.content)?;
    tracing::info!(
        "Submission {} for exercise {} of lesson {}",
        submission.id,
        index,
        lesson_id
    );
    Ok((StatusCode::CREATED, Json(submission)))
}

/// Record a reviewer verdict on a submission. Review outcome never blocks
/// the completion gate; rejected work still counts as submitted.
pub async fn review_submission(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<ReviewRequest>,
) -> Result<Json<ExerciseSubmission>, ApiError> {
    if req.status == ReviewStatus::Pending {
        return Err(ApiError::BadRequest(
            "status must be approved or rejected".to_string(),
        ));
    }

    let conn = db::try_lock(&state.pool)?;
    if !db::set_submission_review(&conn, id, req.status, req.feedback.as_deref())? {
        return Err(ApiError::NotFound("submission"));
    }
    let submission = db::get_submission_by_id(&conn, id)?.ok_or(ApiError::NotFound("submission"))?;

    db::insert_notification(
        &conn,
        &submission.learner_id,
        NotificationKind::SubmissionReview,
        &format!(
            "Your submission for exercise {} was {}",
            submission.exercise_index + 1,
            submission.status.as_str()
        ),
    )
    .log_warn("Failed to record review notification");

    tracing::info!("Submission {} reviewed: {}", id, submission.status.as_str());
    Ok(Json(submission))
}
