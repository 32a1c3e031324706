//! Enrollment endpoints. Learners are opaque ids handed in by the
//! gateway; this service only tracks membership.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::db::{self, LogOnError};
use crate::domain::{Course, Enrollment, NotificationKind};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct EnrollRequest {
    pub course_id: i64,
    pub learner_id: String,
}

#[derive(Deserialize)]
pub struct LearnerQuery {
    pub learner_id: String,
}

#[derive(Serialize)]
pub struct EnrolledCourse {
    #[serde(flatten)]
    pub enrollment: Enrollment,
    pub course: Course,
    pub lessons_total: i64,
    pub lessons_completed: i64,
}

/// Enroll a learner in a course. Idempotent: re-enrolling returns the
/// existing record with 200 instead of 201.
pub async fn enroll(
    State(state): State<AppState>,
    Json(req): Json<EnrollRequest>,
) -> Result<(StatusCode, Json<Enrollment>), ApiError> {
    if req.learner_id.trim().is_empty() {
        return Err(ApiError::BadRequest("learner_id must not be empty".to_string()));
    }

    let conn = db::try_lock(&state.pool)?;
    let course = db::get_course_by_id(&conn, req.course_id)?.ok_or(ApiError::NotFound("course"))?;

    if let Some(enrollment) = db::insert_enrollment(&conn, req.course_id, &req.learner_id)? {
        db::insert_notification(
            &conn,
            &req.learner_id,
            NotificationKind::Enrollment,
            &format!("You are enrolled in \"{}\"", course.title),
        )
        .log_warn("Failed to record enrollment notification");

        tracing::info!("Enrolled {} in course {}", req.learner_id, req.course_id);
        return Ok((StatusCode::CREATED, Json(enrollment)));
    }

    let existing = db::get_enrollment(&conn, req.course_id, &req.learner_id)?
        .ok_or(ApiError::NotFound("enrollment"))?;
    Ok((StatusCode::OK, Json(existing)))
}

pub async fn list_for_learner(
    State(state): State<AppState>,
    Query(query): Query<LearnerQuery>,
) -> Result<Json<Vec<EnrolledCourse>>, ApiError> {
    let conn = db::try_lock(&state.pool)?;
    let enrollments = db::list_enrollments_for_learner(&conn, &query.learner_id)?;

    let mut result = Vec::with_capacity(enrollments.len());
    for enrollment in enrollments {
        // enrollment rows always reference a live course; skip quietly if not
        if let Some(course) = db::get_course_by_id(&conn, enrollment.course_id)? {
            let lessons_total = db::count_lessons_for_course(&conn, enrollment.course_id)?;
            let lessons_completed =
                db::count_completed_lessons(&conn, enrollment.course_id, &query.learner_id)?;
            result.push(EnrolledCourse { enrollment, course, lessons_total, lessons_completed });
        }
    }
    Ok(Json(result))
}
