//! Progress reads and the lesson completion gate.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use crate::completion;
use crate::db;
use crate::domain::ExerciseSubmission;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LearnerQuery {
    pub learner_id: String,
}

#[derive(Deserialize)]
pub struct CompleteRequest {
    pub learner_id: String,
}

#[derive(Serialize)]
pub struct LessonProgress {
    pub lesson_id: i64,
    pub learner_id: String,
    /// Exercise positions with at least one submission, ascending
    pub submitted_indices: Vec<usize>,
    /// Practical positions still missing a submission, ascending
    pub outstanding_exercises: Vec<usize>,
    pub can_complete: bool,
    pub completed: bool,
    /// Everything this learner turned in here, with review state
    pub submissions: Vec<ExerciseSubmission>,
}

#[derive(Serialize)]
pub struct CompletionRecord {
    pub lesson_id: i64,
    pub learner_id: String,
    pub completed: bool,
    /// False when the lesson had already been completed earlier
    pub newly_completed: bool,
}

#[derive(Serialize)]
pub struct LessonProgressSummary {
    pub lesson_id: i64,
    pub position: i64,
    pub title: String,
    pub completed: bool,
    pub can_complete: bool,
    /// None when the lesson has no quiz
    pub quiz_passed: Option<bool>,
    pub best_percentage: Option<u32>,
}

#[derive(Serialize)]
pub struct CourseProgress {
    pub course_id: i64,
    pub learner_id: String,
    pub lessons_total: usize,
    pub lessons_completed: usize,
    pub lessons: Vec<LessonProgressSummary>,
}

pub async fn lesson_progress(
    State(state): State<AppState>,
    Path(lesson_id): Path<i64>,
    Query(query): Query<LearnerQuery>,
) -> Result<Json<LessonProgress>, ApiError> {
    let conn = db::try_lock(&state.pool)?;
    let lesson = db::get_lesson_by_id(&conn, lesson_id)?.ok_or(ApiError::NotFound("lesson"))?;

    let submitted = db::submitted_indices(&conn, lesson_id, &query.learner_id)?;
    let mut submitted_indices: Vec<usize> = submitted.iter().copied().collect();
    submitted_indices.sort_unstable();

    Ok(Json(LessonProgress {
        lesson_id,
        outstanding_exercises: completion::outstanding_exercises(&lesson.exercises, &submitted),
        can_complete: completion::can_complete(&lesson.exercises, &submitted),
        completed: db::is_lesson_complete(&conn, lesson_id, &query.learner_id)?,
        submissions: db::list_submissions_for_lesson(&conn, lesson_id, &query.learner_id)?,
        submitted_indices,
        learner_id: query.learner_id,
    }))
}

/// Mark a lesson complete. Refused with 409 and the outstanding exercise
/// list while any practical exercise lacks a submission.
pub async fn complete_lesson(
    State(state): State<AppState>,
    Path(lesson_id): Path<i64>,
    Json(req): Json<CompleteRequest>,
) -> Result<Json<CompletionRecord>, ApiError> {
    if req.learner_id.trim().is_empty() {
        return Err(ApiError::BadRequest("learner_id must not be empty".to_string()));
    }

    let conn = db::try_lock(&state.pool)?;
    let lesson = db::get_lesson_by_id(&conn, lesson_id)?.ok_or(ApiError::NotFound("lesson"))?;
    if !db::is_enrolled(&conn, lesson.course_id, &req.learner_id)? {
        return Err(ApiError::Forbidden("learner is not enrolled in this course".to_string()));
    }

    let submitted = db::submitted_indices(&conn, lesson_id, &req.learner_id)?;
    let outstanding = completion::outstanding_exercises(&lesson.exercises, &submitted);
    if !outstanding.is_empty() {
        return Err(ApiError::CompletionBlocked { outstanding });
    }

    let newly_completed = db::mark_lesson_complete(&conn, lesson_id, &req.learner_id)?;
    if newly_completed {
        tracing::info!("Lesson {} completed by {}", lesson_id, req.learner_id);
    }

    Ok(Json(CompletionRecord {
        lesson_id,
        learner_id: req.learner_id,
        completed: true,
        newly_completed,
    }))
}

pub async fn course_progress(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
    Query(query): Query<LearnerQuery>,
) -> Result<Json<CourseProgress>, ApiError> {
    let conn = db::try_lock(&state.pool)?;
    if db::get_course_by_id(&conn, course_id)?.is_none() {
        return Err(ApiError::NotFound("course"));
    }

    let lessons = db::list_lessons_for_course(&conn, course_id)?;
    let completed_ids = db::completed_lesson_ids(&conn, course_id, &query.learner_id)?;

    let mut summaries = Vec::with_capacity(lessons.len());
    for lesson in &lessons {
        let submitted = db::submitted_indices(&conn, lesson.id, &query.learner_id)?;
        let (quiz_passed, best_percentage) = if lesson.quiz.is_some() {
            (
                Some(db::has_passed_quiz(&conn, lesson.id, &query.learner_id)?),
                db::best_percentage(&conn, lesson.id, &query.learner_id)?,
            )
        } else {
            (None, None)
        };

        summaries.push(LessonProgressSummary {
            lesson_id: lesson.id,
            position: lesson.position,
            title: lesson.title.clone(),
            completed: completed_ids.contains(&lesson.id),
            can_complete: completion::can_complete(&lesson.exercises, &submitted),
            quiz_passed,
            best_percentage,
        });
    }

    Ok(Json(CourseProgress {
        course_id,
        lessons_total: lessons.len(),
        lessons_completed: completed_ids.len(),
        lessons: summaries,
        learner_id: query.learner_id,
    }))
}
