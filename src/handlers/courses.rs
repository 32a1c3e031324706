//! Course and lesson authoring plus catalog reads.
//!
//! Role enforcement lives in the upstream gateway: anything that reaches
//! these authoring routes is trusted to author. Learner-facing lesson
//! reads redact quiz answer keys.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db;
use crate::domain::{Course, Exercise, Lesson, Quiz, RedactedQuiz, validate_exercises, validate_quiz};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateCourseRequest {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
}

#[derive(Serialize)]
pub struct CourseSummary {
    #[serde(flatten)]
    pub course: Course,
    pub lesson_count: i64,
}

#[derive(Serialize)]
pub struct LessonSummary {
    pub id: i64,
    pub position: i64,
    pub title: String,
    pub exercise_count: usize,
    pub practical_count: usize,
    pub has_quiz: bool,
}

#[derive(Serialize)]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: Course,
    pub lessons: Vec<LessonSummary>,
}

#[derive(Deserialize)]
pub struct CreateLessonRequest {
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    pub quiz: Option<Quiz>,
}

/// Learner-facing lesson wire form: same lesson, quiz redacted
#[derive(Serialize)]
pub struct LessonDetail {
    pub id: i64,
    pub course_id: i64,
    pub position: i64,
    pub title: String,
    pub body: String,
    pub exercises: Vec<Exercise>,
    pub quiz: Option<RedactedQuiz>,
    pub created_at: DateTime<Utc>,
}

impl From<Lesson> for LessonDetail {
    fn from(lesson: Lesson) -> Self {
        Self {
            id: lesson.id,
            course_id: lesson.course_id,
            position: lesson.position,
            title: lesson.title,
            body: lesson.body,
            exercises: lesson.exercises,
            quiz: lesson.quiz.as_ref().map(Quiz::redacted),
            created_at: lesson.created_at,
        }
    }
}

pub async fn create_course(
    State(state): State<AppState>,
    Json(req): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<Course>), ApiError> {
    if req.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title must not be empty".to_string()));
    }

    let conn = db::try_lock(&state.pool)?;
    let course = db::insert_course(
        &conn,
        &req.title,
        req.description.as_deref(),
        req.category.as_deref(),
    )?;
    tracing::info!("Created course {} ({})", course.id, course.title);
    Ok((StatusCode::CREATED, Json(course)))
}

pub async fn list_courses(
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseSummary>>, ApiError> {
    let conn = db::try_lock(&state.pool)?;
    let courses = db::list_courses(&conn)?;

    let mut catalog = Vec::with_capacity(courses.len());
    for course in courses {
        let lesson_count = db::count_lessons_for_course(&conn, course.id)?;
        catalog.push(CourseSummary { course, lesson_count });
    }
    Ok(Json(catalog))
}

pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CourseDetail>, ApiError> {
    let conn = db::try_lock(&state.pool)?;
    let course = db::get_course_by_id(&conn, id)?.ok_or(ApiError::NotFound("course"))?;

    let lessons = db::list_lessons_for_course(&conn, id)?
        .into_iter()
        .map(|lesson| LessonSummary {
            id: lesson.id,
            position: lesson.position,
            title: lesson.title,
            exercise_count: lesson.exercises.len(),
            practical_count: crate::completion::required_indices(&lesson.exercises).len(),
            has_quiz: lesson.quiz.is_some(),
        })
        .collect();

    Ok(Json(CourseDetail { course, lessons }))
}

pub async fn create_lesson(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
    Json(req): Json<CreateLessonRequest>,
) -> Result<(StatusCode, Json<Lesson>), ApiError> {
    if req.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title must not be empty".to_string()));
    }
    validate_exercises(&req.exercises).map_err(ApiError::Invalid)?;
    if let Some(quiz) = &req.quiz {
        validate_quiz(quiz).map_err(ApiError::Invalid)?;
    }

    let conn = db::try_lock(&state.pool)?;
    if db::get_course_by_id(&conn, course_id)?.is_none() {
        return Err(ApiError::NotFound("course"));
    }

    let lesson = db::insert_lesson(
        &conn,
        course_id,
        &req.title,
        &req.body,
        &req.exercises,
        req.quiz.as_ref(),
    )?;
    tracing::info!("Created lesson {} in course {}", lesson.id, course_id);
    Ok((StatusCode::CREATED, Json(lesson)))
}

pub async fn get_lesson(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<LessonDetail>, ApiError> {
    let conn = db::try_lock(&state.pool)?;
    let lesson = db::get_lesson_by_id(&conn, id)?.ok_or(ApiError::NotFound("lesson"))?;
    Ok(Json(LessonDetail::from(lesson)))
}

/// Replace (or clear, with a JSON null body) a lesson's quiz
pub async fn put_lesson_quiz(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(quiz): Json<Option<Quiz>>,
) -> Result<Json<Lesson>, ApiError> {
    if let Some(quiz) = &quiz {
        validate_quiz(quiz).map_err(ApiError::Invalid)?;
    }

    let conn = db::try_lock(&state.pool)?;
    if !db::update_lesson_quiz(&conn, id, quiz.as_ref())? {
        return Err(ApiError::NotFound("lesson"));
    }
    let lesson = db::get_lesson_by_id(&conn, id)?.ok_or(ApiError::NotFound("lesson"))?;
    tracing::info!("Replaced quiz on lesson {}", id);
    Ok(Json(lesson))
}
