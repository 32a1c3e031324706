pub mod assistant;
pub mod attempts;
pub mod courses;
pub mod enrollments;
pub mod notifications;
pub mod progress;
pub mod submissions;

use axum::Router;
use axum::routing::{get, post, put};

use crate::state::AppState;

/// Build the API router. Kept separate from serving so integration tests
/// can drive the app directly.
pub fn router(state: AppState) -> Router {
  Router::new()
    // authoring
    .route("/api/courses", post(courses::create_course).get(courses::list_courses))
    .route("/api/courses/{id}", get(courses::get_course))
    .route("/api/courses/{id}/lessons", post(courses::create_lesson))
    .route("/api/lessons/{id}", get(courses::get_lesson))
    .route("/api/lessons/{id}/quiz", put(courses::put_lesson_quiz))
    // learner flow
    .route("/api/enrollments", post(enrollments::enroll).get(enrollments::list_for_learner))
    .route(
      "/api/lessons/{id}/attempts",
      post(attempts::submit_attempt).get(attempts::list_attempts),
    )
    .route(
      "/api/lessons/{id}/exercises/{index}/submissions",
      post(submissions::submit_exercise),
    )
    .route("/api/submissions/{id}/review", post(submissions::review_submission))
    .route("/api/lessons/{id}/progress", get(progress::lesson_progress))
    .route("/api/lessons/{id}/complete", post(progress::complete_lesson))
    .route("/api/courses/{id}/progress", get(progress::course_progress))
    // assistant
    .route("/api/assistant/ask", post(assistant::ask))
    .route("/api/assistant/quiz-drafts", post(assistant::draft_quiz))
    // notifications
    .route("/api/notifications", get(notifications::list))
    .route("/api/notifications/{id}/read", post(notifications::mark_read))
    .route("/health", get(health))
    .with_state(state)
}

async fn health() -> &'static str {
  "ok"
}
