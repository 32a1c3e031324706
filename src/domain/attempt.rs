use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::grading::QuestionResult;

/// A graded quiz attempt. The full grade is computed once at submission
/// time and stored; re-grading never happens after the fact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizAttempt {
  pub id: i64,
  pub lesson_id: i64,
  pub learner_id: String,
  pub score: f64,
  pub max_score: f64,
  pub percentage: u32,
  pub passed: bool,
  pub breakdown: Vec<QuestionResult>,
  pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
  Pending,
  Approved,
  Rejected,
}

impl ReviewStatus {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "pending" => Some(Self::Pending),
      "approved" => Some(Self::Approved),
      "rejected" => Some(Self::Rejected),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Pending => "pending",
      Self::Approved => "approved",
      Self::Rejected => "rejected",
    }
  }
}

/// An artifact a learner turned in for one practical exercise. Any
/// submission satisfies the completion gate regardless of review status;
/// review feedback is informational.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseSubmission {
  pub id: i64,
  pub lesson_id: i64,
  pub exercise_index: usize,
  pub learner_id: String,
  pub content: String,
  pub status: ReviewStatus,
  pub feedback: Option<String>,
  pub submitted_at: DateTime<Utc>,
  pub reviewed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
  pub id: i64,
  pub course_id: i64,
  pub learner_id: String,
  pub enrolled_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
  Enrollment,
  QuizResult,
  SubmissionReview,
}

impl NotificationKind {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "enrollment" => Some(Self::Enrollment),
      "quiz_result" => Some(Self::QuizResult),
      "submission_review" => Some(Self::SubmissionReview),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Enrollment => "enrollment",
      Self::QuizResult => "quiz_result",
      Self::SubmissionReview => "submission_review",
    }
  }
}

/// Stored notification, polled by the SPA. Delivery channels (email, push)
/// live outside this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
  pub id: i64,
  pub learner_id: String,
  pub kind: NotificationKind,
  pub body: String,
  pub read: bool,
  pub created_at: DateTime<Utc>,
}
