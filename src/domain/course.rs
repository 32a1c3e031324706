use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::quiz::{Quiz, ValidationIssue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseKind {
  /// Requires a submitted artifact before the lesson can be completed
  Practical,
  /// Self-study material, never blocks completion
  Theoretical,
}

impl ExerciseKind {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "practical" => Some(Self::Practical),
      "theoretical" => Some(Self::Theoretical),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Practical => "practical",
      Self::Theoretical => "theoretical",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
  pub prompt: String,
  pub kind: ExerciseKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
  pub id: i64,
  pub title: String,
  pub description: Option<String>,
  pub category: Option<String>,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
  pub id: i64,
  pub course_id: i64,
  /// Order within the course, starting at 1
  pub position: i64,
  pub title: String,
  pub body: String,
  pub exercises: Vec<Exercise>,
  pub quiz: Option<Quiz>,
  pub created_at: DateTime<Utc>,
}

/// Check exercise definitions before saving
pub fn validate_exercises(exercises: &[Exercise]) -> Result<(), Vec<ValidationIssue>> {
  let mut issues = Vec::new();
  for (i, exercise) in exercises.iter().enumerate() {
    if exercise.prompt.trim().is_empty() {
      issues.push(ValidationIssue {
        field: format!("exercises[{}].prompt", i),
        issue: "prompt must not be empty".to_string(),
      });
    }
  }
  if issues.is_empty() { Ok(()) } else { Err(issues) }
}
