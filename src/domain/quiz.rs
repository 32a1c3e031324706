use serde::{Deserialize, Serialize};

use crate::config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
  Single,
  Multiple,
  Text,
}

/// Correct-answer definition: a bare string for single-choice and text
/// questions, a set of option strings for multiple-select ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerKey {
  One(String),
  Many(Vec<String>),
}

/// A learner's answer to one question, shaped like the key it is matched
/// against. Matching to questions is positional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubmittedAnswer {
  One(String),
  Many(Vec<String>),
}

fn default_points() -> f64 {
  config::DEFAULT_QUESTION_POINTS
}

fn default_passing_score() -> u32 {
  config::DEFAULT_PASSING_SCORE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
  pub prompt: String,
  pub kind: QuestionKind,
  /// Choices shown to the learner; empty for text questions
  #[serde(default)]
  pub options: Vec<String>,
  pub answer_key: AnswerKey,
  #[serde(default = "default_points")]
  pub points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
  /// Percentage of max score required to pass
  #[serde(default = "default_passing_score")]
  pub passing_score: u32,
  pub questions: Vec<Question>,
}

// ==================== Learner-Facing View ====================

/// A question as shown to a learner: the answer key never leaves the server.
#[derive(Debug, Clone, Serialize)]
pub struct RedactedQuestion {
  pub prompt: String,
  pub kind: QuestionKind,
  pub options: Vec<String>,
  pub points: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RedactedQuiz {
  pub passing_score: u32,
  pub question_count: usize,
  pub questions: Vec<RedactedQuestion>,
}

impl Quiz {
  /// Strip answer keys for delivery to learners
  pub fn redacted(&self) -> RedactedQuiz {
    RedactedQuiz {
      passing_score: self.passing_score,
      question_count: self.questions.len(),
      questions: self
        .questions
        .iter()
        .map(|q| RedactedQuestion {
          prompt: q.prompt.clone(),
          kind: q.kind,
          options: q.options.clone(),
          points: q.points,
        })
        .collect(),
    }
  }
}

// ==================== Definition Validation ====================

/// A single problem found in a submitted quiz or exercise definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
  pub field: String,
  pub issue: String,
}

impl ValidationIssue {
  fn new(field: String, issue: &str) -> Self {
    Self {
      field,
      issue: issue.to_string(),
    }
  }
}

/// Check a quiz definition before it is saved or offered as a draft.
///
/// Grading itself never fails, so authoring is where malformed definitions
/// get stopped: answer keys must match the question shape and reference
/// real options, prompts must be non-empty, and weights must be positive.
/// A quiz with no questions is accepted (authors add questions later).
pub fn validate_quiz(quiz: &Quiz) -> Result<(), Vec<ValidationIssue>> {
  let mut issues = Vec::new();

  if quiz.passing_score > 100 {
    issues.push(ValidationIssue::new(
      "passing_score".to_string(),
      "passing score must be between 0 and 100",
    ));
  }

  for (i, question) in quiz.questions.iter().enumerate() {
    let field = |name: &str| format!("questions[{}].{}", i, name);

    if question.prompt.trim().is_empty() {
      issues.push(ValidationIssue::new(field("prompt"), "prompt must not be empty"));
    }

    // NaN fails this comparison too
    if !(question.points > 0.0) {
      issues.push(ValidationIssue::new(field("points"), "points must be positive"));
    }

    match (question.kind, &question.answer_key) {
      (QuestionKind::Single, AnswerKey::One(value)) => {
        if !question.options.iter().any(|o| o == value) {
          issues.push(ValidationIssue::new(
            field("answer_key"),
            "answer key must be one of the options",
          ));
        }
      }
      (QuestionKind::Multiple, AnswerKey::Many(values)) => {
        for value in values {
          if !question.options.iter().any(|o| o == value) {
            issues.push(ValidationIssue::new(
              field("answer_key"),
              "answer key entries must all be options",
            ));
            break;
          }
        }
        let mut seen = std::collections::HashSet::new();
        if values.iter().any(|v| !seen.insert(v.as_str())) {
          issues.push(ValidationIssue::new(
            field("answer_key"),
            "answer key entries must be unique",
          ));
        }
      }
      (QuestionKind::Text, AnswerKey::One(_)) => {}
      _ => {
        issues.push(ValidationIssue::new(
          field("answer_key"),
          "answer key shape must match the question kind",
        ));
      }
    }
  }

  if issues.is_empty() { Ok(()) } else { Err(issues) }
}
