//! Quiz grading.
//!
//! Evaluates a learner's submitted answers against a quiz definition and
//! produces per-question and aggregate results. Grading is total and
//! permissive: missing or malformed answers mark the affected question
//! incorrect, never an error. Comparison for single-choice and text
//! answers is exact (case- and whitespace-sensitive); multiple-select
//! questions are all-or-nothing on set equality.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::{AnswerKey, Question, QuestionKind, Quiz, SubmittedAnswer};

/// Outcome for one question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResult {
  pub question_index: usize,
  /// Echo of what the learner sent, None when no answer reached this slot
  pub submitted_answer: Option<SubmittedAnswer>,
  pub is_correct: bool,
  pub points_awarded: f64,
}

/// Aggregate outcome of grading one submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeResult {
  pub score: f64,
  pub max_score: f64,
  /// Whole-number percentage, rounded half away from zero
  pub percentage: u32,
  pub passed: bool,
  pub breakdown: Vec<QuestionResult>,
}

/// Grade a submission against a quiz.
///
/// Answers are matched to questions by position. Submissions shorter than
/// the quiz grade the unanswered tail incorrect; extra answers beyond the
/// last question are ignored.
pub fn grade(quiz: &Quiz, answers: &[SubmittedAnswer]) -> GradeResult {
  let mut score = 0.0;
  let mut max_score = 0.0;
  let mut breakdown = Vec::with_capacity(quiz.questions.len());

  for (i, question) in quiz.questions.iter().enumerate() {
    let answer = answers.get(i);
    let is_correct = evaluate(question, answer);
    let points_awarded = if is_correct { question.points } else { 0.0 };

    score += points_awarded;
    max_score += question.points;
    breakdown.push(QuestionResult {
      question_index: i,
      submitted_answer: answer.cloned(),
      is_correct,
      points_awarded,
    });
  }

  let percentage = percentage_of(score, max_score);
  GradeResult {
    score,
    max_score,
    percentage,
    passed: percentage >= quiz.passing_score,
    breakdown,
  }
}

/// Whole-number percentage of `score` over `max_score`, 0 when there is
/// nothing to score
fn percentage_of(score: f64, max_score: f64) -> u32 {
  if max_score > 0.0 {
    (score / max_score * 100.0).round() as u32
  } else {
    0
  }
}

/// Evaluate one question. A shape mismatch between key and answer grades
/// incorrect; for multiple-select, any non-array answer counts as
/// selecting nothing (which matches an empty key).
fn evaluate(question: &Question, answer: Option<&SubmittedAnswer>) -> bool {
  match question.kind {
    QuestionKind::Single | QuestionKind::Text => match (&question.answer_key, answer) {
      (AnswerKey::One(expected), Some(SubmittedAnswer::One(submitted))) => submitted == expected,
      _ => false,
    },
    QuestionKind::Multiple => match &question.answer_key {
      AnswerKey::Many(expected) => {
        let expected: HashSet<&str> = expected.iter().map(String::as_str).collect();
        let selected: HashSet<&str> = match answer {
          Some(SubmittedAnswer::Many(options)) => options.iter().map(String::as_str).collect(),
          _ => HashSet::new(),
        };
        selected == expected
      }
      AnswerKey::One(_) => false,
    },
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn single(options: &[&str], correct: &str, points: f64) -> Question {
    Question {
      prompt: "single-choice question".to_string(),
      kind: QuestionKind::Single,
      options: options.iter().map(|s| s.to_string()).collect(),
      answer_key: AnswerKey::One(correct.to_string()),
      points,
    }
  }

  fn multiple(options: &[&str], correct: &[&str], points: f64) -> Question {
    Question {
      prompt: "multiple-select question".to_string(),
      kind: QuestionKind::Multiple,
      options: options.iter().map(|s| s.to_string()).collect(),
      answer_key: AnswerKey::Many(correct.iter().map(|s| s.to_string()).collect()),
      points,
    }
  }

  fn text(correct: &str, points: f64) -> Question {
    Question {
      prompt: "text question".to_string(),
      kind: QuestionKind::Text,
      options: vec![],
      answer_key: AnswerKey::One(correct.to_string()),
      points,
    }
  }

  fn quiz(passing_score: u32, questions: Vec<Question>) -> Quiz {
    Quiz {
      passing_score,
      questions,
    }
  }

  fn one(s: &str) -> SubmittedAnswer {
    SubmittedAnswer::One(s.to_string())
  }

  fn many(items: &[&str]) -> SubmittedAnswer {
    SubmittedAnswer::Many(items.iter().map(|s| s.to_string()).collect())
  }

  // ==================== Single Choice ====================

  #[test]
  fn test_single_choice_exact_match() {
    let q = quiz(70, vec![single(&["A", "B", "C"], "B", 1.0)]);

    let result = grade(&q, &[one("B")]);
    assert!(result.breakdown[0].is_correct);
    assert_eq!(result.breakdown[0].points_awarded, 1.0);

    let result = grade(&q, &[one("A")]);
    assert!(!result.breakdown[0].is_correct);
    assert_eq!(result.breakdown[0].points_awarded, 0.0);
  }

  #[test]
  fn test_single_choice_is_case_sensitive() {
    // comparison is byte-exact: no trimming, no case folding
    let q = quiz(70, vec![single(&["A", "B"], "B", 1.0)]);
    let result = grade(&q, &[one("b")]);
    assert!(!result.breakdown[0].is_correct);
  }

  // ==================== Multiple Select ====================

  #[test]
  fn test_multiple_requires_exact_set() {
    let q = quiz(70, vec![multiple(&["A", "B", "C"], &["A", "C"], 1.0)]);

    assert!(grade(&q, &[many(&["A", "C"])]).breakdown[0].is_correct);
    // order does not matter
    assert!(grade(&q, &[many(&["C", "A"])]).breakdown[0].is_correct);
    // subset earns nothing
    assert!(!grade(&q, &[many(&["A"])]).breakdown[0].is_correct);
    // superset earns nothing either
    assert!(!grade(&q, &[many(&["A", "B", "C"])]).breakdown[0].is_correct);
  }

  #[test]
  fn test_multiple_with_empty_key() {
    let q = quiz(70, vec![multiple(&["4", "6"], &[], 1.0)]);

    assert!(grade(&q, &[many(&[])]).breakdown[0].is_correct);
    assert!(!grade(&q, &[many(&["4"])]).breakdown[0].is_correct);
    // a missing answer is an empty selection, which matches the empty key
    assert!(grade(&q, &[]).breakdown[0].is_correct);
  }

  // ==================== Text ====================

  #[test]
  fn test_text_answer_exact_match() {
    let q = quiz(70, vec![text("TCP/IP", 1.0)]);

    assert!(grade(&q, &[one("TCP/IP")]).breakdown[0].is_correct);
    assert!(!grade(&q, &[one("Tcp/ip")]).breakdown[0].is_correct);
    assert!(!grade(&q, &[one("TCP/IP ")]).breakdown[0].is_correct);
    assert!(!grade(&q, &[one(" TCP/IP")]).breakdown[0].is_correct);
  }

  // ==================== Positional Matching ====================

  #[test]
  fn test_missing_answers_grade_incorrect() {
    let q = quiz(
      70,
      vec![
        single(&["A", "B"], "A", 1.0),
        single(&["A", "B"], "B", 1.0),
        text("x", 1.0),
      ],
    );
    let result = grade(&q, &[one("A")]);

    assert_eq!(result.breakdown.len(), 3);
    assert!(result.breakdown[0].is_correct);
    assert!(!result.breakdown[1].is_correct);
    assert!(!result.breakdown[2].is_correct);
    assert_eq!(result.breakdown[1].submitted_answer, None);
    assert_eq!(result.score, 1.0);
  }

  #[test]
  fn test_extra_answers_are_ignored() {
    let q = quiz(70, vec![single(&["A", "B"], "A", 1.0)]);
    let result = grade(&q, &[one("A"), one("B"), many(&["C"])]);

    assert_eq!(result.breakdown.len(), 1);
    assert_eq!(result.score, 1.0);
    assert_eq!(result.max_score, 1.0);
  }

  #[test]
  fn test_breakdown_echoes_submitted_answers() {
    let q = quiz(70, vec![single(&["A", "B"], "B", 2.0)]);
    let result = grade(&q, &[one("B")]);

    let entry = &result.breakdown[0];
    assert_eq!(entry.question_index, 0);
    assert_eq!(entry.submitted_answer, Some(one("B")));
    assert!(entry.is_correct);
    assert_eq!(entry.points_awarded, 2.0);
  }

  // ==================== Malformed Submissions ====================

  #[test]
  fn test_wrong_shape_grades_incorrect() {
    // an array answer to a single-choice question is just wrong
    let q = quiz(70, vec![single(&["A", "B"], "A", 1.0)]);
    let result = grade(&q, &[many(&["A"])]);
    assert!(!result.breakdown[0].is_correct);

    // a bare string answer to a multiple-select counts as selecting nothing
    let q = quiz(70, vec![multiple(&["A", "B"], &["A"], 1.0)]);
    let result = grade(&q, &[one("A")]);
    assert!(!result.breakdown[0].is_correct);
  }

  #[test]
  fn test_wrong_shape_matches_empty_multiple_key() {
    let q = quiz(70, vec![multiple(&["A", "B"], &[], 1.0)]);
    let result = grade(&q, &[one("A")]);
    assert!(result.breakdown[0].is_correct);
  }

  // ==================== Scoring and Threshold ====================

  #[test]
  fn test_percentage_and_pass_threshold() {
    let q = quiz(
      70,
      vec![single(&["A", "B"], "A", 1.0), single(&["A", "B"], "B", 1.0)],
    );

    let result = grade(&q, &[one("A"), one("A")]);
    assert_eq!(result.score, 1.0);
    assert_eq!(result.max_score, 2.0);
    assert_eq!(result.percentage, 50);
    assert!(!result.passed);

    let result = grade(&q, &[one("A"), one("B")]);
    assert_eq!(result.percentage, 100);
    assert!(result.passed);
  }

  #[test]
  fn test_pass_boundary_is_inclusive() {
    let q = quiz(
      50,
      vec![single(&["A", "B"], "A", 1.0), single(&["A", "B"], "B", 1.0)],
    );
    let result = grade(&q, &[one("A"), one("A")]);
    assert_eq!(result.percentage, 50);
    assert!(result.passed);
  }

  #[test]
  fn test_weighted_points() {
    let q = quiz(
      70,
      vec![
        single(&["A", "B"], "A", 1.0),
        multiple(&["A", "B", "C"], &["A", "B"], 3.0),
        text("x", 1.0),
      ],
    );
    let result = grade(&q, &[one("B"), many(&["A", "B"]), one("y")]);

    assert_eq!(result.score, 3.0);
    assert_eq!(result.max_score, 5.0);
    assert_eq!(result.percentage, 60);
    assert!(!result.passed);
  }

  // ==================== Rounding ====================

  #[test]
  fn test_percentage_rounds_to_nearest() {
    // 1/3 = 33.33.. -> 33, 2/3 = 66.66.. -> 67
    let q = quiz(
      70,
      vec![
        text("a", 1.0),
        text("b", 1.0),
        text("c", 1.0),
      ],
    );
    assert_eq!(grade(&q, &[one("a")]).percentage, 33);
    assert_eq!(grade(&q, &[one("a"), one("b")]).percentage, 67);
  }

  #[test]
  fn test_percentage_rounds_half_up() {
    // 1/8 = 12.5 -> 13
    let q = quiz(70, vec![text("a", 1.0), text("z", 7.0)]);
    let result = grade(&q, &[one("a")]);
    assert_eq!(result.percentage, 13);
  }

  #[test]
  fn test_half_up_rounding_interacts_with_threshold() {
    // 5/8 = 62.5 -> 63, so a 63 threshold is met
    let q = quiz(63, vec![text("a", 5.0), text("z", 3.0)]);
    let result = grade(&q, &[one("a")]);
    assert_eq!(result.percentage, 63);
    assert!(result.passed);
  }

  // ==================== Degenerate Quizzes ====================

  #[test]
  fn test_empty_quiz() {
    let result = grade(&quiz(70, vec![]), &[]);
    assert_eq!(result.score, 0.0);
    assert_eq!(result.max_score, 0.0);
    assert_eq!(result.percentage, 0);
    assert!(!result.passed);
    assert!(result.breakdown.is_empty());
  }

  #[test]
  fn test_empty_quiz_with_zero_threshold_passes() {
    let result = grade(&quiz(0, vec![]), &[]);
    assert_eq!(result.percentage, 0);
    assert!(result.passed);
  }

  #[test]
  fn test_zero_max_score_yields_zero_percentage() {
    // authoring validation rejects non-positive points, but grading stays
    // defined if such a quiz reaches it anyway
    let q = quiz(70, vec![text("a", 0.0)]);
    let result = grade(&q, &[one("a")]);
    assert_eq!(result.max_score, 0.0);
    assert_eq!(result.percentage, 0);
    assert!(!result.passed);
  }

  // ==================== Determinism ====================

  #[test]
  fn test_grading_is_deterministic() {
    let q = quiz(
      70,
      vec![
        single(&["A", "B", "C"], "B", 1.0),
        multiple(&["A", "B", "C"], &["A", "C"], 2.0),
        text("TCP/IP", 1.0),
      ],
    );
    let answers = [one("B"), many(&["C", "A"]), one("tcp/ip")];

    let first = grade(&q, &answers);
    let second = grade(&q, &answers);
    assert_eq!(first, second);
  }
}
