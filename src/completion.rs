//! Lesson completion gating.
//!
//! A lesson may be marked complete once every practical exercise has at
//! least one submission. Theoretical exercises never block, and review
//! status is irrelevant: turning something in is what counts. Lessons
//! with no practical exercises can be completed immediately.

use std::collections::HashSet;

use crate::domain::{Exercise, ExerciseKind};

/// Positions of the practical exercises, ascending
pub fn required_indices(exercises: &[Exercise]) -> Vec<usize> {
  exercises
    .iter()
    .enumerate()
    .filter(|(_, exercise)| exercise.kind == ExerciseKind::Practical)
    .map(|(i, _)| i)
    .collect()
}

/// True when every practical exercise has a submission
pub fn can_complete(exercises: &[Exercise], submitted: &HashSet<usize>) -> bool {
  required_indices(exercises)
    .iter()
    .all(|i| submitted.contains(i))
}

/// Practical exercises still missing a submission, in ascending position
/// order. Clients number these 1-based for display.
pub fn outstanding_exercises(exercises: &[Exercise], submitted: &HashSet<usize>) -> Vec<usize> {
  required_indices(exercises)
    .into_iter()
    .filter(|i| !submitted.contains(i))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn practical(prompt: &str) -> Exercise {
    Exercise {
      prompt: prompt.to_string(),
      kind: ExerciseKind::Practical,
    }
  }

  fn theoretical(prompt: &str) -> Exercise {
    Exercise {
      prompt: prompt.to_string(),
      kind: ExerciseKind::Theoretical,
    }
  }

  fn submitted(indices: &[usize]) -> HashSet<usize> {
    indices.iter().copied().collect()
  }

  #[test]
  fn test_all_practical_submitted_allows_completion() {
    let exercises = vec![practical("p0"), theoretical("t1"), practical("p2")];
    assert!(can_complete(&exercises, &submitted(&[0, 2])));
  }

  #[test]
  fn test_missing_practical_blocks_completion() {
    let exercises = vec![practical("p0"), theoretical("t1"), practical("p2")];
    let done = submitted(&[0]);
    assert!(!can_complete(&exercises, &done));
    assert_eq!(outstanding_exercises(&exercises, &done), vec![2]);
  }

  #[test]
  fn test_lesson_without_practicals_is_always_completable() {
    let exercises = vec![theoretical("t0"), theoretical("t1")];
    assert!(can_complete(&exercises, &submitted(&[])));
    assert!(can_complete(&[], &submitted(&[])));
  }

  #[test]
  fn test_outstanding_is_ascending() {
    let exercises = vec![practical("p0"), practical("p1"), theoretical("t2"), practical("p3")];
    assert_eq!(outstanding_exercises(&exercises, &submitted(&[1])), vec![0, 3]);
    assert_eq!(
      outstanding_exercises(&exercises, &submitted(&[])),
      vec![0, 1, 3]
    );
  }

  #[test]
  fn test_unrelated_submission_indices_are_ignored() {
    // stale rows pointing past the exercise list must not block or unblock
    let exercises = vec![practical("p0"), theoretical("t1")];
    assert!(can_complete(&exercises, &submitted(&[0, 7])));
    assert!(!can_complete(&exercises, &submitted(&[7])));
  }

  #[test]
  fn test_theoretical_submissions_do_not_satisfy_practicals() {
    let exercises = vec![practical("p0"), theoretical("t1")];
    assert!(!can_complete(&exercises, &submitted(&[1])));
  }

  #[test]
  fn test_required_indices_selects_practicals() {
    let exercises = vec![theoretical("t0"), practical("p1"), practical("p2")];
    assert_eq!(required_indices(&exercises), vec![1, 2]);
    assert!(required_indices(&[]).is_empty());
  }
}
