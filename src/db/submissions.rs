//! Exercise submission storage and review state

use chrono::Utc;
use rusqlite::{Connection, Result, params};
use std::collections::HashSet;

use super::courses::parse_timestamp;
use crate::domain::{ExerciseSubmission, ReviewStatus};

pub fn insert_submission(
    conn: &Connection,
    lesson_id: i64,
    exercise_index: usize,
    learner_id: &str,
    content: &str,
) -> Result<ExerciseSubmission> {
    let submitted_at = Utc::now();
    conn.execute(
        r#"
    INSERT INTO exercise_submissions (lesson_id, exercise_index, learner_id, content, status, submitted_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    "#,
        params![
            lesson_id,
            exercise_index as i64,
            learner_id,
            content,
            ReviewStatus::Pending.as_str(),
            submitted_at.to_rfc3339(),
        ],
    )?;

    Ok(ExerciseSubmission {
        id: conn.last_insert_rowid(),
        lesson_id,
        exercise_index,
        learner_id: learner_id.to_string(),
        content: content.to_string(),
        status: ReviewStatus::Pending,
        feedback: None,
        submitted_at,
        reviewed_at: None,
    })
}

pub fn get_submission_by_id(conn: &Connection, id: i64) -> Result<Option<ExerciseSubmission>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT id, lesson_id, exercise_index, learner_id, content, status, feedback, submitted_at, reviewed_at
    FROM exercise_submissions WHERE id = ?1
    "#,
    )?;
    let mut rows = stmt.query(params![id])?;
    if let Some(row) = rows.next()? {
        Ok(Some(row_to_submission(row)?))
    } else {
        Ok(None)
    }
}

/// Record a review verdict. Returns false when the submission does not exist.
pub fn set_submission_review(
    conn: &Connection,
    id: i64,
    status: ReviewStatus,
    feedback: Option<&str>,
) -> Result<bool> {
    let changed = conn.execute(
        "UPDATE exercise_submissions SET status = ?1, feedback = ?2, reviewed_at = ?3 WHERE id = ?4",
        params![status.as_str(), feedback, Utc::now().to_rfc3339(), id],
    )?;
    Ok(changed > 0)
}

/// Exercise positions this learner has submitted for, regardless of review
/// status. Feeds the completion gate.
pub fn submitted_indices(
    conn: &Connection,
    lesson_id: i64,
    learner_id: &str,
) -> Result<HashSet<usize>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT exercise_index FROM exercise_submissions WHERE lesson_id = ?1 AND learner_id = ?2",
    )?;
    let indices = stmt
        .query_map(params![lesson_id, learner_id], |row| row.get::<_, i64>(0))?
        .collect::<Result<Vec<_>>>()?;
    Ok(indices.into_iter().map(|i| i as usize).collect())
}

pub fn list_submissions_for_lesson(
    conn: &Connection,
    lesson_id: i64,
    learner_id: &str,
) -> Result<Vec<ExerciseSubmission>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT id, lesson_id, exercise_index, learner_id, content, status, feedback, submitted_at, reviewed_at
    FROM exercise_submissions
    WHERE lesson_id = ?1 AND learner_id = ?2
    ORDER BY submitted_at, id
    "#,
    )?;
    let submissions = stmt
        .query_map(params![lesson_id, learner_id], |row| row_to_submission(row))?
        .collect::<Result<Vec<_>>>()?;
    Ok(submissions)
}

fn row_to_submission(row: &rusqlite::Row) -> Result<ExerciseSubmission> {
    let exercise_index: i64 = row.get(2)?;
    let status_str: String = row.get(5)?;
    let submitted_at_str: String = row.get(7)?;
    let reviewed_at_str: Option<String> = row.get(8)?;

    Ok(ExerciseSubmission {
        id: row.get(0)?,
        lesson_id: row.get(1)?,
        exercise_index: exercise_index as usize,
        learner_id: row.get(3)?,
        content: row.get(4)?,
        status: ReviewStatus::from_str(&status_str).unwrap_or(ReviewStatus::Pending),
        feedback: row.get(6)?,
        submitted_at: parse_timestamp(&submitted_at_str),
        reviewed_at: reviewed_at_str.map(|s| parse_timestamp(&s)),
    })
}
