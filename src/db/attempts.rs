//! Quiz attempt storage

use chrono::Utc;
use rusqlite::{Connection, Result, params};

use super::courses::parse_timestamp;
use super::{LogOnError, to_json};
use crate::domain::QuizAttempt;
use crate::grading::GradeResult;

/// Persist a graded attempt. The grade is final at submission time.
pub fn insert_attempt(
    conn: &Connection,
    lesson_id: i64,
    learner_id: &str,
    grade: &GradeResult,
) -> Result<QuizAttempt> {
    let submitted_at = Utc::now();
    conn.execute(
        r#"
    INSERT INTO quiz_attempts (lesson_id, learner_id, score, max_score, percentage, passed, breakdown, submitted_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
    "#,
        params![
            lesson_id,
            learner_id,
            grade.score,
            grade.max_score,
            grade.percentage,
            grade.passed,
            to_json(&grade.breakdown)?,
            submitted_at.to_rfc3339(),
        ],
    )?;

    Ok(QuizAttempt {
        id: conn.last_insert_rowid(),
        lesson_id,
        learner_id: learner_id.to_string(),
        score: grade.score,
        max_score: grade.max_score,
        percentage: grade.percentage,
        passed: grade.passed,
        breakdown: grade.breakdown.clone(),
        submitted_at,
    })
}

/// Attempt history for one learner on one lesson, newest first
pub fn list_attempts(
    conn: &Connection,
    lesson_id: i64,
    learner_id: &str,
    limit: i64,
) -> Result<Vec<QuizAttempt>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT id, lesson_id, learner_id, score, max_score, percentage, passed, breakdown, submitted_at
    FROM quiz_attempts
    WHERE lesson_id = ?1 AND learner_id = ?2
    ORDER BY id DESC
    LIMIT ?3
    "#,
    )?;
    let attempts = stmt
        .query_map(params![lesson_id, learner_id, limit], |row| row_to_attempt(row))?
        .collect::<Result<Vec<_>>>()?;
    Ok(attempts)
}

pub fn has_passed_quiz(conn: &Connection, lesson_id: i64, learner_id: &str) -> Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM quiz_attempts WHERE lesson_id = ?1 AND learner_id = ?2 AND passed = 1",
        params![lesson_id, learner_id],
        |row| row.get(0),
    )
}

/// Best percentage across all attempts, None when the learner has none
pub fn best_percentage(conn: &Connection, lesson_id: i64, learner_id: &str) -> Result<Option<u32>> {
    let best: Option<i64> = conn.query_row(
        "SELECT MAX(percentage) FROM quiz_attempts WHERE lesson_id = ?1 AND learner_id = ?2",
        params![lesson_id, learner_id],
        |row| row.get(0),
    )?;
    Ok(best.map(|p| p as u32))
}

fn row_to_attempt(row: &rusqlite::Row) -> Result<QuizAttempt> {
    let percentage: i64 = row.get(5)?;
    let passed_int: i64 = row.get(6)?;
    let breakdown_json: String = row.get(7)?;
    let submitted_at_str: String = row.get(8)?;

    Ok(QuizAttempt {
        id: row.get(0)?,
        lesson_id: row.get(1)?,
        learner_id: row.get(2)?,
        score: row.get(3)?,
        max_score: row.get(4)?,
        percentage: percentage as u32,
        passed: passed_int != 0,
        breakdown: serde_json::from_str(&breakdown_json)
            .log_warn_default("Failed to parse attempt breakdown"),
        submitted_at: parse_timestamp(&submitted_at_str),
    })
}
