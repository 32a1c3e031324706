//! Enrollment tracking: which learner is signed up for which course

use chrono::Utc;
use rusqlite::{Connection, Result, params};

use super::courses::parse_timestamp;
use crate::domain::Enrollment;

/// Enroll a learner. Returns None when the learner is already enrolled.
pub fn insert_enrollment(
    conn: &Connection,
    course_id: i64,
    learner_id: &str,
) -> Result<Option<Enrollment>> {
    let enrolled_at = Utc::now();
    let changed = conn.execute(
        "INSERT OR IGNORE INTO enrollments (course_id, learner_id, enrolled_at) VALUES (?1, ?2, ?3)",
        params![course_id, learner_id, enrolled_at.to_rfc3339()],
    )?;
    if changed == 0 {
        return Ok(None);
    }
    Ok(Some(Enrollment {
        id: conn.last_insert_rowid(),
        course_id,
        learner_id: learner_id.to_string(),
        enrolled_at,
    }))
}

pub fn get_enrollment(
    conn: &Connection,
    course_id: i64,
    learner_id: &str,
) -> Result<Option<Enrollment>> {
    let mut stmt = conn.prepare(
        "SELECT id, course_id, learner_id, enrolled_at FROM enrollments WHERE course_id = ?1 AND learner_id = ?2",
    )?;
    let mut rows = stmt.query(params![course_id, learner_id])?;
    if let Some(row) = rows.next()? {
        Ok(Some(row_to_enrollment(row)?))
    } else {
        Ok(None)
    }
}

pub fn is_enrolled(conn: &Connection, course_id: i64, learner_id: &str) -> Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM enrollments WHERE course_id = ?1 AND learner_id = ?2",
        params![course_id, learner_id],
        |row| row.get(0),
    )
}

pub fn list_enrollments_for_learner(conn: &Connection, learner_id: &str) -> Result<Vec<Enrollment>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT id, course_id, learner_id, enrolled_at
    FROM enrollments WHERE learner_id = ?1 ORDER BY enrolled_at, id
    "#,
    )?;
    let enrollments = stmt
        .query_map(params![learner_id], |row| row_to_enrollment(row))?
        .collect::<Result<Vec<_>>>()?;
    Ok(enrollments)
}

fn row_to_enrollment(row: &rusqlite::Row) -> Result<Enrollment> {
    let enrolled_at_str: String = row.get(3)?;
    Ok(Enrollment {
        id: row.get(0)?,
        course_id: row.get(1)?,
        learner_id: row.get(2)?,
        enrolled_at: parse_timestamp(&enrolled_at_str),
    })
}
