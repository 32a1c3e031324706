//! Course and lesson CRUD and query operations

use chrono::{DateTime, Utc};
use rusqlite::{Connection, Result, params};

use super::{LogOnError, to_json};
use crate::domain::{Course, Exercise, Lesson, Quiz};

pub fn insert_course(
    conn: &Connection,
    title: &str,
    description: Option<&str>,
    category: Option<&str>,
) -> Result<Course> {
    let created_at = Utc::now();
    conn.execute(
        "INSERT INTO courses (title, description, category, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![title, description, category, created_at.to_rfc3339()],
    )?;
    Ok(Course {
        id: conn.last_insert_rowid(),
        title: title.to_string(),
        description: description.map(|s| s.to_string()),
        category: category.map(|s| s.to_string()),
        created_at,
    })
}

pub fn get_course_by_id(conn: &Connection, id: i64) -> Result<Option<Course>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, description, category, created_at FROM courses WHERE id = ?1",
    )?;
    let mut rows = stmt.query(params![id])?;
    if let Some(row) = rows.next()? {
        Ok(Some(row_to_course(row)?))
    } else {
        Ok(None)
    }
}

pub fn list_courses(conn: &Connection) -> Result<Vec<Course>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, description, category, created_at FROM courses ORDER BY created_at, id",
    )?;
    let courses = stmt
        .query_map([], |row| row_to_course(row))?
        .collect::<Result<Vec<_>>>()?;
    Ok(courses)
}

pub fn insert_lesson(
    conn: &Connection,
    course_id: i64,
    title: &str,
    body: &str,
    exercises: &[Exercise],
    quiz: Option<&Quiz>,
) -> Result<Lesson> {
    let position: i64 = conn.query_row(
        "SELECT COALESCE(MAX(position), 0) + 1 FROM lessons WHERE course_id = ?1",
        params![course_id],
        |row| row.get(0),
    )?;
    let created_at = Utc::now();
    let quiz_json = quiz.map(to_json).transpose()?;

    conn.execute(
        r#"
    INSERT INTO lessons (course_id, position, title, body, exercises, quiz, created_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
    "#,
        params![
            course_id,
            position,
            title,
            body,
            to_json(&exercises)?,
            quiz_json,
            created_at.to_rfc3339(),
        ],
    )?;

    Ok(Lesson {
        id: conn.last_insert_rowid(),
        course_id,
        position,
        title: title.to_string(),
        body: body.to_string(),
        exercises: exercises.to_vec(),
        quiz: quiz.cloned(),
        created_at,
    })
}

pub fn get_lesson_by_id(conn: &Connection, id: i64) -> Result<Option<Lesson>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT id, course_id, position, title, body, exercises, quiz, created_at
    FROM lessons WHERE id = ?1
    "#,
    )?;
    let mut rows = stmt.query(params![id])?;
    if let Some(row) = rows.next()? {
        Ok(Some(row_to_lesson(row)?))
    } else {
        Ok(None)
    }
}

pub fn list_lessons_for_course(conn: &Connection, course_id: i64) -> Result<Vec<Lesson>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT id, course_id, position, title, body, exercises, quiz, created_at
    FROM lessons WHERE course_id = ?1 ORDER BY position
    "#,
    )?;
    let lessons = stmt
        .query_map(params![course_id], |row| row_to_lesson(row))?
        .collect::<Result<Vec<_>>>()?;
    Ok(lessons)
}

pub fn count_lessons_for_course(conn: &Connection, course_id: i64) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM lessons WHERE course_id = ?1",
        params![course_id],
        |row| row.get(0),
    )
}

/// Replace a lesson's quiz (None removes it). Returns false when the
/// lesson does not exist.
pub fn update_lesson_quiz(conn: &Connection, lesson_id: i64, quiz: Option<&Quiz>) -> Result<bool> {
    let quiz_json = quiz.map(to_json).transpose()?;
    let changed = conn.execute(
        "UPDATE lessons SET quiz = ?1 WHERE id = ?2",
        params![quiz_json, lesson_id],
    )?;
    Ok(changed > 0)
}

fn row_to_course(row: &rusqlite::Row) -> Result<Course> {
    let created_at_str: String = row.get(4)?;
    Ok(Course {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        created_at: parse_timestamp(&created_at_str),
    })
}

fn row_to_lesson(row: &rusqlite::Row) -> Result<Lesson> {
    let exercises_json: String = row.get(5)?;
    let quiz_json: Option<String> = row.get(6)?;
    let created_at_str: String = row.get(7)?;

    Ok(Lesson {
        id: row.get(0)?,
        course_id: row.get(1)?,
        position: row.get(2)?,
        title: row.get(3)?,
        body: row.get(4)?,
        exercises: serde_json::from_str(&exercises_json)
            .log_warn_default("Failed to parse lesson exercises"),
        quiz: quiz_json
            .and_then(|json| serde_json::from_str(&json).log_warn("Failed to parse lesson quiz")),
        created_at: parse_timestamp(&created_at_str),
    })
}

pub(crate) fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
