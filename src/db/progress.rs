//! Lesson completion records

use chrono::Utc;
use rusqlite::{Connection, Result, params};
use std::collections::HashSet;

/// Record a completion. Returns false when the lesson was already complete
/// for this learner.
pub fn mark_lesson_complete(conn: &Connection, lesson_id: i64, learner_id: &str) -> Result<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO lesson_completions (lesson_id, learner_id, completed_at) VALUES (?1, ?2, ?3)",
        params![lesson_id, learner_id, Utc::now().to_rfc3339()],
    )?;
    Ok(changed > 0)
}

pub fn is_lesson_complete(conn: &Connection, lesson_id: i64, learner_id: &str) -> Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM lesson_completions WHERE lesson_id = ?1 AND learner_id = ?2",
        params![lesson_id, learner_id],
        |row| row.get(0),
    )
}

/// Ids of this learner's completed lessons within one course
pub fn completed_lesson_ids(
    conn: &Connection,
    course_id: i64,
    learner_id: &str,
) -> Result<HashSet<i64>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT lc.lesson_id
    FROM lesson_completions lc
    JOIN lessons l ON l.id = lc.lesson_id
    WHERE l.course_id = ?1 AND lc.learner_id = ?2
    "#,
    )?;
    let ids = stmt
        .query_map(params![course_id, learner_id], |row| row.get::<_, i64>(0))?
        .collect::<Result<HashSet<_>>>()?;
    Ok(ids)
}

/// How many of this course's lessons the learner has completed
pub fn count_completed_lessons(
    conn: &Connection,
    course_id: i64,
    learner_id: &str,
) -> Result<i64> {
    conn.query_row(
        r#"
    SELECT COUNT(*)
    FROM lesson_completions lc
    JOIN lessons l ON l.id = lc.lesson_id
    WHERE l.course_id = ?1 AND lc.learner_id = ?2
    "#,
        params![course_id, learner_id],
        |row| row.get(0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{insert_course, insert_lesson, run_migrations};

    #[test]
    fn test_completion_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let course = insert_course(&conn, "C", None, None).unwrap();
        let lesson = insert_lesson(&conn, course.id, "L", "", &[], None).unwrap();

        assert!(!is_lesson_complete(&conn, lesson.id, "learner-1").unwrap());
        assert!(mark_lesson_complete(&conn, lesson.id, "learner-1").unwrap());
        assert!(!mark_lesson_complete(&conn, lesson.id, "learner-1").unwrap());
        assert!(is_lesson_complete(&conn, lesson.id, "learner-1").unwrap());
    }

    #[test]
    fn test_completed_lesson_ids_scopes_to_course_and_learner() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let course_a = insert_course(&conn, "A", None, None).unwrap();
        let course_b = insert_course(&conn, "B", None, None).unwrap();
        let a1 = insert_lesson(&conn, course_a.id, "A1", "", &[], None).unwrap();
        let a2 = insert_lesson(&conn, course_a.id, "A2", "", &[], None).unwrap();
        let b1 = insert_lesson(&conn, course_b.id, "B1", "", &[], None).unwrap();

        mark_lesson_complete(&conn, a1.id, "learner-1").unwrap();
        mark_lesson_complete(&conn, b1.id, "learner-1").unwrap();
        mark_lesson_complete(&conn, a2.id, "learner-2").unwrap();

        let ids = completed_lesson_ids(&conn, course_a.id, "learner-1").unwrap();
        assert_eq!(ids, HashSet::from([a1.id]));
    }

    #[test]
    fn test_count_completed_lessons_scopes_to_course_and_learner() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let course_a = insert_course(&conn, "A", None, None).unwrap();
        let course_b = insert_course(&conn, "B", None, None).unwrap();
        let a1 = insert_lesson(&conn, course_a.id, "A1", "", &[], None).unwrap();
        let a2 = insert_lesson(&conn, course_a.id, "A2", "", &[], None).unwrap();
        let b1 = insert_lesson(&conn, course_b.id, "B1", "", &[], None).unwrap();

        assert_eq!(count_completed_lessons(&conn, course_a.id, "learner-1").unwrap(), 0);

        mark_lesson_complete(&conn, a1.id, "learner-1").unwrap();
        mark_lesson_complete(&conn, a2.id, "learner-1").unwrap();
        mark_lesson_complete(&conn, b1.id, "learner-1").unwrap();
        mark_lesson_complete(&conn, a1.id, "learner-2").unwrap();

        assert_eq!(count_completed_lessons(&conn, course_a.id, "learner-1").unwrap(), 2);
        assert_eq!(count_completed_lessons(&conn, course_b.id, "learner-1").unwrap(), 1);
        assert_eq!(count_completed_lessons(&conn, course_a.id, "learner-2").unwrap(), 1);
    }
}
