//! Notification storage. The SPA polls these; no delivery channel here.

use chrono::Utc;
use rusqlite::{Connection, Result, params};

use super::courses::parse_timestamp;
use crate::domain::{Notification, NotificationKind};

pub fn insert_notification(
    conn: &Connection,
    learner_id: &str,
    kind: NotificationKind,
    body: &str,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO notifications (learner_id, kind, body, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![learner_id, kind.as_str(), body, Utc::now().to_rfc3339()],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Newest notifications first, optionally restricted to unread ones
pub fn list_notifications(
    conn: &Connection,
    learner_id: &str,
    unread_only: bool,
    limit: i64,
) -> Result<Vec<Notification>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT id, learner_id, kind, body, read, created_at
    FROM notifications
    WHERE learner_id = ?1 AND (?2 = 0 OR read = 0)
    ORDER BY id DESC
    LIMIT ?3
    "#,
    )?;
    let notifications = stmt
        .query_map(params![learner_id, unread_only, limit], |row| {
            row_to_notification(row)
        })?
        .collect::<Result<Vec<_>>>()?;
    Ok(notifications)
}

/// Mark one notification read. Scoped to the learner so one learner cannot
/// touch another's rows. Returns false when nothing matched.
pub fn mark_notification_read(conn: &Connection, id: i64, learner_id: &str) -> Result<bool> {
    let changed = conn.execute(
        "UPDATE notifications SET read = 1 WHERE id = ?1 AND learner_id = ?2",
        params![id, learner_id],
    )?;
    Ok(changed > 0)
}

pub fn unread_count(conn: &Connection, learner_id: &str) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM notifications WHERE learner_id = ?1 AND read = 0",
        params![learner_id],
        |row| row.get(0),
    )
}

fn row_to_notification(row: &rusqlite::Row) -> Result<Notification> {
    let kind_str: String = row.get(2)?;
    let read_int: i64 = row.get(4)?;
    let created_at_str: String = row.get(5)?;

    Ok(Notification {
        id: row.get(0)?,
        learner_id: row.get(1)?,
        kind: NotificationKind::from_str(&kind_str).unwrap_or(NotificationKind::Enrollment),
        body: row.get(3)?,
        read: read_int != 0,
        created_at: parse_timestamp(&created_at_str),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::run_migrations;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn test_notifications_list_newest_first() {
        let conn = test_conn();
        insert_notification(&conn, "learner-1", NotificationKind::Enrollment, "enrolled").unwrap();
        insert_notification(&conn, "learner-1", NotificationKind::QuizResult, "passed").unwrap();
        insert_notification(&conn, "learner-2", NotificationKind::Enrollment, "other").unwrap();

        let mine = list_notifications(&conn, "learner-1", false, 10).unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].body, "passed");
        assert_eq!(mine[0].kind, NotificationKind::QuizResult);
        assert!(!mine[0].read);
    }

    #[test]
    fn test_unread_filter() {
        let conn = test_conn();
        let first = insert_notification(&conn, "learner-1", NotificationKind::Enrollment, "a").unwrap();
        insert_notification(&conn, "learner-1", NotificationKind::QuizResult, "b").unwrap();
        mark_notification_read(&conn, first, "learner-1").unwrap();

        let unread = list_notifications(&conn, "learner-1", true, 10).unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].body, "b");

        let all = list_notifications(&conn, "learner-1", false, 10).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_mark_read_is_scoped_to_learner() {
        let conn = test_conn();
        let id = insert_notification(&conn, "learner-1", NotificationKind::SubmissionReview, "reviewed").unwrap();

        assert_eq!(unread_count(&conn, "learner-1").unwrap(), 1);
        assert!(!mark_notification_read(&conn, id, "learner-2").unwrap());
        assert_eq!(unread_count(&conn, "learner-1").unwrap(), 1);

        assert!(mark_notification_read(&conn, id, "learner-1").unwrap());
        assert_eq!(unread_count(&conn, "learner-1").unwrap(), 0);

        let mine = list_notifications(&conn, "learner-1", false, 10).unwrap();
        assert!(mine[0].read);
    }
}
