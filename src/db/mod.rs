pub mod attempts;
pub mod courses;
pub mod enrollments;
pub mod notifications;
pub mod progress;
pub mod schema;
pub mod submissions;

use rusqlite::{Connection, Result};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::{AnswerKey, Exercise, ExerciseKind, Question, QuestionKind, Quiz};

// Re-export all public items from submodules
pub use attempts::*;
pub use courses::*;
pub use enrollments::*;
pub use notifications::*;
pub use progress::*;
pub use schema::run_migrations;
pub use submissions::*;

pub type DbPool = Arc<Mutex<Connection>>;

/// Extension trait for logging errors before discarding them
pub trait LogOnError<T> {
    /// Log the error at warn level and return None
    fn log_warn(self, context: &str) -> Option<T>;
    /// Log the error at warn level and return the default
    fn log_warn_default(self, context: &str) -> T
    where
        T: Default;
}

impl<T, E: std::fmt::Display> LogOnError<T> for std::result::Result<T, E> {
    fn log_warn(self, context: &str) -> Option<T> {
        match self {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("{}: {}", context, e);
                None
            }
        }
    }

    fn log_warn_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("{}: {}", context, e);
                T::default()
            }
        }
    }
}

/// Error returned when database lock cannot be acquired
#[derive(Debug)]
pub struct DbLockError;

impl std::fmt::Display for DbLockError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "Database unavailable")
  }
}

impl std::error::Error for DbLockError {}

/// Try to acquire the database lock, returning an error if poisoned
pub fn try_lock(pool: &DbPool) -> std::result::Result<MutexGuard<'_, Connection>, DbLockError> {
  pool.lock().map_err(|_: PoisonError<_>| {
    eprintln!("ERROR: Database mutex poisoned - a thread panicked while holding the lock");
    DbLockError
  })
}

pub fn init_db(path: &Path) -> Result<DbPool> {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).ok();
  }

  // Create backup before migrations if database exists
  if path.exists() {
    let backup_path = path.with_extension("db.backup");
    if let Err(e) = std::fs::copy(path, &backup_path) {
      eprintln!("Warning: Could not create database backup: {}", e);
    }
  }

  let conn = Connection::open(path)?;
  run_migrations(&conn)?;
  Ok(Arc::new(Mutex::new(conn)))
}

/// Serialize a value destined for a JSON TEXT column
pub(crate) fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
  serde_json::to_string(value).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

pub fn seed_demo_course(conn: &Connection) -> Result<()> {
  let count: i64 = conn.query_row("SELECT COUNT(*) FROM courses", [], |row| row.get(0))?;
  if count > 0 {
    return Ok(());
  }

  let course = insert_course(
    conn,
    "Networking Fundamentals",
    Some("Packets, protocols, and what actually happens when you load a page"),
    Some("infrastructure"),
  )?;

  insert_lesson(
    conn,
    course.id,
    "The TCP/IP Stack",
    "Every connection your machine makes flows through the same four layers. \
     This lesson walks the stack from the wire up to the application.",
    &[
      exercise(
        "Capture a packet trace of one HTTP request with tcpdump and label each layer's header",
        ExerciseKind::Practical,
      ),
      exercise(
        "Read RFC 793 sections 1-2 and note how the window field is described",
        ExerciseKind::Theoretical,
      ),
    ],
    Some(&demo_quiz()),
  )?;

  insert_lesson(
    conn,
    course.id,
    "Routing Basics",
    "How a packet finds its way across networks it has never seen.",
    &[exercise(
      "Run traceroute to three hosts on different continents and compare the paths",
      ExerciseKind::Practical,
    )],
    None,
  )?;

  Ok(())
}

// Helper to build a seed exercise
fn exercise(prompt: &str, kind: ExerciseKind) -> Exercise {
  Exercise {
    prompt: prompt.to_string(),
    kind,
  }
}

fn demo_quiz() -> Quiz {
  Quiz {
    passing_score: 70,
    questions: vec![
      Question {
        prompt: "Which layer does TCP belong to?".to_string(),
        kind: QuestionKind::Single,
        options: vec![
          "Application".to_string(),
          "Transport".to_string(),
          "Network".to_string(),
          "Link".to_string(),
        ],
        answer_key: AnswerKey::One("Transport".to_string()),
        points: 1.0,
      },
      Question {
        prompt: "Select the transport-layer protocols".to_string(),
        kind: QuestionKind::Multiple,
        options: vec![
          "TCP".to_string(),
          "UDP".to_string(),
          "IP".to_string(),
          "ICMP".to_string(),
        ],
        answer_key: AnswerKey::Many(vec!["TCP".to_string(), "UDP".to_string()]),
        points: 2.0,
      },
      Question {
        prompt: "What does TCP stand for?".to_string(),
        kind: QuestionKind::Text,
        options: vec![],
        answer_key: AnswerKey::One("Transmission Control Protocol".to_string()),
        points: 1.0,
      },
    ],
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_seed_demo_course_is_idempotent() {
    let conn = Connection::open_in_memory().unwrap();
    run_migrations(&conn).unwrap();

    seed_demo_course(&conn).unwrap();
    seed_demo_course(&conn).unwrap();

    let courses: i64 = conn
      .query_row("SELECT COUNT(*) FROM courses", [], |row| row.get(0))
      .unwrap();
    assert_eq!(courses, 1);

    let lessons: i64 = conn
      .query_row("SELECT COUNT(*) FROM lessons", [], |row| row.get(0))
      .unwrap();
    assert_eq!(lessons, 2);
  }

  #[test]
  fn test_migrations_are_rerunnable() {
    let conn = Connection::open_in_memory().unwrap();
    run_migrations(&conn).unwrap();
    run_migrations(&conn).unwrap();
  }
}
