use rusqlite::{Connection, Result};

pub fn run_migrations(conn: &Connection) -> Result<()> {
  // Create tables with COMPLETE schema for new databases
  // Migrations below handle upgrades for existing databases
  conn.execute_batch(
    r#"
    CREATE TABLE IF NOT EXISTS courses (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      title TEXT NOT NULL,
      description TEXT,
      category TEXT,
      created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS lessons (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      course_id INTEGER NOT NULL,
      position INTEGER NOT NULL,
      title TEXT NOT NULL,
      body TEXT NOT NULL DEFAULT '',
      -- Exercise list and quiz definition stored as JSON
      exercises TEXT NOT NULL DEFAULT '[]',
      quiz TEXT,
      created_at TEXT NOT NULL,
      FOREIGN KEY (course_id) REFERENCES courses(id)
    );

    CREATE TABLE IF NOT EXISTS enrollments (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      course_id INTEGER NOT NULL,
      learner_id TEXT NOT NULL,
      enrolled_at TEXT NOT NULL,
      UNIQUE (course_id, learner_id),
      FOREIGN KEY (course_id) REFERENCES courses(id)
    );

    CREATE TABLE IF NOT EXISTS exercise_submissions (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      lesson_id INTEGER NOT NULL,
      exercise_index INTEGER NOT NULL,
      learner_id TEXT NOT NULL,
      content TEXT NOT NULL,
      status TEXT NOT NULL DEFAULT 'pending',
      feedback TEXT,
      submitted_at TEXT NOT NULL,
      reviewed_at TEXT,
      FOREIGN KEY (lesson_id) REFERENCES lessons(id)
    );

    CREATE TABLE IF NOT EXISTS quiz_attempts (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      lesson_id INTEGER NOT NULL,
      learner_id TEXT NOT NULL,
      score REAL NOT NULL,
      max_score REAL NOT NULL,
      percentage INTEGER NOT NULL,
      passed INTEGER NOT NULL,
      -- Per-question results stored as JSON
      breakdown TEXT NOT NULL DEFAULT '[]',
      submitted_at TEXT NOT NULL,
      FOREIGN KEY (lesson_id) REFERENCES lessons(id)
    );

    CREATE TABLE IF NOT EXISTS lesson_completions (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      lesson_id INTEGER NOT NULL,
      learner_id TEXT NOT NULL,
      completed_at TEXT NOT NULL,
      UNIQUE (lesson_id, learner_id),
      FOREIGN KEY (lesson_id) REFERENCES lessons(id)
    );

    CREATE TABLE IF NOT EXISTS notifications (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      learner_id TEXT NOT NULL,
      kind TEXT NOT NULL,
      body TEXT NOT NULL,
      read INTEGER NOT NULL DEFAULT 0,
      created_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_lessons_course ON lessons(course_id, position);
    CREATE INDEX IF NOT EXISTS idx_enrollments_learner ON enrollments(learner_id);
    CREATE INDEX IF NOT EXISTS idx_submissions_lesson_learner ON exercise_submissions(lesson_id, learner_id);
    CREATE INDEX IF NOT EXISTS idx_attempts_lesson_learner ON quiz_attempts(lesson_id, learner_id);
    CREATE INDEX IF NOT EXISTS idx_completions_learner ON lesson_completions(learner_id);
    CREATE INDEX IF NOT EXISTS idx_notifications_learner ON notifications(learner_id, read);
    "#,
  )?;

  // Migration: Add reviewer feedback to submissions
  add_column_if_missing(conn, "exercise_submissions", "feedback", "TEXT")?;
  add_column_if_missing(conn, "exercise_submissions", "reviewed_at", "TEXT")?;

  // Migration: Add catalog categories to courses
  add_column_if_missing(conn, "courses", "category", "TEXT")?;

  Ok(())
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
  conn
    .prepare(&format!("SELECT {} FROM {} LIMIT 1", column, table))
    .is_ok()
}

/// Add a column if it doesn't already exist
fn add_column_if_missing(conn: &Connection, table: &str, column: &str, column_def: &str) -> Result<()> {
  if !column_exists(conn, table, column) {
    conn.execute(
      &format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, column_def),
      [],
    )?;
  }
  Ok(())
}
