//! Table definitions.
//!
//! `tasks.project_id` cascades on project deletion; `status` defaults to
//! `'Pendiente'`. Timestamps are SQLite `CURRENT_TIMESTAMP` text
//! (`YYYY-MM-DD HH:MM:SS`, UTC).

use chrono::{DateTime, NaiveDateTime};

/// Status given to tasks created without an explicit one.
pub const DEFAULT_TASK_STATUS: &str = "Pendiente";

pub(crate) const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS projects (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT UNIQUE NOT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    description TEXT NOT NULL,
    status TEXT DEFAULT 'Pendiente',
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_tasks_project ON tasks(project_id);
"#;

/// Render a stored timestamp as `YYYY-MM-DD HH:MM:SS`, or return it verbatim
/// when it is in an unexpected format.
pub fn format_timestamp(raw: &str) -> String {
    const OUT: &str = "%Y-%m-%d %H:%M:%S";
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return ts.format(OUT).to_string();
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return ts.naive_utc().format(OUT).to_string();
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_sqlite_timestamp() {
        assert_eq!(format_timestamp("2025-03-01 09:15:00"), "2025-03-01 09:15:00");
        assert_eq!(format_timestamp("2025-03-01 09:15:00.250"), "2025-03-01 09:15:00");
    }

    #[test]
    fn test_format_rfc3339_timestamp() {
        assert_eq!(format_timestamp("2025-03-01T09:15:00Z"), "2025-03-01 09:15:00");
    }

    #[test]
    fn test_format_unknown_is_verbatim() {
        assert_eq!(format_timestamp("ayer"), "ayer");
    }
}
