//! Task persistence, scoped by owner.

use std::path::Path;

use parking_lot::Mutex;
use rusqlite::{Connection, params};
use tracing::debug;

use crate::error::SyllabusResult;
use crate::task::{StoredTask, Task};

/// Persists tasks per owner. Every query is scoped by `owner`.
pub trait TaskStore: Send + Sync {
    /// Insert tasks; returns them with their assigned ids, in input order.
    fn save(&self, tasks: &[Task], owner: &str) -> SyllabusResult<Vec<StoredTask>>;

    /// All of the owner's tasks, oldest first.
    fn list(&self, owner: &str) -> SyllabusResult<Vec<StoredTask>>;

    /// Delete one task. A missing id or another owner's task is a no-op.
    fn delete(&self, id: i64, owner: &str) -> SyllabusResult<()>;
}

pub struct SqliteTaskStore {
    connection: Mutex<Connection>,
}

impl SqliteTaskStore {
    pub fn open<P: AsRef<Path>>(path: P) -> SyllabusResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        debug!(path = %path.display(), "Opened task store");

        Ok(SqliteTaskStore {
            connection: Mutex::new(connection),
        })
    }

    pub fn open_in_memory() -> SyllabusResult<Self> {
        let connection = Connection::open_in_memory()?;
        Self::initialize_schema(&connection)?;

        Ok(SqliteTaskStore {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> SyllabusResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY,
                user_id TEXT NOT NULL,
                title TEXT NOT NULL,
                date TEXT NOT NULL,
                start_time TEXT,
                end_time TEXT,
                description TEXT NOT NULL DEFAULT ''
            );
            CREATE INDEX IF NOT EXISTS tasks_user_id ON tasks (user_id);
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }
}

impl TaskStore for SqliteTaskStore {
    fn save(&self, tasks: &[Task], owner: &str) -> SyllabusResult<Vec<StoredTask>> {
        let mut conn = self.connection.lock();
        let tx = conn.transaction()?;
        let mut stored = Vec::with_capacity(tasks.len());

        {
            let mut stmt = tx.prepare(
                "INSERT INTO tasks (user_id, title, date, start_time, end_time, description)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for task in tasks {
                let id = stmt.insert(params![
                    owner,
                    task.title,
                    task.date,
                    task.start_time,
                    task.end_time,
                    task.description,
                ])?;
                stored.push(StoredTask {
                    id,
                    user_id: owner.to_string(),
                    task: task.clone(),
                });
            }
        }

        tx.commit()?;
        debug!(owner, count = stored.len(), "Saved tasks");
        Ok(stored)
    }

    fn list(&self, owner: &str) -> SyllabusResult<Vec<StoredTask>> {
        let conn = self.connection.lock();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, title, date, start_time, end_time, description
             FROM tasks WHERE user_id = ?1 ORDER BY id ASC",
        )?;

        let rows = stmt.query_map(params![owner], |row| {
            Ok(StoredTask {
                id: row.get(0)?,
                user_id: row.get(1)?,
                task: Task {
                    title: row.get(2)?,
                    date: row.get(3)?,
                    start_time: row.get(4)?,
                    end_time: row.get(5)?,
                    description: row.get(6)?,
                },
            })
        })?;

        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?);
        }
        Ok(tasks)
    }

    fn delete(&self, id: i64, owner: &str) -> SyllabusResult<()> {
        let conn = self.connection.lock();
        let removed = conn.execute("DELETE FROM tasks WHERE id = ?1 AND user_id = ?2", params![id, owner])?;
        debug!(id, owner, removed, "Deleted task");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn sample_tasks() -> Vec<Task> {
        let date = NaiveDate::from_ymd_opt(2024, 8, 19).unwrap();
        vec![
            Task::new("Week 1 (Mon)", date, "Hawkins v. McGee")
                .with_times(NaiveTime::from_hms_opt(9, 0, 0), NaiveTime::from_hms_opt(10, 50, 0)),
            Task::new("Midterm", NaiveDate::from_ymd_opt(2024, 10, 15).unwrap(), ""),
        ]
    }

    #[test]
    fn test_save_assigns_ids_and_lists_per_owner() {
        let store = SqliteTaskStore::open_in_memory().unwrap();

        let saved = store.save(&sample_tasks(), "alice").unwrap();
        store.save(&sample_tasks()[..1], "bob").unwrap();

        assert_eq!(saved.len(), 2);
        assert!(saved[0].id < saved[1].id);

        let listed = store.list("alice").unwrap();
        assert_eq!(listed, saved);
        assert_eq!(listed[0].task.start_time, NaiveTime::from_hms_opt(9, 0, 0));
        assert_eq!(listed[1].task.end_time, None);
        assert_eq!(store.list("bob").unwrap().len(), 1);
    }

    #[test]
    fn test_delete_is_scoped_to_owner() {
        let store = SqliteTaskStore::open_in_memory().unwrap();
        let saved = store.save(&sample_tasks(), "alice").unwrap();

        store.delete(saved[0].id, "mallory").unwrap();
        assert_eq!(store.list("alice").unwrap().len(), 2);

        store.delete(saved[0].id, "alice").unwrap();
        let remaining = store.list("alice").unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].task.title, "Midterm");
    }

    #[test]
    fn test_delete_missing_id_is_noop() {
        let store = SqliteTaskStore::open_in_memory().unwrap();

        assert!(store.delete(42, "alice").is_ok());
    }

    #[test]
    fn test_on_disk_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tasks.db");

        {
            let store = SqliteTaskStore::open(&path).unwrap();
            store.save(&sample_tasks(), "alice").unwrap();
        }

        let reopened = SqliteTaskStore::open(&path).unwrap();
        assert_eq!(reopened.list("alice").unwrap().len(), 2);
    }
}
