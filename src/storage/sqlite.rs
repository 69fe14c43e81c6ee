//! SQLite job table
//!
//! One row per job. A save rewrites the whole table inside a single
//! transaction, matching the whole-table contract of the JSON backend.

use crate::state::Job;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{JobMap, JobTable, StoreResult};
use rusqlite::{params, Connection};
use std::fs;
use std::path::Path;

pub const JOBS_DB_NAME: &str = "jobs.db";

/// Job table stored in `<data-dir>/jobs.db`
pub struct SqliteJobTable {
    conn: Connection,
    label: String,
}

impl SqliteJobTable {
    /// Opens or creates the database in `data_dir`
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteJobTable)` - Database opened and schema ready
    /// * `Err(StoreError)` - Failed to create the directory or open the database
    pub fn open(data_dir: &Path) -> StoreResult<Self> {
        fs::create_dir_all(data_dir)?;
        let path = data_dir.join(JOBS_DB_NAME);
        let conn = Connection::open(&path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn,
            label: format!("sqlite:{}", path.display()),
        })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn,
            label: "sqlite::memory:".to_string(),
        })
    }
}

impl JobTable for SqliteJobTable {
    fn load(&self) -> StoreResult<JobMap> {
        let mut stmt = self.conn.prepare("SELECT record FROM jobs")?;
        let records = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut jobs = JobMap::new();
        for record in records {
            let job: Job = serde_json::from_str(&record?)?;
            jobs.insert(job.id.clone(), job);
        }

        Ok(jobs)
    }

    fn save(&mut self, jobs: &JobMap) -> StoreResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM jobs", [])?;

        {
            let mut insert = tx.prepare(
                "INSERT INTO jobs (id, status, created_at, record) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for job in jobs.values() {
                insert.execute(params![
                    job.id,
                    job.status.to_db_string(),
                    job.created_at.to_rfc3339(),
                    serde_json::to_string(job)?,
                ])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}
