//! JSON file job table
//!
//! The table is a single pretty-printed JSON object keyed by job id.
//! Saves go through a temporary file and a rename so a crash mid-write
//! leaves the previous table intact.

use crate::storage::traits::{JobMap, JobTable, StoreResult};
use std::fs;
use std::path::{Path, PathBuf};

pub const JOBS_FILE_NAME: &str = "jobs.json";

/// Job table stored in `<data-dir>/jobs.json`
#[derive(Debug, Clone)]
pub struct JsonJobTable {
    path: PathBuf,
}

impl JsonJobTable {
    /// Opens the table in `data_dir`, creating the directory if needed
    pub fn open(data_dir: &Path) -> StoreResult<Self> {
        fs::create_dir_all(data_dir)?;
        Ok(Self {
            path: data_dir.join(JOBS_FILE_NAME),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl JobTable for JsonJobTable {
    fn load(&self) -> StoreResult<JobMap> {
        if !self.path.exists() {
            return Ok(JobMap::new());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(JobMap::new());
        }

        Ok(serde_json::from_str(&content)?)
    }

    fn save(&mut self, jobs: &JobMap) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(jobs)?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }

    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }
}
