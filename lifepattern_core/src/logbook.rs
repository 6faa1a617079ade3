//! Daily log persistence with file locking.
//!
//! The log book is a single JSON document holding every subject's daily logs.
//! Writers serialize on an exclusive lock over a sidecar `.lock` file, load
//! the book, apply their change and atomically replace the document.

use crate::store::MetricsSource;
use crate::{DailyLog, DailyMetrics, Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// On-disk layout of the log book
#[derive(Debug, Default, Serialize, Deserialize)]
struct LogBookFile {
    #[serde(default)]
    logs: Vec<DailyLog>,
}

/// File-backed store of daily logs
pub struct LogBook {
    path: PathBuf,
}

impl LogBook {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    /// Load every log in the book with shared locking
    ///
    /// A missing or blank file is an empty book. A file that cannot be parsed
    /// is an error: the book is never silently replaced.
    pub fn load(&self) -> Result<Vec<DailyLog>> {
        if !self.path.exists() {
            tracing::debug!("No log book at {:?}, starting empty", self.path);
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read?;

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        let book: LogBookFile = serde_json::from_str(&contents).map_err(|e| {
            Error::Store(format!(
                "Failed to parse log book {:?}: {}. Fix or move the file aside.",
                self.path, e
            ))
        })?;

        tracing::debug!("Loaded {} logs from {:?}", book.logs.len(), self.path);
        Ok(book.logs)
    }

    /// Atomically write the book by:
    /// 1. Writing to a temp file in the same directory
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    fn save(&self, logs: Vec<DailyLog>) -> Result<()> {
        let parent = self.path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "log book path missing parent")
        })?;

        let temp = NamedTempFile::new_in(parent)?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let book = LogBookFile { logs };
            serde_json::to_writer(&mut writer, &book)?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;

        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved log book to {:?}", self.path);
        Ok(())
    }

    /// Load, modify and save the book under an exclusive writer lock
    pub fn update<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<DailyLog>) -> Result<T>,
    {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let lock = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(self.lock_path())?;
        lock.lock_exclusive()?;

        let outcome = self.load().and_then(|mut logs| {
            let value = f(&mut logs)?;
            self.save(logs)?;
            Ok(value)
        });

        // A persisted write stands even if the unlock fails
        if let Err(e) = lock.unlock() {
            tracing::warn!("Failed to release log book lock {:?}: {}", self.lock_path(), e);
        }
        outcome
    }

    /// Add a new log for `subject`; one log per subject per date
    pub fn create(
        &self,
        subject: &str,
        metrics: DailyMetrics,
        now: DateTime<Utc>,
    ) -> Result<DailyLog> {
        self.update(|logs| {
            if logs
                .iter()
                .any(|l| l.subject == subject && l.date() == metrics.date)
            {
                return Err(Error::DuplicateDate { date: metrics.date });
            }

            let log = DailyLog::new(subject, metrics, now);
            logs.push(log.clone());
            tracing::info!("Created log {} for {} on {}", log.id, subject, log.date());
            Ok(log)
        })
    }

    /// Replace an existing log with a fresh record built from `metrics`
    pub fn replace(
        &self,
        subject: &str,
        id: Uuid,
        metrics: DailyMetrics,
        now: DateTime<Utc>,
    ) -> Result<DailyLog> {
        self.update(|logs| {
            let idx = position_of(logs, subject, id)?;

            let date_taken = logs[idx].date() != metrics.date
                && logs
                    .iter()
                    .any(|l| l.subject == subject && l.date() == metrics.date);
            if date_taken {
                return Err(Error::DuplicateDate { date: metrics.date });
            }

            let replacement = logs[idx].replaced_by(metrics, now);
            logs[idx] = replacement.clone();
            tracing::info!("Updated log {} for {}", id, subject);
            Ok(replacement)
        })
    }

    /// Remove a log, returning what was removed
    pub fn delete(&self, subject: &str, id: Uuid) -> Result<DailyLog> {
        self.update(|logs| {
            let idx = position_of(logs, subject, id)?;
            let removed = logs.remove(idx);
            tracing::info!("Deleted log {} for {}", id, subject);
            Ok(removed)
        })
    }

    /// Fetch a single log owned by `subject`
    pub fn get(&self, subject: &str, id: Uuid) -> Result<DailyLog> {
        self.load()?
            .into_iter()
            .find(|l| l.subject == subject && l.id == id)
            .ok_or(Error::LogNotFound { id })
    }

    /// All of a subject's logs, newest date first
    pub fn list(&self, subject: &str) -> Result<Vec<DailyLog>> {
        let mut logs: Vec<DailyLog> = self
            .load()?
            .into_iter()
            .filter(|l| l.subject == subject)
            .collect();
        logs.sort_by(|a, b| b.date().cmp(&a.date()));
        Ok(logs)
    }
}

fn position_of(logs: &[DailyLog], subject: &str, id: Uuid) -> Result<usize> {
    logs.iter()
        .position(|l| l.subject == subject && l.id == id)
        .ok_or(Error::LogNotFound { id })
}

impl MetricsSource for LogBook {
    fn most_recent_metrics(&self, subject: &str) -> Result<Option<DailyMetrics>> {
        let latest = self
            .load()?
            .into_iter()
            .filter(|l| l.subject == subject)
            .max_by_key(|l| l.date());
        Ok(latest.map(|l| l.metrics))
    }

    fn metrics_in_range(
        &self,
        subject: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyMetrics>> {
        let mut metrics: Vec<DailyMetrics> = self
            .load()?
            .into_iter()
            .filter(|l| l.subject == subject && l.date() >= start && l.date() <= end)
            .map(|l| l.metrics)
            .collect();
        metrics.sort_by_key(|m| m.date);
        Ok(metrics)
    }
}
