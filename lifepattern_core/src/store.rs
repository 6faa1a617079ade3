//! Storage seams for the analysis engine.
//!
//! The engine only ever reads metrics through [`MetricsSource`] and writes
//! assessments through [`AssessmentSink`]. [`FileStore`] is the on-disk
//! implementation used by the CLI.

use crate::journal::AssessmentJournal;
use crate::logbook::LogBook;
use crate::{BurnoutAssessment, DailyMetrics, Result};
use chrono::NaiveDate;
use std::path::PathBuf;

pub const LOG_BOOK_FILE: &str = "logs.json";
pub const JOURNAL_FILE: &str = "assessments.jsonl";

/// Read access to a subject's daily metrics
pub trait MetricsSource {
    /// The metrics with the latest date, if the subject has any
    fn most_recent_metrics(&self, subject: &str) -> Result<Option<DailyMetrics>>;

    /// Metrics dated within `[start, end]`, ascending by date
    fn metrics_in_range(
        &self,
        subject: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyMetrics>>;
}

/// Persistence for computed assessments
pub trait AssessmentSink {
    fn append_assessment(&mut self, assessment: &BurnoutAssessment) -> Result<()>;
    fn latest_assessment(&self, subject: &str) -> Result<Option<BurnoutAssessment>>;
}

/// Log book plus assessment journal rooted at one data directory
pub struct FileStore {
    logs: LogBook,
    journal: AssessmentJournal,
}

impl FileStore {
    pub fn open(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let logs = LogBook::new(data_dir.join(LOG_BOOK_FILE));
        let journal = AssessmentJournal::new(data_dir.join(JOURNAL_FILE));
        tracing::debug!("Opened store at {:?}", data_dir);
        Self { logs, journal }
    }

    pub fn logs(&self) -> &LogBook {
        &self.logs
    }
}

impl MetricsSource for FileStore {
    fn most_recent_metrics(&self, subject: &str) -> Result<Option<DailyMetrics>> {
        self.logs.most_recent_metrics(subject)
    }

    fn metrics_in_range(
        &self,
        subject: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyMetrics>> {
        self.logs.metrics_in_range(subject, start, end)
    }
}

impl AssessmentSink for FileStore {
    fn append_assessment(&mut self, assessment: &BurnoutAssessment) -> Result<()> {
        self.journal.append_assessment(assessment)
    }

    fn latest_assessment(&self, subject: &str) -> Result<Option<BurnoutAssessment>> {
        self.journal.latest_assessment(subject)
    }
}
