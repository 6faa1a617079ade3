//! Append-only assessment journal.
//!
//! Assessments are appended to a JSONL (JSON Lines) file with file locking
//! to ensure safe concurrent access. Records are never rewritten.

use crate::store::AssessmentSink;
use crate::{BurnoutAssessment, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// JSONL-based assessment journal with file locking
pub struct AssessmentJournal {
    path: PathBuf,
}

impl AssessmentJournal {
    /// Create a journal backed by the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure the parent directory exists
    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl AssessmentSink for AssessmentJournal {
    fn append_assessment(&mut self, assessment: &BurnoutAssessment) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        // Start on a fresh line if a previous writer died mid-record
        let mut line = String::new();
        if ends_mid_line(&file)? {
            line.push('\n');
        }
        line.push_str(&serde_json::to_string(assessment)?);
        line.push('\n');
        let mut writer = std::io::BufWriter::new(&file);
        writer.write_all(line.as_bytes())?;
        writer.flush()?;
        drop(writer);

        if let Err(e) = file.unlock() {
            tracing::warn!("Failed to release journal lock: {}", e);
        }

        tracing::debug!(
            "Appended {} assessment for {} to journal",
            assessment.risk_tier,
            assessment.subject_id
        );
        Ok(())
    }

    fn latest_assessment(&self, subject: &str) -> Result<Option<BurnoutAssessment>> {
        let assessments = read_assessments(&self.path)?;
        Ok(latest_for_subject(assessments, subject))
    }
}

/// Whether the file's last byte is something other than a newline
fn ends_mid_line(mut file: &File) -> Result<bool> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(false);
    }

    file.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// Read all assessments from a journal file
///
/// Unparseable lines (e.g. a torn final write) are skipped with a warning.
pub fn read_assessments(path: &Path) -> Result<Vec<BurnoutAssessment>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    // Acquire shared lock for reading
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut assessments = Vec::new();

    // Split on raw bytes: a record torn inside a multi-byte character is not
    // valid UTF-8 and must be skipped like any other bad line
    for (line_num, line_result) in reader.split(b'\n').enumerate() {
        let line = line_result?;
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        match serde_json::from_slice::<BurnoutAssessment>(&line) {
            Ok(assessment) => assessments.push(assessment),
            Err(e) => {
                tracing::warn!(
                    "Skipping unreadable assessment at line {}: {}",
                    line_num + 1,
                    e
                );
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} assessments from journal", assessments.len());
    Ok(assessments)
}

/// Pick the most recently computed assessment for a subject.
///
/// Ties on `computed_at` go to the record appended last.
fn latest_for_subject(
    assessments: Vec<BurnoutAssessment>,
    subject: &str,
) -> Option<BurnoutAssessment> {
    assessments
        .into_iter()
        .filter(|a| a.subject_id == subject)
        .fold(None, |best: Option<BurnoutAssessment>, candidate| match best {
            Some(current) if current.computed_at > candidate.computed_at => Some(current),
            _ => Some(candidate),
        })
}
