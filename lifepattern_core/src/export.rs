//! CSV export of trend series for external charting tools.

use crate::{Result, TrendPoint};
use std::fs::File;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    date: String,
    sleep_hours: f64,
    stress_level: u8,
}

impl From<&TrendPoint> for CsvRow {
    fn from(point: &TrendPoint) -> Self {
        CsvRow {
            date: point.date.to_string(),
            sleep_hours: point.sleep_hours,
            stress_level: point.stress_level,
        }
    }
}

/// Write a trend series to `path`, replacing any existing file
///
/// The header row is always written, even for an empty series, so chart
/// tools see a well-formed file. Returns the number of data rows.
pub fn write_trend_csv(path: &Path, points: &[TrendPoint]) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = csv::WriterBuilder::new().from_writer(file);

    if points.is_empty() {
        writer.write_record(["date", "sleep_hours", "stress_level"])?;
    }
    for point in points {
        writer.serialize(CsvRow::from(point))?;
    }

    // Flush and sync to disk
    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Exported {} trend points to {:?}", points.len(), path);
    Ok(points.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn point(day: u32, sleep: f64, stress: u8) -> TrendPoint {
        TrendPoint {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            sleep_hours: sleep,
            stress_level: stress,
        }
    }

    #[test]
    fn test_writes_header_and_rows() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("trends.csv");

        let count =
            write_trend_csv(&csv_path, &[point(4, 7.5, 3), point(5, 6.0, 8)]).unwrap();
        assert_eq!(count, 2);

        let contents = std::fs::read_to_string(&csv_path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines[0], "date,sleep_hours,stress_level");
        assert_eq!(lines[1], "2024-03-04,7.5,3");
        assert_eq!(lines[2], "2024-03-05,6.0,8");
    }

    #[test]
    fn test_empty_series_still_has_header() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("nested").join("trends.csv");

        let count = write_trend_csv(&csv_path, &[]).unwrap();
        assert_eq!(count, 0);

        let contents = std::fs::read_to_string(&csv_path).unwrap();
        assert_eq!(contents.trim(), "date,sleep_hours,stress_level");
    }

    #[test]
    fn test_overwrites_previous_export() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("trends.csv");

        write_trend_csv(&csv_path, &[point(4, 7.5, 3), point(5, 6.0, 8)]).unwrap();
        write_trend_csv(&csv_path, &[point(9, 8.0, 2)]).unwrap();

        let reader = csv::Reader::from_path(&csv_path).unwrap();
        assert_eq!(reader.into_records().count(), 1);
    }
}
