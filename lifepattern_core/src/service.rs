//! Analysis and daily-log operations.
//!
//! These functions sit between the command surface and the pure engine:
//! they fetch from a store, call the engine or trend resolver, and hand
//! results back for persistence. Time is always passed in.

use crate::logbook::LogBook;
use crate::store::{AssessmentSink, MetricsSource};
use crate::validation::validate_metrics;
use crate::{
    compute_assessment_at, BurnoutAssessment, DailyLog, DailyMetrics, Error, Result,
    TrendPoint, TrendQuery, TrendWindow,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Resolved window together with the chart series inside it
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrendReport {
    pub window: TrendWindow,
    pub points: Vec<TrendPoint>,
}

/// Score the subject's most recent log and record the assessment
///
/// Fails with [`Error::NoDataAvailable`] when the subject has no logs; the
/// engine is not invoked in that case.
pub fn regenerate_analysis<S>(
    store: &mut S,
    subject: &str,
    now: DateTime<Utc>,
) -> Result<BurnoutAssessment>
where
    S: MetricsSource + AssessmentSink,
{
    let latest = store
        .most_recent_metrics(subject)?
        .ok_or_else(|| Error::NoDataAvailable {
            subject: subject.to_string(),
        })?;

    let assessment = compute_assessment_at(subject, &latest, now);
    store.append_assessment(&assessment)?;

    tracing::info!(
        "Regenerated analysis for {} from {}: {} ({})",
        subject,
        latest.date,
        assessment.score,
        assessment.risk_tier
    );
    Ok(assessment)
}

/// The most recently computed assessment for a subject
pub fn latest_analysis<S: AssessmentSink>(store: &S, subject: &str) -> Result<BurnoutAssessment> {
    store
        .latest_assessment(subject)?
        .ok_or_else(|| Error::NoAssessment {
            subject: subject.to_string(),
        })
}

/// Resolve a trend query and extract the series for it
pub fn trends<S: MetricsSource>(
    store: &S,
    subject: &str,
    query: &TrendQuery,
    today: NaiveDate,
) -> Result<TrendReport> {
    let window = crate::resolve_window(query, today)?;
    let logs = store.metrics_in_range(subject, window.start_date, window.end_date)?;
    let points = crate::build_series(&logs);

    tracing::debug!(
        "Trend window {}..{} for {}: {} points",
        window.start_date,
        window.end_date,
        subject,
        points.len()
    );
    Ok(TrendReport { window, points })
}

/// Validate and store a new daily log
pub fn create_log(
    logs: &LogBook,
    subject: &str,
    metrics: DailyMetrics,
    now: DateTime<Utc>,
) -> Result<DailyLog> {
    validate_metrics(&metrics)?;
    logs.create(subject, metrics, now)
}

/// Validate and replace an existing daily log
pub fn update_log(
    logs: &LogBook,
    subject: &str,
    id: Uuid,
    metrics: DailyMetrics,
    now: DateTime<Utc>,
) -> Result<DailyLog> {
    validate_metrics(&metrics)?;
    logs.replace(subject, id, metrics, now)
}

pub fn delete_log(logs: &LogBook, subject: &str, id: Uuid) -> Result<DailyLog> {
    logs.delete(subject, id)
}

pub fn get_log(logs: &LogBook, subject: &str, id: Uuid) -> Result<DailyLog> {
    logs.get(subject, id)
}

pub fn list_logs(logs: &LogBook, subject: &str) -> Result<Vec<DailyLog>> {
    logs.list(subject)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FileStore;
    use crate::RiskTier;

    /// In-memory store for exercising the service without touching disk
    #[derive(Default)]
    struct MemoryStore {
        metrics: Vec<(String, DailyMetrics)>,
        assessments: Vec<BurnoutAssessment>,
    }

    impl MetricsSource for MemoryStore {
        fn most_recent_metrics(&self, subject: &str) -> Result<Option<DailyMetrics>> {
            Ok(self
                .metrics
                .iter()
                .filter(|(s, _)| s == subject)
                .map(|(_, m)| m)
                .max_by_key(|m| m.date)
                .cloned())
        }

        fn metrics_in_range(
            &self,
            subject: &str,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<Vec<DailyMetrics>> {
            let mut out: Vec<_> = self
                .metrics
                .iter()
                .filter(|(s, m)| s == subject && m.date >= start && m.date <= end)
                .map(|(_, m)| m.clone())
                .collect();
            out.sort_by_key(|m| m.date);
            Ok(out)
        }
    }

    impl AssessmentSink for MemoryStore {
        fn append_assessment(&mut self, assessment: &BurnoutAssessment) -> Result<()> {
            self.assessments.push(assessment.clone());
            Ok(())
        }

        fn latest_assessment(&self, subject: &str) -> Result<Option<BurnoutAssessment>> {
            Ok(self
                .assessments
                .iter()
                .rev()
                .find(|a| a.subject_id == subject)
                .cloned())
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn metrics(day: NaiveDate, work: f64, stress: u8, sleep: f64) -> DailyMetrics {
        DailyMetrics {
            date: day,
            sleep_hours: sleep,
            work_hours: work,
            study_hours: 0.0,
            entertainment_hours: 1.0,
            energy_level: 5,
            stress_level: stress,
            notes: None,
        }
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-10T20:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_regenerate_without_logs() {
        let mut store = MemoryStore::default();

        let result = regenerate_analysis(&mut store, "alice", now());

        assert!(matches!(result, Err(Error::NoDataAvailable { ref subject }) if subject == "alice"));
        assert!(store.assessments.is_empty());
    }

    #[test]
    fn test_regenerate_scores_latest_log() {
        let mut store = MemoryStore::default();
        store
            .metrics
            .push(("alice".into(), metrics(date(2024, 3, 9), 4.0, 2, 8.0)));
        store
            .metrics
            .push(("alice".into(), metrics(date(2024, 3, 10), 8.0, 9, 5.0)));
        store
            .metrics
            .push(("bob".into(), metrics(date(2024, 3, 11), 0.0, 1, 9.0)));

        let assessment = regenerate_analysis(&mut store, "alice", now()).unwrap();

        assert_eq!(assessment.score, 70);
        assert_eq!(assessment.risk_tier, RiskTier::High);
        assert_eq!(assessment.computed_at, now());
        assert_eq!(store.assessments, vec![assessment]);
    }

    #[test]
    fn test_repeat_regenerate_stores_duplicates() {
        let mut store = MemoryStore::default();
        store
            .metrics
            .push(("alice".into(), metrics(date(2024, 3, 10), 4.0, 2, 8.0)));

        let first = regenerate_analysis(&mut store, "alice", now()).unwrap();
        let second = regenerate_analysis(&mut store, "alice", now()).unwrap();

        assert_eq!(first, second);
        assert_eq!(store.assessments.len(), 2);
    }

    #[test]
    fn test_latest_analysis() {
        let mut store = MemoryStore::default();
        assert!(matches!(
            latest_analysis(&store, "alice"),
            Err(Error::NoAssessment { .. })
        ));

        store
            .metrics
            .push(("alice".into(), metrics(date(2024, 3, 10), 4.0, 2, 8.0)));
        regenerate_analysis(&mut store, "alice", now()).unwrap();

        let latest = latest_analysis(&store, "alice").unwrap();
        assert_eq!(latest.score, 6);
        assert_eq!(latest.risk_tier, RiskTier::Low);
    }

    #[test]
    fn test_trends_by_days() {
        let mut store = MemoryStore::default();
        for (day, sleep) in [(2, 6.0), (4, 7.0), (8, 8.0), (10, 5.5), (11, 9.0)] {
            store
                .metrics
                .push(("alice".into(), metrics(date(2024, 3, day), 6.0, 4, sleep)));
        }

        let report = trends(&store, "alice", &TrendQuery::last_days(7), date(2024, 3, 10)).unwrap();

        assert_eq!(report.window.start_date, date(2024, 3, 4));
        assert_eq!(report.window.end_date, date(2024, 3, 10));
        let dates: Vec<_> = report.points.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![date(2024, 3, 4), date(2024, 3, 8), date(2024, 3, 10)]);
        assert_eq!(report.points[2].sleep_hours, 5.5);
    }

    #[test]
    fn test_trends_invalid_range() {
        let store = MemoryStore::default();
        let result = trends(&store, "alice", &TrendQuery::default(), date(2024, 3, 10));
        assert!(matches!(result, Err(Error::InvalidRangeSpecification)));
    }

    #[test]
    fn test_trends_empty_window() {
        let store = MemoryStore::default();
        let report = trends(
            &store,
            "alice",
            &TrendQuery::between(date(2024, 1, 1), date(2024, 1, 5)),
            date(2024, 3, 10),
        )
        .unwrap();
        assert!(report.points.is_empty());
    }

    #[test]
    fn test_create_log_validates() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(temp_dir.path());

        let mut too_long = metrics(date(2024, 3, 10), 14.0, 5, 11.0);
        too_long.study_hours = 0.0;
        let result = create_log(store.logs(), "alice", too_long, now());
        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(list_logs(store.logs(), "alice").unwrap().is_empty());
    }

    #[test]
    fn test_log_lifecycle_on_disk() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(temp_dir.path());

        let log = create_log(
            store.logs(),
            "alice",
            metrics(date(2024, 3, 10), 4.0, 2, 8.0),
            now(),
        )
        .unwrap();
        assert_eq!(regenerate_analysis(&mut store, "alice", now()).unwrap().score, 6);

        let updated = update_log(
            store.logs(),
            "alice",
            log.id,
            metrics(date(2024, 3, 10), 8.0, 9, 5.0),
            now(),
        )
        .unwrap();
        assert_eq!(get_log(store.logs(), "alice", log.id).unwrap(), updated);
        assert_eq!(regenerate_analysis(&mut store, "alice", now()).unwrap().score, 70);

        delete_log(store.logs(), "alice", log.id).unwrap();
        assert!(matches!(
            regenerate_analysis(&mut store, "alice", now()),
            Err(Error::NoDataAvailable { .. })
        ));

        // Assessments outlive the logs they were computed from
        assert_eq!(latest_analysis(&store, "alice").unwrap().score, 70);
    }

    #[test]
    fn test_update_rejects_invalid_metrics() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(temp_dir.path());

        let log = create_log(
            store.logs(),
            "alice",
            metrics(date(2024, 3, 10), 4.0, 2, 8.0),
            now(),
        )
        .unwrap();

        let bad = metrics(date(2024, 3, 10), 4.0, 0, 8.0);
        assert!(matches!(
            update_log(store.logs(), "alice", log.id, bad, now()),
            Err(Error::Validation(_))
        ));
        assert_eq!(get_log(store.logs(), "alice", log.id).unwrap().metrics.stress_level, 2);
    }
}
