//! Core domain types for the LifePattern system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Daily lifestyle metrics and their stored log records
//! - Burnout assessments and risk tiers
//! - Trend windows, queries and chart points

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Daily Metrics
// ============================================================================

/// One day's worth of self-reported lifestyle metrics
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyMetrics {
    pub date: NaiveDate,
    pub sleep_hours: f64,
    pub work_hours: f64,
    pub study_hours: f64,
    pub entertainment_hours: f64,
    pub energy_level: u8,
    pub stress_level: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl DailyMetrics {
    /// Sum of the four hour fields
    pub fn total_hours(&self) -> f64 {
        self.sleep_hours + self.work_hours + self.study_hours + self.entertainment_hours
    }
}

/// A stored daily log owned by a subject
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyLog {
    pub id: Uuid,
    pub subject: String,
    pub metrics: DailyMetrics,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DailyLog {
    /// Create a fresh log record for a subject
    pub fn new(subject: impl Into<String>, metrics: DailyMetrics, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject: subject.into(),
            metrics,
            created_at: now,
            updated_at: now,
        }
    }

    /// Build the replacement record for an update, keeping identity and creation time
    pub fn replaced_by(&self, metrics: DailyMetrics, now: DateTime<Utc>) -> Self {
        Self {
            id: self.id,
            subject: self.subject.clone(),
            metrics,
            created_at: self.created_at,
            updated_at: now,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.metrics.date
    }
}

// ============================================================================
// Burnout Assessment
// ============================================================================

/// Three-way classification of a burnout score
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// Classify a clamped score.
    ///
    /// Bands are inclusive-low, exclusive-high: `[0, 40)` is LOW,
    /// `[40, 70)` is MEDIUM and everything from 70 up is HIGH.
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=39 => RiskTier::Low,
            40..=69 => RiskTier::Medium,
            _ => RiskTier::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "LOW",
            RiskTier::Medium => "MEDIUM",
            RiskTier::High => "HIGH",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of scoring a subject's most recent daily metrics.
///
/// Created once per regenerate call and never mutated afterwards.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BurnoutAssessment {
    pub subject_id: String,
    pub score: u8,
    pub risk_tier: RiskTier,
    pub suggestion_text: String,
    pub computed_at: DateTime<Utc>,
}

// ============================================================================
// Trends
// ============================================================================

/// One chart point in a trend series
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub sleep_hours: f64,
    pub stress_level: u8,
}

/// Inclusive date range over which trend data is extracted
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrendWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Raw trend query parameters as supplied by the caller
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrendQuery {
    pub days: Option<i64>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl TrendQuery {
    /// Query for the last `days` days ending today
    pub fn last_days(days: i64) -> Self {
        Self {
            days: Some(days),
            ..Self::default()
        }
    }

    /// Query for an explicit start/end pair
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            days: None,
            start: Some(start),
            end: Some(end),
        }
    }
}
