//! Burnout scoring engine.
//!
//! This module turns a subject's most recent daily metrics into a
//! [`BurnoutAssessment`]:
//! - Linear raw score from work hours, stress level and sleep hours
//! - Clamp to `[0, 100]` and truncate toward zero
//! - Fixed-threshold risk tier
//! - Tier-specific suggestion text
//!
//! Everything here is pure. Callers fetch the latest metrics and persist the
//! returned assessment themselves.

use crate::{BurnoutAssessment, DailyMetrics, RiskTier};
use chrono::{DateTime, Utc};

const WORK_WEIGHT: f64 = 5.0;
const STRESS_WEIGHT: f64 = 5.0;
const SLEEP_CREDIT: f64 = 3.0;

const MIN_SCORE: f64 = 0.0;
const MAX_SCORE: f64 = 100.0;

/// Compute an assessment stamped with the current time
pub fn compute_assessment(subject_id: &str, latest: &DailyMetrics) -> BurnoutAssessment {
    compute_assessment_at(subject_id, latest, Utc::now())
}

/// Compute an assessment with an explicit timestamp
///
/// ## Scoring
///
/// 1. `raw = work * 5 + stress * 5 - sleep * 3`
/// 2. `score = trunc(clamp(raw, 0, 100))`
/// 3. `< 40` LOW, `< 70` MEDIUM, otherwise HIGH
///
pub fn compute_assessment_at(
    subject_id: &str,
    latest: &DailyMetrics,
    computed_at: DateTime<Utc>,
) -> BurnoutAssessment {
    let raw = raw_score(latest);
    let score = clamp_score(raw);
    let risk_tier = RiskTier::from_score(score);
    let suggestion_text = suggestion_text(risk_tier, latest);

    tracing::debug!(
        "Scored {} for {}: raw={} score={} tier={}",
        latest.date,
        subject_id,
        raw,
        score,
        risk_tier
    );

    BurnoutAssessment {
        subject_id: subject_id.to_string(),
        score,
        risk_tier,
        suggestion_text,
        computed_at,
    }
}

/// Unclamped linear burnout score
pub fn raw_score(metrics: &DailyMetrics) -> f64 {
    metrics.work_hours * WORK_WEIGHT + f64::from(metrics.stress_level) * STRESS_WEIGHT
        - metrics.sleep_hours * SLEEP_CREDIT
}

/// Clamp to `[0, 100]` and truncate toward zero.
///
/// `f64::max`/`f64::min` drop NaN, so a non-finite raw score lands on 0.
pub fn clamp_score(raw: f64) -> u8 {
    raw.max(MIN_SCORE).min(MAX_SCORE) as u8
}

/// Render tier-specific advice for the given metrics
pub fn suggestion_text(tier: RiskTier, metrics: &DailyMetrics) -> String {
    match tier {
        RiskTier::Low => format!(
            "Great job maintaining balance! Your current routine shows healthy work-life balance. \
             Keep prioritizing {} hours of sleep and managing stress effectively.",
            format_hours(metrics.sleep_hours)
        ),
        RiskTier::Medium => format!(
            "You're showing moderate signs of stress. Consider reducing work hours ({}h currently) \
             and increasing sleep time. Try relaxation techniques and ensure you're taking regular breaks.",
            format_hours(metrics.work_hours)
        ),
        RiskTier::High => format!(
            "Warning: High burnout risk detected! Your work hours ({}h) and stress level ({}/10) \
             are concerning. Prioritize rest (current: {}h sleep). \
             Consider speaking with a healthcare professional and adjusting your schedule.",
            format_hours(metrics.work_hours),
            metrics.stress_level,
            format_hours(metrics.sleep_hours)
        ),
    }
}

/// Hours always carry a decimal part: `8.0`, `7.5`, `6.25`
fn format_hours(hours: f64) -> String {
    if hours.is_finite() && hours.fract() == 0.0 {
        format!("{:.1}", hours)
    } else {
        format!("{}", hours)
    }
}
