//! Input validation for daily metrics.
//!
//! These checks guard what gets written to the log book. The scoring engine
//! and trend resolver never call into this module.

use crate::{DailyMetrics, Error, Result};

const MAX_HOURS_PER_DAY: f64 = 24.0;
const MIN_LEVEL: u8 = 1;
const MAX_LEVEL: u8 = 10;

/// Validate a set of metrics before it is stored
pub fn validate_metrics(metrics: &DailyMetrics) -> Result<()> {
    check_hours("Sleep hours", metrics.sleep_hours)?;
    check_hours("Work hours", metrics.work_hours)?;
    check_hours("Study hours", metrics.study_hours)?;
    check_hours("Entertainment hours", metrics.entertainment_hours)?;

    check_level("Energy level", metrics.energy_level)?;
    check_level("Stress level", metrics.stress_level)?;

    if metrics.total_hours() > MAX_HOURS_PER_DAY {
        return Err(Error::Validation(
            "Total hours cannot exceed 24 hours per day".into(),
        ));
    }

    Ok(())
}

fn check_hours(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(Error::Validation(format!("{} must be a number", field)));
    }
    if value < 0.0 {
        return Err(Error::Validation(format!("{} must be at least 0", field)));
    }
    if value > MAX_HOURS_PER_DAY {
        return Err(Error::Validation(format!("{} cannot exceed 24", field)));
    }
    Ok(())
}

fn check_level(field: &str, value: u8) -> Result<()> {
    if !(MIN_LEVEL..=MAX_LEVEL).contains(&value) {
        return Err(Error::Validation(format!(
            "{} must be between 1 and 10",
            field
        )));
    }
    Ok(())
}
