use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::data::AggregatedSeries;
use crate::error::BacError;

/// Mean BAC at or below which the subject is considered sober
pub const DEFAULT_TOLERANCE: f64 = 1e-3;

/// The moments from which the subject stays below the driving limit and
/// stays sober until the end of the series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Thresholds {
    pub drive_safe_time: Option<DateTime<Utc>>,
    pub sober_time: Option<DateTime<Utc>>,
}

/// Start of the final run of samples satisfying `pred`
///
/// A run only counts if it lasts until the last sample; a series that ends
/// outside the condition has no such run.
fn final_run_start(values: &[f64], pred: impl Fn(f64) -> bool) -> Option<usize> {
    let outside = values.iter().rposition(|&v| !pred(v));
    match outside {
        None if values.is_empty() => None,
        None => Some(0),
        Some(i) if i + 1 < values.len() => Some(i + 1),
        Some(_) => None,
    }
}

/// Drive-safe and sober times of an aggregated series
///
/// The drive-safe time starts the final run where `mean_bac` is strictly
/// below `driving_limit`. The sober time starts the final run where
/// `mean_bac <= tolerance`. An empty series has neither.
///
/// # Arguments
///
/// * `aggregated` - Mean BAC across models
/// * `driving_limit` - Legal BAC limit, in the same unit as `mean_bac`
/// * `tolerance` - BAC regarded as zero, usually [DEFAULT_TOLERANCE]
pub fn identify_thresholds(
    aggregated: &AggregatedSeries,
    driving_limit: f64,
    tolerance: f64,
) -> Result<Thresholds, BacError> {
    if !(driving_limit.is_finite() && driving_limit >= 0.0) {
        return Err(BacError::invalid_parameter("driving_limit", driving_limit));
    }
    if !(tolerance.is_finite() && tolerance >= 0.0) {
        return Err(BacError::invalid_parameter("tolerance", tolerance));
    }

    let mean = aggregated.mean_bac();
    let times = aggregated.times();
    Ok(Thresholds {
        drive_safe_time: final_run_start(mean, |v| v < driving_limit).map(|i| times[i]),
        sober_time: final_run_start(mean, |v| v <= tolerance).map(|i| times[i]),
    })
}
