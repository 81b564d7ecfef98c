//! Absorption of alcohol from the gut into the blood
//!
//! Each drink is absorbed with first-order kinetics,
//!
//! ```text
//! absorbed(t) = alcohol_kg * (1 - exp(-(t - t_drink) * ln 2 / halflife(t)))
//! ```
//!
//! where the halflife is set by the most recent meal before `t` (or the
//! default when there is none). Contributions before `t_drink` are zero.

use chrono::{DateTime, Duration, Utc};
use ndarray::{Array1, Array2, Axis, Zip};

use crate::data::{AbsorptionSeries, Drink, Food};
use crate::error::BacError;

/// Seconds from `from` to `to`, with millisecond resolution
pub(crate) fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 1000.0
}

fn at_offset(start: DateTime<Utc>, offset: f64) -> DateTime<Utc> {
    start + Duration::milliseconds((offset * 1000.0).round() as i64)
}

/// Offsets in seconds of a uniform grid from `start` (inclusive) to `end` (exclusive)
fn grid_offsets(start: DateTime<Utc>, end: DateTime<Utc>, dt: f64) -> Result<Vec<f64>, BacError> {
    if !(dt.is_finite() && dt > 0.0) {
        return Err(BacError::invalid_parameter("dt", dt));
    }
    if end < start {
        return Err(BacError::invalid_parameter(
            "end_time",
            format!("{end} is before the start {start}"),
        ));
    }
    let span = seconds_between(start, end);
    let n = (span / dt).ceil() as usize;
    Ok((0..n).map(|i| i as f64 * dt).collect())
}

/// Timestamps of a uniform grid from `start` (inclusive) to `end` (exclusive) every `dt` seconds
pub fn time_grid(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    dt: f64,
) -> Result<Vec<DateTime<Utc>>, BacError> {
    Ok(grid_offsets(start, end, dt)?
        .into_iter()
        .map(|offset| at_offset(start, offset))
        .collect())
}

/// Effective absorption halflife (seconds) at each of `times`
///
/// The halflife of the latest meal at or before each time applies; before
/// the first meal, or without meals, `default_halflife` applies.
pub fn halflife_vector(times: &[DateTime<Utc>], foods: &[Food], default_halflife: f64) -> Vec<f64> {
    if foods.is_empty() {
        return vec![default_halflife; times.len()];
    }
    let mut sorted: Vec<&Food> = foods.iter().collect();
    sorted.sort_by_key(|f| f.time());

    times
        .iter()
        .map(|t| match sorted.partition_point(|f| f.time() <= *t) {
            0 => default_halflife,
            idx => sorted[idx - 1].halflife(),
        })
        .collect()
}

/// Cumulative mass of alcohol absorbed (kg) from `start` to `end` every `dt` seconds
///
/// # Arguments
///
/// * `drinks` - The drinks consumed
/// * `start` - First sample of the grid
/// * `end` - End of the grid (exclusive)
/// * `dt` - Step of the grid in seconds
/// * `default_halflife` - Absorption halflife in seconds when no meal applies
/// * `foods` - Meals, in any order
/// * `initial_alcohol` - Alcohol (kg) already absorbed at `start`, e.g. from an earlier window
pub fn cumulative_absorption(
    drinks: &[Drink],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    dt: f64,
    default_halflife: f64,
    foods: &[Food],
    initial_alcohol: f64,
) -> Result<AbsorptionSeries, BacError> {
    if !(default_halflife.is_finite() && default_halflife > 0.0) {
        return Err(BacError::invalid_parameter(
            "default_halflife",
            default_halflife,
        ));
    }
    if !(initial_alcohol.is_finite() && initial_alcohol >= 0.0) {
        return Err(BacError::invalid_parameter(
            "initial_alcohol",
            initial_alcohol,
        ));
    }

    let offsets = Array1::from(grid_offsets(start, end, dt)?);
    let times: Vec<DateTime<Utc>> = offsets
        .iter()
        .map(|&offset| at_offset(start, offset))
        .collect();
    let halflife = Array1::from(halflife_vector(&times, foods, default_halflife));

    let ln2 = std::f64::consts::LN_2;
    let mut absorption = Array2::<f64>::zeros((drinks.len(), offsets.len()));
    for (mut row, drink) in absorption.axis_iter_mut(Axis(0)).zip(drinks) {
        let drink_offset = seconds_between(start, drink.time());
        let alcohol_kg = drink.alcohol_kg();
        Zip::from(&mut row)
            .and(&offsets)
            .and(&halflife)
            .for_each(|kg, &t, &h| {
                let elapsed = (t - drink_offset).max(0.0);
                *kg = alcohol_kg * (1.0 - (-elapsed * ln2 / h).exp());
            });
    }

    let kg_absorbed = absorption.sum_axis(Axis(0)) + initial_alcohol;
    AbsorptionSeries::new(times, kg_absorbed.to_vec())
}
