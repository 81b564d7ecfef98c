//! Aggregation and threshold detection on simulated series

use approx::assert_relative_eq;
use bacflow::prelude::*;
use chrono::{DateTime, Duration, TimeZone, Utc};

fn evening() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap()
}

/// Two ciders on top of `initial_alcohol` kg already in the blood at the start
fn simulated(person: &Person, initial_alcohol: f64) -> SimulationResults {
    let drinks = [
        Drink::new("Cider", 0.5, 0.045, evening(), 15).unwrap(),
        Drink::new("Cider", 0.5, 0.045, evening() + Duration::minutes(45), 15).unwrap(),
    ];
    let options = SimulationOptions::default()
        .with_split_sips(true)
        .with_initial_alcohol(initial_alcohol);
    simulate(
        &drinks,
        person,
        evening(),
        evening() + Duration::hours(5),
        &options,
        &[],
    )
    .unwrap()
}

#[test]
fn test_aggregate_matches_manual_statistics() {
    // 20 kg gives every model a BAC far above what one step can eliminate
    let person = Person::new(45, 1.72, 77.0, Sex::Male).unwrap();
    let results = simulated(&person, 20.0);
    let aggregated = results.aggregate().unwrap();
    let series = results.successes();

    assert_eq!(aggregated.len(), 300);
    assert!(aggregated.mean_bac()[0] > 0.3);
    assert!(aggregated.var_bac()[0] > 0.0);
    let nonzero = aggregated.mean_bac().iter().filter(|&&m| m > 0.0).count();
    assert!(nonzero > 5);

    for i in 0..aggregated.len() {
        let values: Vec<f64> = series.iter().map(|s| s.bac()[i]).collect();
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        assert_relative_eq!(aggregated.mean_bac()[i], mean, epsilon = 1e-15, max_relative = 1e-12);
        assert_relative_eq!(aggregated.var_bac()[i], var, epsilon = 1e-15, max_relative = 1e-9);
    }
}

#[test]
fn test_aggregating_different_windows_fails() {
    let person = Person::new(45, 1.72, 77.0, Sex::Male).unwrap();
    let long = simulated(&person, 0.0);
    let drinks = [Drink::new("Cider", 0.5, 0.045, evening(), 1).unwrap()];
    let short = simulate(
        &drinks,
        &person,
        evening(),
        evening() + Duration::hours(1),
        &SimulationOptions::default().with_models(vec![Model::Seidl]),
        &[],
    )
    .unwrap();

    let mixed = [
        long.series(Model::Widmark).unwrap(),
        short.series(Model::Seidl).unwrap(),
    ];
    assert!(matches!(
        aggregate(mixed),
        Err(BacError::InconsistentSampling { .. })
    ));
}

#[test]
fn test_thresholds_of_a_simulation() {
    let person = Person::new(45, 1.72, 77.0, Sex::Male).unwrap();
    let aggregated = simulated(&person, 20.0).aggregate().unwrap();
    let limit = 0.1;
    let thresholds = identify_thresholds(&aggregated, limit, DEFAULT_TOLERANCE).unwrap();

    let times = aggregated.times();
    let mean = aggregated.mean_bac();
    let drive_safe = thresholds.drive_safe_time.unwrap();
    let sober = thresholds.sober_time.unwrap();
    let safe_idx = times.iter().position(|t| *t == drive_safe).unwrap();
    let sober_idx = times.iter().position(|t| *t == sober).unwrap();

    // The subject starts well above the limit and only crosses it later
    assert!(safe_idx > 0);
    assert!(mean[safe_idx - 1] >= limit);
    assert!(mean[safe_idx..].iter().all(|&b| b < limit));

    // Sober implies safe to drive, so the drive-safe run starts first
    assert!(safe_idx < sober_idx);
    assert!(mean[sober_idx - 1] > DEFAULT_TOLERANCE);
    assert!(mean[sober_idx..].iter().all(|&b| b <= DEFAULT_TOLERANCE));
}
