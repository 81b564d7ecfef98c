use ndarray::{Array2, Axis};

use crate::data::{AggregatedSeries, BacSeries};
use crate::error::BacError;

/// Mean and population variance of `bac` across series, per timestamp
///
/// All series must share the same timestamps, in the same order.
///
/// # Errors
///
/// [BacError::InsufficientData] when no series is given, and
/// [BacError::InconsistentSampling] when a series is sampled differently
/// from the first one.
pub fn aggregate<'a, I>(series: I) -> Result<AggregatedSeries, BacError>
where
    I: IntoIterator<Item = &'a BacSeries>,
{
    let series: Vec<&BacSeries> = series.into_iter().collect();
    let reference = series
        .first()
        .ok_or_else(|| BacError::InsufficientData("no series to aggregate".to_string()))?;
    let times = reference.times();

    for s in &series[1..] {
        if s.len() != times.len() {
            return Err(BacError::InconsistentSampling {
                model: s.model(),
                reason: format!(
                    "has {} samples instead of {}",
                    s.len(),
                    times.len()
                ),
            });
        }
        if let Some(i) = s.times().iter().zip(times).position(|(a, b)| a != b) {
            return Err(BacError::InconsistentSampling {
                model: s.model(),
                reason: format!("differs from {} at sample {}", reference.model(), i),
            });
        }
    }

    let values: Vec<f64> = series.iter().flat_map(|s| s.bac().iter().copied()).collect();
    let bac = Array2::from_shape_vec((series.len(), times.len()), values)
        .map_err(|e| BacError::invalid_parameter("bac", e))?;

    let (mean_bac, var_bac) = if times.is_empty() {
        (Vec::new(), Vec::new())
    } else {
        let mean = bac
            .mean_axis(Axis(0))
            .ok_or_else(|| BacError::InsufficientData("no series to aggregate".to_string()))?;
        (mean.to_vec(), bac.var_axis(Axis(0), 0.0).to_vec())
    };

    AggregatedSeries::new(times.to_vec(), mean_bac, var_bac)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Model;
    use approx::assert_relative_eq;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn minutes(n: usize) -> Vec<DateTime<Utc>> {
        let start = Utc.with_ymd_and_hms(2023, 1, 1, 12, 0, 0).unwrap();
        (0..n).map(|i| start + Duration::minutes(i as i64)).collect()
    }

    fn series(model: Model, bac: Vec<f64>) -> BacSeries {
        let n = bac.len();
        BacSeries::from_columns(model, minutes(n), bac.clone(), vec![0.0; n], bac)
    }

    #[test]
    fn test_identical_series() {
        let bac = vec![0.0, 0.01, 0.03, 0.02];
        let a = series(Model::Seidl, bac.clone());
        let b = series(Model::Widmark, bac.clone());
        let agg = aggregate([&a, &b]).unwrap();

        assert_eq!(agg.len(), 4);
        assert_eq!(agg.times(), a.times());
        for i in 0..4 {
            assert_relative_eq!(agg.mean_bac()[i], bac[i], epsilon = 1e-15);
            assert_eq!(agg.var_bac()[i], 0.0);
        }
    }

    #[test]
    fn test_population_variance() {
        let a = series(Model::Seidl, vec![0.10]);
        let b = series(Model::Watson, vec![0.20]);
        let agg = aggregate(vec![&a, &b]).unwrap();
        assert_relative_eq!(agg.mean_bac()[0], 0.15, epsilon = 1e-12);
        assert_relative_eq!(agg.var_bac()[0], 0.0025, epsilon = 1e-12);
    }

    #[test]
    fn test_single_series() {
        let a = series(Model::Forrest, vec![0.1, 0.2]);
        let agg = aggregate([&a]).unwrap();
        assert_eq!(agg.mean_bac(), a.bac());
        assert_eq!(agg.var_bac(), &[0.0, 0.0]);
    }

    #[test]
    fn test_no_series() {
        let empty: Vec<&BacSeries> = vec![];
        assert!(matches!(
            aggregate(empty),
            Err(BacError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_inconsistent_sampling() {
        let a = series(Model::Seidl, vec![0.1, 0.2, 0.3]);
        let b = series(Model::Widmark, vec![0.1, 0.2]);
        assert!(matches!(
            aggregate([&a, &b]),
            Err(BacError::InconsistentSampling {
                model: Model::Widmark,
                ..
            })
        ));

        let mut shifted = minutes(3);
        shifted[2] += Duration::seconds(1);
        let c = BacSeries::from_columns(
            Model::Average,
            shifted,
            vec![0.0; 3],
            vec![0.0; 3],
            vec![0.0; 3],
        );
        assert!(matches!(
            aggregate([&a, &c]),
            Err(BacError::InconsistentSampling {
                model: Model::Average,
                ..
            })
        ));
    }
}
