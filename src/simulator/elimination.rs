use crate::data::Sex;
use crate::error::BacError;

/// Bounds of the alcohol elimination rate
pub const ELIMINATION_BOUNDS: (f64, f64) = (0.009, 0.035);

/// Alcohol elimination rate (AER) for the current BAC
///
/// Linear in BAC with a sex-specific intercept (Simic and Tasic, 2007),
/// clipped to [ELIMINATION_BOUNDS]. Non-finite input yields the lower bound.
pub fn elimination_rate(sex: Sex, bac: f64) -> f64 {
    let aer = match sex {
        Sex::Female => 0.16 + 0.05 * bac,
        Sex::Male => 0.14 + 0.05 * bac,
    };
    let (lo, hi) = ELIMINATION_BOUNDS;
    aer.max(lo).min(hi)
}

/// [elimination_rate] with the sex given as a string
pub fn elimination_rate_by_name(sex: &str, bac: f64) -> Result<f64, BacError> {
    Ok(elimination_rate(sex.parse()?, bac))
}
