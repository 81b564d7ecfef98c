//! Widmark body factor `r`, the fraction of body weight through which
//! absorbed alcohol distributes.
//!
//! Every model is a pair of closed-form formulas, one per sex, over age
//! (years), height (m) and weight (kg). Results are clipped to
//! physiologically plausible bounds before the branch for the subject's
//! sex is selected.

use crate::data::{Model, Person, Sex};
use crate::error::BacError;

/// Bounds of the female body factor
pub const FEMALE_BOUNDS: (f64, f64) = (0.44, 0.80);
/// Bounds of the male body factor
pub const MALE_BOUNDS: (f64, f64) = (0.60, 0.87);

struct Anthropometry {
    age: f64,
    height: f64,
    weight: f64,
}

type Formula = fn(&Anthropometry) -> f64;

/// The (female, male) formulas of a model; `None` where the model has no estimator
fn formulas(model: Model) -> (Option<Formula>, Option<Formula>) {
    match model {
        Model::Forrest => (
            Some(|a: &Anthropometry| 0.8736 - 0.0124 * a.weight / a.height.powi(2)),
            Some(|a: &Anthropometry| 1.0178 - 0.012127 * a.weight / a.height.powi(2)),
        ),
        Model::Seidl => (
            Some(|a: &Anthropometry| 0.31223 - 0.006446 * a.weight + 0.4466 * a.height),
            Some(|a: &Anthropometry| 0.31608 - 0.004821 * a.weight + 0.4632 * a.height),
        ),
        Model::Widmark => (Some(|_: &Anthropometry| 0.55), Some(|_: &Anthropometry| 0.68)),
        Model::Watson => (
            Some(|a: &Anthropometry| 0.29218 + (12.666 * a.height - 2.4846) / a.weight),
            Some(|a: &Anthropometry| 0.39834 + (12.725 * a.height - 0.11275 * a.age + 2.8993) / a.weight),
        ),
        Model::Average => (
            Some(|a: &Anthropometry| {
                0.50766 + 0.11165 * a.height
                    - a.weight * (0.001612 + 0.0031 / a.height.powi(2))
                    - (1.0 / a.weight) * (0.62115 - 3.1665 * a.height)
            }),
            Some(|a: &Anthropometry| {
                0.62544 + 0.13664 * a.height
                    - a.weight * (0.00189 + 0.002425 / a.height.powi(2))
                    + (1.0 / a.weight) * (0.57986 + 2.545 * a.height - 0.02255 * a.age)
            }),
        ),
        Model::Ulrich => (None, Some(|a: &Anthropometry| 0.715 - 0.00462 * a.weight + 0.22 * a.height)),
    }
}

fn clip(value: f64, (lo, hi): (f64, f64)) -> f64 {
    value.max(lo).min(hi)
}

/// Body factor for a subject under the given model
///
/// # Arguments
///
/// * `age` - Age in years
/// * `height` - Height in meters
/// * `weight` - Weight in kilograms
/// * `sex` - Selects the female or male formula
/// * `model` - The Widmark-family model
///
/// # Errors
///
/// [BacError::UnsupportedModel] if the model has no formula for `sex`, and
/// [BacError::InvalidParameter] for a non-positive height or weight.
pub fn body_factor(
    age: u32,
    height: f64,
    weight: f64,
    sex: Sex,
    model: Model,
) -> Result<f64, BacError> {
    if !model.supports(sex) {
        return Err(BacError::UnsupportedModel { model, sex });
    }
    if !(height.is_finite() && height > 0.0) {
        return Err(BacError::invalid_parameter("height", height));
    }
    if !(weight.is_finite() && weight > 0.0) {
        return Err(BacError::invalid_parameter("weight", weight));
    }

    let a = Anthropometry {
        age: age as f64,
        height,
        weight,
    };
    let (female, male) = formulas(model);
    let r_female = female.map(|f| clip(f(&a), FEMALE_BOUNDS));
    let r_male = male.map(|f| clip(f(&a), MALE_BOUNDS));

    match sex {
        Sex::Female => r_female,
        Sex::Male => r_male,
    }
    .ok_or(BacError::UnsupportedModel { model, sex })
}

/// [body_factor] for identifiers given as strings, e.g. from a form or a file
pub fn body_factor_by_name(
    age: u32,
    height: f64,
    weight: f64,
    sex: &str,
    model: &str,
) -> Result<f64, BacError> {
    body_factor(age, height, weight, sex.parse()?, model.parse()?)
}

impl Person {
    /// Body factor of this subject under the given model
    pub fn body_factor(&self, model: Model) -> Result<f64, BacError> {
        body_factor(self.age(), self.height(), self.weight(), self.sex(), model)
    }
}
