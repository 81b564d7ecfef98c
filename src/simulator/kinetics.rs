use crate::data::{AbsorptionSeries, BacSeries, Model, Person};
use crate::error::BacError;
use crate::simulator::elimination::elimination_rate;

/// BAC over time for one model, from a shared absorption series
///
/// The concentration reached without elimination is `kg_absorbed / (r * weight)`.
/// Elimination is then integrated step by step: at each step the rate is
/// evaluated from the BAC of the previous step, scaled by `dt / 60`, and
/// never removes more alcohol than is present. The output is aligned 1:1
/// with the timestamps of `absorption`.
///
/// # Arguments
///
/// * `person` - The subject
/// * `absorption` - Cumulative absorbed alcohol (kg)
/// * `model` - The Widmark-family model for the body factor
/// * `dt` - Step of the absorption grid in seconds
pub fn bac_for_model(
    person: &Person,
    absorption: &AbsorptionSeries,
    model: Model,
    dt: f64,
) -> Result<BacSeries, BacError> {
    if !(dt.is_finite() && dt > 0.0) {
        return Err(BacError::invalid_parameter("dt", dt));
    }
    let r = person.body_factor(model)?;
    let sex = person.sex();

    let bac_excluding_elimination: Vec<f64> = absorption
        .kg_absorbed()
        .iter()
        .map(|kg| kg / (r * person.weight()))
        .collect();

    let n = bac_excluding_elimination.len();
    let mut eliminated = vec![0.0; n];
    let mut bac = bac_excluding_elimination.clone();
    let step_scale = dt / 60.0;

    for i in 1..n {
        let current_bac = bac_excluding_elimination[i] - eliminated[i - 1];
        let rate = elimination_rate(sex, bac[i - 1]);
        let elimination = rate * step_scale;
        eliminated[i] = eliminated[i - 1] + current_bac.min(elimination);
        // Rounding in the subtraction can leave a value one ulp below zero
        bac[i] = (bac_excluding_elimination[i] - eliminated[i]).max(0.0);
    }

    Ok(BacSeries::from_columns(
        model,
        absorption.times().to_vec(),
        bac_excluding_elimination,
        eliminated,
        bac,
    ))
}
