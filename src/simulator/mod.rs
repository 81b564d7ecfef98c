//! Multi-model BAC simulation
//!
//! A simulation computes one absorption series shared by all requested
//! models, then runs the elimination kinetics of every model on a worker
//! pool sized to the number of models. Each model's outcome is kept
//! separately, so an unsupported model does not affect the others.

pub mod absorption;
pub mod body_factor;
pub mod elimination;
pub mod kinetics;

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::{AggregatedSeries, BacSeries, Drink, Food, Model, Person};
use crate::error::BacError;
use crate::summary::aggregate;

pub use absorption::{cumulative_absorption, halflife_vector, time_grid};
pub use body_factor::{body_factor, body_factor_by_name, FEMALE_BOUNDS, MALE_BOUNDS};
pub use elimination::{elimination_rate, elimination_rate_by_name, ELIMINATION_BOUNDS};
pub use kinetics::bac_for_model;

/// How far the simulated series extend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Horizon {
    /// The caller's window is used as is
    #[default]
    Fixed,
    /// Series are cut just after every model has returned to zero BAC
    /// once the last drink has been started
    TrimWhenSober,
}

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationOptions {
    /// Step of the time grid in seconds (default: 60)
    pub dt: f64,

    /// Absorption halflife in seconds when no meal applies (default: 720)
    pub default_halflife: f64,

    /// Alcohol (kg) already absorbed at the start of the window (default: 0)
    pub initial_alcohol: f64,

    /// Models to run; `None` runs every model supported for the subject's sex
    pub models: Option<Vec<Model>>,

    /// Expand drinks into one-minute sips before absorption (default: false)
    pub split_sips: bool,

    pub horizon: Horizon,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            dt: 60.0,
            default_halflife: 720.0,
            initial_alcohol: 0.0,
            models: None,
            split_sips: false,
            horizon: Horizon::Fixed,
        }
    }
}

impl SimulationOptions {
    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    pub fn with_default_halflife(mut self, halflife: f64) -> Self {
        self.default_halflife = halflife;
        self
    }

    pub fn with_initial_alcohol(mut self, kg: f64) -> Self {
        self.initial_alcohol = kg;
        self
    }

    pub fn with_models(mut self, models: Vec<Model>) -> Self {
        self.models = Some(models);
        self
    }

    pub fn with_split_sips(mut self, split: bool) -> Self {
        self.split_sips = split;
        self
    }

    pub fn with_horizon(mut self, horizon: Horizon) -> Self {
        self.horizon = horizon;
        self
    }

    /// Check that the numeric options are usable
    pub fn validate(&self) -> Result<(), BacError> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(BacError::invalid_parameter("dt", self.dt));
        }
        if !(self.default_halflife.is_finite() && self.default_halflife > 0.0) {
            return Err(BacError::invalid_parameter(
                "default_halflife",
                self.default_halflife,
            ));
        }
        if !(self.initial_alcohol.is_finite() && self.initial_alcohol >= 0.0) {
            return Err(BacError::invalid_parameter(
                "initial_alcohol",
                self.initial_alcohol,
            ));
        }
        Ok(())
    }

    /// The distinct models to run for a subject, in a stable order
    fn models_for(&self, person: &Person) -> Vec<Model> {
        match &self.models {
            Some(models) => models.iter().copied().collect::<BTreeSet<_>>(),
            None => Model::supported_for(person.sex()).iter().copied().collect(),
        }
        .into_iter()
        .collect()
    }
}

/// Per-model outcome of a simulation
///
/// Every requested model maps to either its BAC series or the error that
/// aborted it.
#[derive(Debug, Clone, Default)]
pub struct SimulationResults {
    outcomes: BTreeMap<Model, Result<BacSeries, BacError>>,
}

impl SimulationResults {
    pub fn get(&self, model: Model) -> Option<&Result<BacSeries, BacError>> {
        self.outcomes.get(&model)
    }

    /// The series of a model, if it was requested and succeeded
    pub fn series(&self, model: Model) -> Option<&BacSeries> {
        self.outcomes.get(&model).and_then(|r| r.as_ref().ok())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Model, &Result<BacSeries, BacError>)> {
        self.outcomes.iter()
    }

    /// All successful series
    pub fn successes(&self) -> Vec<&BacSeries> {
        self.outcomes
            .values()
            .filter_map(|r| r.as_ref().ok())
            .collect()
    }

    /// All failed models with their error
    pub fn errors(&self) -> Vec<(Model, &BacError)> {
        self.outcomes
            .iter()
            .filter_map(|(m, r)| r.as_ref().err().map(|e| (*m, e)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Every series, or the first error (in model order) if any model failed
    pub fn into_series(self) -> Result<BTreeMap<Model, BacSeries>, BacError> {
        self.outcomes
            .into_iter()
            .map(|(model, result)| result.map(|series| (model, series)))
            .collect()
    }

    /// Mean and variance across the successful models
    pub fn aggregate(&self) -> Result<AggregatedSeries, BacError> {
        aggregate(self.successes())
    }
}

/// Simulate BAC over `[start, end)` for every requested model
///
/// Returns empty results without computing anything when `drinks` is
/// empty. Invalid options or window fail the whole call; a model that
/// fails (for instance [BacError::UnsupportedModel]) only fails its own
/// entry.
pub fn simulate(
    drinks: &[Drink],
    person: &Person,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    options: &SimulationOptions,
    foods: &[Food],
) -> Result<SimulationResults, BacError> {
    options.validate()?;
    if drinks.is_empty() {
        return Ok(SimulationResults::default());
    }

    let drinks: Vec<Drink> = if options.split_sips {
        drinks.iter().flat_map(Drink::split_into_sips).collect()
    } else {
        drinks.to_vec()
    };

    let absorption = cumulative_absorption(
        &drinks,
        start,
        end,
        options.dt,
        options.default_halflife,
        foods,
        options.initial_alcohol,
    )?;

    let models = options.models_for(person);
    tracing::debug!(
        samples = absorption.len(),
        models = models.len(),
        "Running BAC simulation"
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(models.len().max(1))
        .build()
        .map_err(|e| BacError::ThreadPool(e.to_string()))?;
    let outcomes: Vec<(Model, Result<BacSeries, BacError>)> = pool.install(|| {
        models
            .par_iter()
            .map(|&model| {
                (
                    model,
                    bac_for_model(person, &absorption, model, options.dt),
                )
            })
            .collect()
    });

    let mut outcomes: BTreeMap<Model, Result<BacSeries, BacError>> =
        outcomes.into_iter().collect();
    for (model, outcome) in &outcomes {
        if let Err(e) = outcome {
            tracing::warn!("Model {} failed: {}", model, e);
        }
    }

    if options.horizon == Horizon::TrimWhenSober {
        if let Some(last_drink) = drinks.iter().map(Drink::time).max() {
            trim_when_sober(&mut outcomes, last_drink);
        }
    }

    Ok(SimulationResults { outcomes })
}

/// Cut every successful series at a common length, just past the first
/// zero BAC that every model reaches after `last_drink`
fn trim_when_sober(
    outcomes: &mut BTreeMap<Model, Result<BacSeries, BacError>>,
    last_drink: DateTime<Utc>,
) {
    let mut cut = 0;
    for series in outcomes.values().filter_map(|r| r.as_ref().ok()) {
        let from = series.times().partition_point(|t| *t <= last_drink);
        let sober = series.bac()[from..]
            .iter()
            .position(|&b| b == 0.0)
            .map(|i| from + i + 1)
            .unwrap_or(series.len());
        cut = cut.max(sober);
    }
    tracing::trace!(len = cut, "Trimming series once sober");
    for series in outcomes.values_mut().filter_map(|r| r.as_mut().ok()) {
        series.truncate(cut);
    }
}
