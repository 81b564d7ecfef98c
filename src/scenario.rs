//! Complete simulation requests
//!
//! A [Scenario] bundles everything needed for one estimate: the subject,
//! their drinks and meals, the time window, the simulation options and the
//! driving limit. It can be read from JSON, for example
//!
//! ```json
//! {
//!   "person": { "age": 30, "height": 1.75, "weight": 70.0, "sex": "male" },
//!   "drinks": [
//!     { "name": "Beer", "volume": 0.5, "alc_prop": 0.05, "time": "2024-05-01T20:00:00Z", "sip_interval": 15 }
//!   ],
//!   "foods": [
//!     { "name": "Pizza", "time": "2024-05-01T19:30:00Z", "category": "full" }
//!   ],
//!   "start": "2024-05-01T20:00:00Z",
//!   "end": "2024-05-02T04:00:00Z",
//!   "options": { "dt": 60, "split_sips": true },
//!   "driving_limit": 0.0005
//! }
//! ```

use std::{fs, path::Path};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data::{AggregatedSeries, Drink, Food, FoodCategory, Model, Person, Sex};
use crate::error::BacError;
use crate::simulator::{simulate, SimulationOptions, SimulationResults};
use crate::summary::{identify_thresholds, Thresholds, DEFAULT_TOLERANCE};

/// Parse the enum-valued fields that are present, surfacing their own errors
fn check_identifiers(value: &Value) -> Result<(), BacError> {
    if let Some(sex) = value.pointer("/person/sex").and_then(Value::as_str) {
        sex.parse::<Sex>()?;
    }
    if let Some(models) = value.pointer("/options/models").and_then(Value::as_array) {
        for model in models.iter().filter_map(Value::as_str) {
            model.parse::<Model>()?;
        }
    }
    if let Some(foods) = value.get("foods").and_then(Value::as_array) {
        for category in foods
            .iter()
            .filter_map(|f| f.get("category").and_then(Value::as_str))
        {
            category.parse::<FoodCategory>()?;
        }
    }
    Ok(())
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

/// A complete BAC estimation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub person: Person,
    pub drinks: Vec<Drink>,
    #[serde(default)]
    pub foods: Vec<Food>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub options: SimulationOptions,
    /// Legal limit for the drive-safe time, in the unit of `bac` (a
    /// [crate::data::LegalLimits] value divided by 100)
    pub driving_limit: f64,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

/// Outcome of [Scenario::run]
///
/// `aggregated` and `thresholds` are `None` when no model produced a series,
/// either because there were no drinks or because every model failed.
#[derive(Debug, Clone)]
pub struct Report {
    pub results: SimulationResults,
    pub aggregated: Option<AggregatedSeries>,
    pub thresholds: Option<Thresholds>,
}

impl Scenario {
    /// Parse a scenario from JSON
    ///
    /// An unrecognized sex, model or food category is reported as
    /// [BacError::InvalidSex], [BacError::InvalidModel] or
    /// [BacError::UnknownFoodCategory] rather than as a JSON error.
    pub fn from_json_str(json: &str) -> Result<Self, BacError> {
        let value: Value = serde_json::from_str(json)?;
        check_identifiers(&value)?;
        Ok(serde_json::from_value(value)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, BacError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Simulate every model, then aggregate and detect thresholds
    pub fn run(&self) -> Result<Report, BacError> {
        let results = simulate(
            &self.drinks,
            &self.person,
            self.start,
            self.end,
            &self.options,
            &self.foods,
        )?;

        if results.successes().is_empty() {
            tracing::debug!("No series to summarize");
            return Ok(Report {
                results,
                aggregated: None,
                thresholds: None,
            });
        }

        let aggregated = results.aggregate()?;
        let thresholds = identify_thresholds(&aggregated, self.driving_limit, self.tolerance)?;
        Ok(Report {
            results,
            aggregated: Some(aggregated),
            thresholds: Some(thresholds),
        })
    }
}
