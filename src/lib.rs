//! Blood alcohol concentration estimation with Widmark-family models
//!
//! Drinks (and optionally meals) are turned into a cumulative absorption
//! curve, which each model converts into a BAC series through its body
//! factor and a step-wise elimination recurrence. The per-model series can
//! then be aggregated and scanned for the drive-safe and sober times.

pub mod data;
pub mod error;
pub mod logging;
pub mod scenario;
pub mod simulator;
pub mod summary;

pub use crate::data::*;
pub use crate::scenario::{Report, Scenario};
pub use crate::simulator::{simulate, Horizon, SimulationOptions, SimulationResults};
pub use crate::summary::{aggregate, identify_thresholds, Thresholds, DEFAULT_TOLERANCE};
pub use error::BacError;

pub mod prelude {
    pub mod data {
        pub use crate::data::{
            AbsorptionSeries, AggregatedSeries, BacSeries, DriverProfile, Drink, Food,
            FoodCategory, LegalLimits, Model, Person, Sex,
        };
    }
    pub mod simulator {
        pub use crate::simulator::{
            bac_for_model, body_factor, cumulative_absorption, elimination_rate, simulate,
            Horizon, SimulationOptions, SimulationResults,
        };
    }

    pub use crate::data::*;
    pub use crate::error::BacError;
    pub use crate::scenario::{Report, Scenario};
    pub use crate::simulator::{simulate, Horizon, SimulationOptions, SimulationResults};
    pub use crate::summary::{aggregate, identify_thresholds, Thresholds, DEFAULT_TOLERANCE};
}
