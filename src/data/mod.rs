pub mod drink;
pub mod food;
pub mod limits;
pub mod model;
pub mod person;
pub mod series;
pub use drink::{Drink, ETHANOL_DENSITY};
pub use food::{Food, FoodCategory};
pub use limits::{DriverProfile, LegalLimits};
pub use model::Model;
pub use person::{Person, Sex};
pub use series::*;
