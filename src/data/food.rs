use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::BacError;

/// Size of a meal, which slows the absorption of alcohol consumed after it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FoodCategory {
    /// A piece of fruit, a handful of nuts
    Snack,
    Light,
    /// A regular meal
    Moderate,
    Full,
    /// A multi-course meal or a buffet
    Heavy,
}

impl FoodCategory {
    /// Absorption halflife in seconds while this meal is the most recent one
    pub fn halflife(&self) -> f64 {
        match self {
            FoodCategory::Snack => 6.0 * 60.0,
            FoodCategory::Light => 9.0 * 60.0,
            FoodCategory::Moderate => 12.0 * 60.0,
            FoodCategory::Full => 15.0 * 60.0,
            FoodCategory::Heavy => 18.0 * 60.0,
        }
    }
}

impl fmt::Display for FoodCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FoodCategory::Snack => "snack",
            FoodCategory::Light => "light",
            FoodCategory::Moderate => "moderate",
            FoodCategory::Full => "full",
            FoodCategory::Heavy => "heavy",
        };
        write!(f, "{s}")
    }
}

impl FromStr for FoodCategory {
    type Err = BacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "snack" => Ok(FoodCategory::Snack),
            "light" => Ok(FoodCategory::Light),
            "moderate" => Ok(FoodCategory::Moderate),
            "full" => Ok(FoodCategory::Full),
            "heavy" => Ok(FoodCategory::Heavy),
            _ => Err(BacError::UnknownFoodCategory(s.to_string())),
        }
    }
}

impl TryFrom<String> for FoodCategory {
    type Error = BacError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<FoodCategory> for String {
    fn from(category: FoodCategory) -> Self {
        category.to_string()
    }
}

/// A food intake event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    name: String,
    time: DateTime<Utc>,
    category: FoodCategory,
}

impl Food {
    pub fn new(name: impl Into<String>, time: DateTime<Utc>, category: FoodCategory) -> Self {
        Food {
            name: name.into(),
            time,
            category,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    pub fn category(&self) -> FoodCategory {
        self.category
    }

    /// Absorption halflife in seconds associated with this intake
    pub fn halflife(&self) -> f64 {
        self.category.halflife()
    }
}
