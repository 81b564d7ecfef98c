use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::data::Sex;
use crate::error::BacError;

/// A Widmark-family formula for the body factor `r`
///
/// Serialized by name; deserialization goes through [FromStr], so it is
/// case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Model {
    Forrest,
    Seidl,
    Widmark,
    Watson,
    Average,
    /// Only defined for male subjects
    Ulrich,
}

const MALE_MODELS: [Model; 6] = [
    Model::Forrest,
    Model::Seidl,
    Model::Widmark,
    Model::Watson,
    Model::Average,
    Model::Ulrich,
];

const FEMALE_MODELS: [Model; 5] = [
    Model::Forrest,
    Model::Seidl,
    Model::Widmark,
    Model::Watson,
    Model::Average,
];

impl Model {
    /// Every known model
    pub const ALL: [Model; 6] = MALE_MODELS;

    /// The models that define a formula for subjects of the given sex
    pub fn supported_for(sex: Sex) -> &'static [Model] {
        match sex {
            Sex::Male => &MALE_MODELS,
            Sex::Female => &FEMALE_MODELS,
        }
    }

    pub fn supports(&self, sex: Sex) -> bool {
        Model::supported_for(sex).contains(self)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Model::Forrest => "Forrest",
            Model::Seidl => "Seidl",
            Model::Widmark => "Widmark",
            Model::Watson => "Watson",
            Model::Average => "Average",
            Model::Ulrich => "Ulrich",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Model {
    type Err = BacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "forrest" => Ok(Model::Forrest),
            "seidl" => Ok(Model::Seidl),
            "widmark" => Ok(Model::Widmark),
            "watson" => Ok(Model::Watson),
            "average" => Ok(Model::Average),
            "ulrich" => Ok(Model::Ulrich),
            _ => Err(BacError::InvalidModel(s.to_string())),
        }
    }
}

impl TryFrom<String> for Model {
    type Error = BacError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Model> for String {
    fn from(model: Model) -> Self {
        model.to_string()
    }
}
