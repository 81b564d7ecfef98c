use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::BacError;

/// Biological sex of the subject, which selects the coefficient branch of every model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Sex {
    Female,
    Male,
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Female => write!(f, "Female"),
            Sex::Male => write!(f, "Male"),
        }
    }
}

impl FromStr for Sex {
    type Err = BacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "f" | "female" => Ok(Sex::Female),
            "m" | "male" => Ok(Sex::Male),
            _ => Err(BacError::InvalidSex(s.to_string())),
        }
    }
}

impl TryFrom<String> for Sex {
    type Error = BacError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Sex> for String {
    fn from(sex: Sex) -> Self {
        sex.to_string()
    }
}

/// The subject of a simulation
///
/// Height is in meters and weight in kilograms. Both are validated to be
/// strictly positive (and finite) on construction; the struct is read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PersonFields")]
pub struct Person {
    age: u32,
    height: f64,
    weight: f64,
    sex: Sex,
}

impl Person {
    /// Create a new subject
    ///
    /// # Arguments
    ///
    /// * `age` - Age in completed years
    /// * `height` - Height in meters
    /// * `weight` - Weight in kilograms
    /// * `sex` - Biological sex
    pub fn new(age: u32, height: f64, weight: f64, sex: Sex) -> Result<Self, BacError> {
        if !(height.is_finite() && height > 0.0) {
            return Err(BacError::invalid_parameter("height", height));
        }
        if !(weight.is_finite() && weight > 0.0) {
            return Err(BacError::invalid_parameter("weight", weight));
        }
        Ok(Person {
            age,
            height,
            weight,
            sex,
        })
    }

    /// Create a subject whose age is derived from a date of birth
    ///
    /// The age is the number of completed years on the reference date `on`.
    pub fn from_date_of_birth(
        date_of_birth: NaiveDate,
        on: NaiveDate,
        height: f64,
        weight: f64,
        sex: Sex,
    ) -> Result<Self, BacError> {
        Person::new(age_on(date_of_birth, on)?, height, weight, sex)
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn sex(&self) -> Sex {
        self.sex
    }
}

/// Completed years between `date_of_birth` and `on`
fn age_on(date_of_birth: NaiveDate, on: NaiveDate) -> Result<u32, BacError> {
    if on < date_of_birth {
        return Err(BacError::invalid_parameter("date_of_birth", date_of_birth));
    }
    let mut years = on.year() - date_of_birth.year();
    if (on.month(), on.day()) < (date_of_birth.month(), date_of_birth.day()) {
        years -= 1;
    }
    u32::try_from(years).map_err(|_| BacError::invalid_parameter("date_of_birth", date_of_birth))
}

/// Serialized form of a [Person]; either `age` or `date_of_birth` must be present
#[derive(Deserialize)]
struct PersonFields {
    age: Option<u32>,
    date_of_birth: Option<NaiveDate>,
    height: f64,
    weight: f64,
    sex: Sex,
}

impl TryFrom<PersonFields> for Person {
    type Error = BacError;

    fn try_from(fields: PersonFields) -> Result<Self, Self::Error> {
        let age = match (fields.age, fields.date_of_birth) {
            (Some(age), _) => age,
            (None, Some(dob)) => age_on(dob, chrono::Utc::now().date_naive())?,
            (None, None) => return Err(BacError::invalid_parameter("age", "missing")),
        };
        Person::new(age, fields.height, fields.weight, fields.sex)
    }
}
