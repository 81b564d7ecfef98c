//! Driving limits by jurisdiction and driver profile
//!
//! The table is read from a CSV file with one row per country, keyed by
//! the ISO 3166 alpha-2 code:
//!
//! ```text
//! alpha-2,regular,novice,professional
//! DE,0.05,0.0,0.0
//! US,0.08,0.02,0.04
//! ```
//!
//! An empty cell means no limit is known for that profile. Limits use the
//! same unit as the `bac_perc` column (g/dL).

use std::{collections::HashMap, fmt, io::Read, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::BacError;

/// Category of driver, since many jurisdictions apply stricter limits to some
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverProfile {
    Regular,
    /// Learners and recently licensed drivers
    Novice,
    /// Commercial and public transport drivers
    Professional,
}

impl fmt::Display for DriverProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DriverProfile::Regular => "regular",
            DriverProfile::Novice => "novice",
            DriverProfile::Professional => "professional",
        };
        write!(f, "{s}")
    }
}

impl FromStr for DriverProfile {
    type Err = BacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "regular" => Ok(DriverProfile::Regular),
            "novice" => Ok(DriverProfile::Novice),
            "professional" => Ok(DriverProfile::Professional),
            _ => Err(BacError::UnknownDriverProfile(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct ProfileLimits {
    regular: Option<f64>,
    novice: Option<f64>,
    professional: Option<f64>,
}

impl ProfileLimits {
    fn get(&self, profile: DriverProfile) -> Option<f64> {
        match profile {
            DriverProfile::Regular => self.regular,
            DriverProfile::Novice => self.novice,
            DriverProfile::Professional => self.professional,
        }
    }
}

#[derive(Deserialize)]
struct Row {
    #[serde(rename = "alpha-2")]
    alpha_2: String,
    #[serde(default)]
    regular: Option<f64>,
    #[serde(default)]
    novice: Option<f64>,
    #[serde(default)]
    professional: Option<f64>,
}

/// Driving limit lookup table
#[derive(Debug, Clone, Default)]
pub struct LegalLimits {
    countries: HashMap<String, ProfileLimits>,
}

impl LegalLimits {
    /// Read the table from a CSV file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, BacError> {
        let reader = csv::ReaderBuilder::new()
            .comment(Some(b'#'))
            .has_headers(true)
            .from_path(path)?;
        Self::from_csv(reader)
    }

    /// Read the table from any CSV source
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, BacError> {
        let reader = csv::ReaderBuilder::new()
            .comment(Some(b'#'))
            .has_headers(true)
            .from_reader(reader);
        Self::from_csv(reader)
    }

    fn from_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<Self, BacError> {
        // Header matching is case-insensitive
        let headers = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect::<Vec<_>>();
        reader.set_headers(csv::StringRecord::from(headers));

        let mut countries = HashMap::new();
        for row in reader.deserialize() {
            let row: Row = row?;
            let code = row.alpha_2.trim().to_uppercase();
            if code.is_empty() {
                continue;
            }
            for (profile, value) in [
                (DriverProfile::Regular, row.regular),
                (DriverProfile::Novice, row.novice),
                (DriverProfile::Professional, row.professional),
            ] {
                if let Some(v) = value {
                    if !(v.is_finite() && v >= 0.0) {
                        return Err(BacError::invalid_parameter(
                            &format!("{code}.{profile}"),
                            v,
                        ));
                    }
                }
            }
            countries.insert(
                code,
                ProfileLimits {
                    regular: row.regular,
                    novice: row.novice,
                    professional: row.professional,
                },
            );
        }
        Ok(LegalLimits { countries })
    }

    /// Driving limit (g/dL) for a country and driver profile
    ///
    /// Returns `None` if the country is not in the table or has no limit for the profile.
    pub fn limit(&self, alpha_2: &str, profile: DriverProfile) -> Option<f64> {
        let code = alpha_2.trim().to_uppercase();
        let Some(limits) = self.countries.get(&code) else {
            tracing::warn!("No information about the country {}", code);
            return None;
        };
        let limit = limits.get(profile);
        if limit.is_none() {
            tracing::warn!("No {} driving limit known for {}", profile, code);
        }
        limit
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}
