use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::BacError;

/// Density of ethanol in kg/L
pub const ETHANOL_DENSITY: f64 = 0.789;

/// A drink consumed by the subject
///
/// The alcohol mass is derived once on construction from the volume and
/// the alcohol proportion, and never recomputed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DrinkFields")]
pub struct Drink {
    name: String,
    volume: f64,
    alc_prop: f64,
    time: DateTime<Utc>,
    sip_interval: u32,
    alcohol_kg: f64,
}

impl Drink {
    /// Create a new drink
    ///
    /// # Arguments
    ///
    /// * `name` - Label of the drink
    /// * `volume` - Volume in liters
    /// * `alc_prop` - Proportion of alcohol by volume, between 0 and 1
    /// * `time` - Time the drink was started
    /// * `sip_interval` - Minutes over which the drink is consumed (at least 1)
    pub fn new(
        name: impl Into<String>,
        volume: f64,
        alc_prop: f64,
        time: DateTime<Utc>,
        sip_interval: u32,
    ) -> Result<Self, BacError> {
        if !(volume.is_finite() && volume >= 0.0) {
            return Err(BacError::invalid_parameter("volume", volume));
        }
        if !(0.0..=1.0).contains(&alc_prop) {
            return Err(BacError::invalid_parameter("alc_prop", alc_prop));
        }
        if sip_interval < 1 {
            return Err(BacError::invalid_parameter("sip_interval", sip_interval));
        }
        Ok(Drink {
            name: name.into(),
            volume,
            alc_prop,
            time,
            sip_interval,
            alcohol_kg: volume * alc_prop * ETHANOL_DENSITY,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Volume in liters
    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn alc_prop(&self) -> f64 {
        self.alc_prop
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    pub fn sip_interval(&self) -> u32 {
        self.sip_interval
    }

    /// Mass of ethanol in kilograms
    pub fn alcohol_kg(&self) -> f64 {
        self.alcohol_kg
    }

    /// Expand the drink into one-minute sips
    ///
    /// A drink with `sip_interval == n` becomes `n` drinks of `volume / n`,
    /// one minute apart starting at the original time. The alcohol
    /// proportion is unchanged, so the total alcohol mass is conserved.
    pub fn split_into_sips(&self) -> Vec<Drink> {
        if self.sip_interval == 1 {
            return vec![self.clone()];
        }

        let sip_volume = self.volume / self.sip_interval as f64;
        (0..self.sip_interval)
            .map(|i| Drink {
                name: self.name.clone(),
                volume: sip_volume,
                alc_prop: self.alc_prop,
                time: self.time + Duration::minutes(i as i64),
                sip_interval: 1,
                alcohol_kg: sip_volume * self.alc_prop * ETHANOL_DENSITY,
            })
            .collect()
    }
}

fn default_sip_interval() -> u32 {
    1
}

#[derive(Deserialize)]
struct DrinkFields {
    name: String,
    volume: f64,
    alc_prop: f64,
    time: DateTime<Utc>,
    #[serde(default = "default_sip_interval")]
    sip_interval: u32,
}

impl TryFrom<DrinkFields> for Drink {
    type Error = BacError;

    fn try_from(f: DrinkFields) -> Result<Self, Self::Error> {
        Drink::new(f.name, f.volume, f.alc_prop, f.time, f.sip_interval)
    }
}
