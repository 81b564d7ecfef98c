//! Time series produced by the simulator
//!
//! All series are column-oriented: one `Vec` of timestamps and one `Vec`
//! per quantity, aligned index by index.

use std::io::Write;

use chrono::{DateTime, SecondsFormat, Utc};
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};

use crate::data::Model;
use crate::error::BacError;

fn check_lengths(param: &str, expected: usize, actual: usize) -> Result<(), BacError> {
    if expected != actual {
        return Err(BacError::invalid_parameter(
            param,
            format!("{actual} values for {expected} timestamps"),
        ));
    }
    Ok(())
}

fn format_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Cumulative mass of alcohol absorbed (kg) on a uniform time grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AbsorptionFields")]
pub struct AbsorptionSeries {
    times: Vec<DateTime<Utc>>,
    kg_absorbed: Vec<f64>,
}

impl AbsorptionSeries {
    pub fn new(times: Vec<DateTime<Utc>>, kg_absorbed: Vec<f64>) -> Result<Self, BacError> {
        check_lengths("kg_absorbed", times.len(), kg_absorbed.len())?;
        Ok(AbsorptionSeries { times, kg_absorbed })
    }

    pub fn times(&self) -> &[DateTime<Utc>] {
        &self.times
    }

    pub fn kg_absorbed(&self) -> &[f64] {
        &self.kg_absorbed
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// A single sample of a [BacSeries]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BacPoint {
    pub time: DateTime<Utc>,
    pub bac: f64,
    pub bac_perc: f64,
}

/// Blood alcohol concentration over time for one model
///
/// Besides `bac` and `bac_perc` the series keeps the intermediate columns
/// of the elimination recurrence: the concentration that would be reached
/// without any elimination, and the cumulative amount eliminated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BacFields")]
pub struct BacSeries {
    model: Model,
    times: Vec<DateTime<Utc>>,
    bac_excluding_elimination: Vec<f64>,
    eliminated: Vec<f64>,
    bac: Vec<f64>,
    bac_perc: Vec<f64>,
}

impl BacSeries {
    pub(crate) fn from_columns(
        model: Model,
        times: Vec<DateTime<Utc>>,
        bac_excluding_elimination: Vec<f64>,
        eliminated: Vec<f64>,
        bac: Vec<f64>,
    ) -> Self {
        let bac_perc = bac.iter().map(|b| b * 100.0).collect();
        BacSeries {
            model,
            times,
            bac_excluding_elimination,
            eliminated,
            bac,
            bac_perc,
        }
    }

    pub fn model(&self) -> Model {
        self.model
    }

    pub fn times(&self) -> &[DateTime<Utc>] {
        &self.times
    }

    pub fn bac_excluding_elimination(&self) -> &[f64] {
        &self.bac_excluding_elimination
    }

    pub fn eliminated(&self) -> &[f64] {
        &self.eliminated
    }

    pub fn bac(&self) -> &[f64] {
        &self.bac
    }

    /// BAC in percent (g/dL)
    pub fn bac_perc(&self) -> &[f64] {
        &self.bac_perc
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = BacPoint> + '_ {
        self.times
            .iter()
            .zip(self.bac.iter().zip(&self.bac_perc))
            .map(|(&time, (&bac, &bac_perc))| BacPoint {
                time,
                bac,
                bac_perc,
            })
    }

    /// The sample with the highest BAC (the earliest one on ties)
    pub fn peak(&self) -> Option<BacPoint> {
        self.points().fold(None, |best: Option<BacPoint>, p| match best {
            Some(b) if b.bac >= p.bac => Some(b),
            _ => Some(p),
        })
    }

    /// The sample in effect at `time`: the last one at or before it
    pub fn value_at(&self, time: DateTime<Utc>) -> Option<BacPoint> {
        let idx = self.times.partition_point(|t| *t <= time);
        if idx == 0 {
            return None;
        }
        self.points().nth(idx - 1)
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.times.truncate(len);
        self.bac_excluding_elimination.truncate(len);
        self.eliminated.truncate(len);
        self.bac.truncate(len);
        self.bac_perc.truncate(len);
    }

    /// Write the series as CSV with the columns `time,bac,bac_perc`
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), BacError> {
        let mut writer = WriterBuilder::new().has_headers(true).from_writer(writer);
        writer.write_record(["time", "bac", "bac_perc"])?;
        for point in self.points() {
            writer.write_record([
                format_time(&point.time),
                point.bac.to_string(),
                point.bac_perc.to_string(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// A single sample of an [AggregatedSeries]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregatedPoint {
    pub time: DateTime<Utc>,
    pub mean_bac: f64,
    pub var_bac: f64,
}

/// Mean and population variance of BAC across models, per timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AggregatedFields")]
pub struct AggregatedSeries {
    times: Vec<DateTime<Utc>>,
    mean_bac: Vec<f64>,
    var_bac: Vec<f64>,
}

impl AggregatedSeries {
    pub fn new(
        times: Vec<DateTime<Utc>>,
        mean_bac: Vec<f64>,
        var_bac: Vec<f64>,
    ) -> Result<Self, BacError> {
        check_lengths("mean_bac", times.len(), mean_bac.len())?;
        check_lengths("var_bac", times.len(), var_bac.len())?;
        Ok(AggregatedSeries {
            times,
            mean_bac,
            var_bac,
        })
    }

    pub fn times(&self) -> &[DateTime<Utc>] {
        &self.times
    }

    pub fn mean_bac(&self) -> &[f64] {
        &self.mean_bac
    }

    pub fn var_bac(&self) -> &[f64] {
        &self.var_bac
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = AggregatedPoint> + '_ {
        self.times
            .iter()
            .zip(self.mean_bac.iter().zip(&self.var_bac))
            .map(|(&time, (&mean_bac, &var_bac))| AggregatedPoint {
                time,
                mean_bac,
                var_bac,
            })
    }

    /// Write the series as CSV with the columns `time,mean_bac,var_bac`
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), BacError> {
        let mut writer = WriterBuilder::new().has_headers(true).from_writer(writer);
        writer.write_record(["time", "mean_bac", "var_bac"])?;
        for point in self.points() {
            writer.write_record([
                format_time(&point.time),
                point.mean_bac.to_string(),
                point.var_bac.to_string(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[derive(Deserialize)]
struct AbsorptionFields {
    times: Vec<DateTime<Utc>>,
    kg_absorbed: Vec<f64>,
}

impl TryFrom<AbsorptionFields> for AbsorptionSeries {
    type Error = BacError;

    fn try_from(f: AbsorptionFields) -> Result<Self, Self::Error> {
        AbsorptionSeries::new(f.times, f.kg_absorbed)
    }
}

/// Serialized form of a [BacSeries]; `bac_perc` is always derived from `bac`
#[derive(Deserialize)]
struct BacFields {
    model: Model,
    times: Vec<DateTime<Utc>>,
    bac_excluding_elimination: Vec<f64>,
    eliminated: Vec<f64>,
    bac: Vec<f64>,
}

impl TryFrom<BacFields> for BacSeries {
    type Error = BacError;

    fn try_from(f: BacFields) -> Result<Self, Self::Error> {
        let n = f.times.len();
        check_lengths("bac_excluding_elimination", n, f.bac_excluding_elimination.len())?;
        check_lengths("eliminated", n, f.eliminated.len())?;
        check_lengths("bac", n, f.bac.len())?;
        Ok(BacSeries::from_columns(
            f.model,
            f.times,
            f.bac_excluding_elimination,
            f.eliminated,
            f.bac,
        ))
    }
}

#[derive(Deserialize)]
struct AggregatedFields {
    times: Vec<DateTime<Utc>>,
    mean_bac: Vec<f64>,
    var_bac: Vec<f64>,
}

impl TryFrom<AggregatedFields> for AggregatedSeries {
    type Error = BacError;

    fn try_from(f: AggregatedFields) -> Result<Self, Self::Error> {
        AggregatedSeries::new(f.times, f.mean_bac, f.var_bac)
    }
}
