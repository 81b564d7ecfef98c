use thiserror::Error;

use crate::data::{Model, Sex};

/// Errors that can occur while estimating blood alcohol concentration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BacError {
    /// The model identifier is not one of the Widmark-family formulas
    #[error("Model '{0}' is not recognized")]
    InvalidModel(String),

    /// The model is recognized but has no formula for the subject's sex
    #[error("The model {model} is not supported for subjects of sex {sex}")]
    UnsupportedModel { model: Model, sex: Sex },

    /// The sex identifier could not be parsed
    #[error("Unknown sex: {0}")]
    InvalidSex(String),

    #[error("Unknown food category: {0}")]
    UnknownFoodCategory(String),

    #[error("Unknown driver profile: {0}")]
    UnknownDriverProfile(String),

    /// Nothing to aggregate or analyze
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Series handed to the aggregator do not share the same time grid
    #[error("Inconsistent sampling: series for {model} {reason}")]
    InconsistentSampling { model: Model, reason: String },

    /// Invalid parameter value
    #[error("Invalid parameter: {param} = {value}")]
    InvalidParameter { param: String, value: String },

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("I/O error: {0}")]
    Io(String),

    /// The worker pool for the multi-model run could not be created
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// A tracing subscriber could not be installed
    #[error("Logging setup error: {0}")]
    Logging(String),
}

impl BacError {
    pub(crate) fn invalid_parameter(param: &str, value: impl ToString) -> Self {
        BacError::InvalidParameter {
            param: param.to_string(),
            value: value.to_string(),
        }
    }
}

impl From<csv::Error> for BacError {
    fn from(e: csv::Error) -> Self {
        BacError::Csv(e.to_string())
    }
}

impl From<serde_json::Error> for BacError {
    fn from(e: serde_json::Error) -> Self {
        BacError::Json(e.to_string())
    }
}

impl From<std::io::Error> for BacError {
    fn from(e: std::io::Error) -> Self {
        BacError::Io(e.to_string())
    }
}
