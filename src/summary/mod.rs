//! Cross-model summaries of simulated BAC
//!
//! The per-model series of a simulation are combined into a mean and
//! variance series, from which the drive-safe and sober times are read.

pub mod aggregate;
pub mod threshold;

pub use aggregate::aggregate;
pub use threshold::{identify_thresholds, Thresholds, DEFAULT_TOLERANCE};
