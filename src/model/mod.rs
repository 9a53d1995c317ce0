//! Regression models consumed through a fit/predict contract.

pub mod gbdt;

pub use gbdt::{FittedGbdt, GbdtParams, GradientBoostedRegressor};
