//! Inference serving: request record, prediction service and response
//! shapes. The HTTP layer that carries these JSON shapes lives outside this
//! crate; everything here is transport-agnostic.

pub mod record;
pub mod service;

pub use record::HouseRecord;
pub use service::{
    BatchItem, BatchResponse, BatchStatistics, InferenceService, Interval, ModelInfo, Prediction,
};
