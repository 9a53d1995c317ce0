//! # housecast
//!
//! House price regression: a feature-engineering pipeline, a gradient-boosted
//! tree model and an inference service with strict separation between
//! training and serving.
//!
//! ## Core Design Principles
//!
//! - **Two-phase transformers**: every preprocessing stage is an unfitted
//!   configuration type plus a frozen fitted type; fitting happens exactly
//!   once on training data, and transform is a pure function of fitted state.
//! - **Fixed stage order**: the pipeline composes its stages as tagged
//!   variants in one ordered list; the final feature schema is recorded at
//!   fit time and enforced on every transform.
//! - **Immutable serving state**: the persisted artifact (pipeline + model +
//!   interval policy) is loaded once at startup and shared read-only.
//!
//! ## Module Structure
//!
//! - `frame` — named-column table of mixed raw values, plus CSV ingestion
//! - `schema` — target column, ordinal vocabularies, field aliases
//! - `preprocessing` — the transformers and their pipeline composition
//! - `model` — gradient-boosted regression trees behind fit/predict
//! - `artifact` — the serialized pipeline + model bundle
//! - `train` — offline training orchestration and evaluation
//! - `serve` — request record, inference service, response shapes
//! - `tracking` — experiment-tracker contract and JSON run recorder
//! - `config` — training configuration loaded from JSON
//! - `stats` — quantile and normal-distribution helpers

pub mod artifact;
pub mod config;
pub mod error;
pub mod frame;
pub mod model;
pub mod preprocessing;
pub mod schema;
pub mod serve;
pub mod stats;
pub mod tracking;
pub mod train;

pub use artifact::{IntervalPolicy, PipelineArtifact, TrainMetrics};
pub use error::{PipelineError, ServeError};
pub use frame::{Frame, Value};
pub use preprocessing::{FittedPreprocessor, PreprocessingPipeline};
pub use serve::{HouseRecord, InferenceService};
