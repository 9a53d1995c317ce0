//! Preprocessing transformers for the house price pipeline.
//!
//! Every transformer follows the same two-phase pattern: an unfitted
//! configuration type whose `fit` learns parameters from training data, and a
//! frozen fitted type whose `transform` is a pure function of that state.
//! [`pipeline::PreprocessingPipeline`] composes the stages in their fixed
//! order and produces the model feature matrix.

pub mod clean;
pub mod domain;
pub mod impute;
pub mod missing;
pub mod one_hot;
pub mod ordinal;
pub mod pipeline;
pub mod quantile;
pub mod rare;
pub mod target_encoding;
pub mod traits;

pub use clean::{AllMissingDropper, FiniteCleaner, FittedAllMissingDropper, FittedFiniteCleaner};
pub use domain::{DomainFeatures, FittedDomainFeatures};
pub use impute::{FittedImputer, ImputeStrategy, Imputer};
pub use missing::{FittedMissingnessIndicator, MissingnessIndicator, MISSING_SUFFIX};
pub use one_hot::{FittedOneHotEncoder, OneHotEncoder};
pub use ordinal::{FittedOrdinalMapper, OrdinalMapper};
pub use pipeline::{FeatureGroups, FittedPreprocessor, FittedStage, PreprocessingPipeline};
pub use quantile::{FittedQuantileTransformer, QuantileTransformer};
pub use rare::{FittedRarePooler, RarePooler, OTHER};
pub use target_encoding::{FittedTargetEncoder, TargetEncoder, TE_PREFIX};
pub use traits::{FittedTransform, Transform};
