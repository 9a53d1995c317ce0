//! Core traits for preprocessing transformers.
//!
//! Two-phase interface: an unfitted transformer carries configuration and
//! learns its parameters from training data; the fitted transformer is an
//! immutable bundle of learned state that maps frames to frames.

use crate::error::PipelineError;
use crate::frame::Frame;

/// Trait for unfitted transformers with hyperparameters.
///
/// `fit` learns parameters from the training frame (and, for supervised
/// encoders, the training target) and produces the corresponding fitted
/// transformer. Fitting never mutates the transformer itself, and the fitted
/// state is frozen once produced; transforming new data must never refit.
pub trait Transform: Clone {
    /// The corresponding fitted transformer type.
    type Fitted: FittedTransform;

    /// Learn parameters from the training data.
    ///
    /// `target` is the training target vector for stages that need it
    /// (the target encoder); stateless and unsupervised stages ignore it.
    ///
    /// # Errors
    /// Returns [`PipelineError`] if the data is empty or a required column
    /// or target is absent.
    fn fit(&self, frame: &Frame, target: Option<&[f64]>) -> Result<Self::Fitted, PipelineError>;

    /// Fit the transformer and transform the training data in one step.
    fn fit_transform(
        &self,
        frame: &Frame,
        target: Option<&[f64]>,
    ) -> Result<(Self::Fitted, Frame), PipelineError> {
        let fitted = self.fit(frame, target)?;
        let out = fitted.transform(frame)?;
        Ok((fitted, out))
    }
}

/// Trait for fitted transformers ready for inference.
///
/// `transform` is a pure function of the fitted state and its input: applying
/// it twice to the same frame yields identical output.
pub trait FittedTransform {
    /// Transform a frame using the learned parameters.
    fn transform(&self, frame: &Frame) -> Result<Frame, PipelineError>;
}
