//! Type predictor port and adapters.
//!
//! The prediction model lives behind [`TypePredictor`]. The context owns one
//! `Arc<dyn TypePredictor>` built at startup; handlers never construct or
//! lazily initialise a predictor themselves.

mod fixture;
mod remote;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use typeslot_core::{AcceptedType, InferApiPayload};

use crate::config::{Config, PredictorKind};
use crate::error::{OpsError, OpsResult};

pub use fixture::FixturePredictor;
pub use remote::{file_hash, RemotePredictor};

/// Boxed future returned by [`TypePredictor`] methods, keeping the trait
/// dyn-compatible.
pub type PredictorFuture<'a, T> = Pin<Box<dyn Future<Output = OpsResult<T>> + Send + 'a>>;

/// Everything sent to the model for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictRequest {
    /// Path identifying the file; only its hash leaves the process.
    pub path: String,
    /// Full source text.
    pub source: String,
    /// Ask the service to drop unlikely predictions.
    pub filter_predictions: bool,
}

/// Source of type predictions.
pub trait TypePredictor: Send + Sync {
    /// Short name shown in status output.
    fn kind(&self) -> &'static str;

    /// Predict types for a source file.
    ///
    /// # Errors
    ///
    /// Returns an error when the service cannot be reached or its answer is
    /// not a prediction payload. A payload carrying an `error` field is *not*
    /// an error at this level.
    fn predict<'a>(&'a self, request: &'a PredictRequest) -> PredictorFuture<'a, InferApiPayload>;

    /// Report an accepted (or dismissed) prediction.
    fn report<'a>(
        &'a self,
        accepted: &'a AcceptedType,
        filter_predictions: bool,
    ) -> PredictorFuture<'a, ()>;
}

/// Build the predictor selected by `config`.
pub fn build_predictor(config: &Config) -> OpsResult<Arc<dyn TypePredictor>> {
    match config.predictor {
        PredictorKind::Remote => Ok(Arc::new(RemotePredictor::new(config)?)),
        PredictorKind::Fixture => {
            let path = config.fixture_path.as_ref().ok_or_else(|| {
                OpsError::Config(
                    "predictor is 'fixture' but no fixture_path is configured".to_string(),
                )
            })?;
            Ok(Arc::new(FixturePredictor::from_file(path)?))
        }
    }
}
