//! HTTP adapter for the type prediction service.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use typeslot_core::{AcceptedType, InferApiPayload};

use super::{PredictRequest, PredictorFuture, TypePredictor};
use crate::config::Config;
use crate::error::{OpsError, OpsResult};

const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Predictor backed by the remote prediction and telemetry endpoints.
#[derive(Debug, Clone)]
pub struct RemotePredictor {
    client: Client,
    infer_url: String,
    telemetry_url: String,
    activation_id: String,
    infer_timeout: Duration,
    telemetry_timeout: Duration,
}

impl RemotePredictor {
    /// Create a predictor from configured endpoints and timeouts.
    pub fn new(config: &Config) -> OpsResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("typeslot/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            infer_url: config.effective_infer_url().to_string(),
            telemetry_url: config.effective_telemetry_url().to_string(),
            activation_id: config.activation_id.clone(),
            infer_timeout: Duration::from_secs(config.infer_timeout_secs),
            telemetry_timeout: Duration::from_secs(config.telemetry_timeout_secs),
        })
    }

    /// Endpoint predictions are posted to.
    pub fn infer_url(&self) -> &str {
        &self.infer_url
    }
}

/// Hex SHA-256 of a file path, sent instead of the path itself.
pub fn file_hash(path: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

impl TypePredictor for RemotePredictor {
    fn kind(&self) -> &'static str {
        "remote"
    }

    fn predict<'a>(&'a self, request: &'a PredictRequest) -> PredictorFuture<'a, InferApiPayload> {
        Box::pin(async move {
            let query = [
                ("tc", "0".to_string()),
                ("fp", flag(request.filter_predictions).to_string()),
                ("ai", self.activation_id.clone()),
                ("fh", file_hash(&request.path)),
                ("ev", CLIENT_VERSION.to_string()),
            ];

            debug!(url = %self.infer_url, bytes = request.source.len(), "Posting source for prediction");

            let response = self
                .client
                .post(&self.infer_url)
                .query(&query)
                .header(CONTENT_TYPE, "text/plain")
                .timeout(self.infer_timeout)
                .body(request.source.clone())
                .send()
                .await?;

            let status = response.status();
            let body = response.text().await?;

            match serde_json::from_str::<InferApiPayload>(&body) {
                Ok(payload) => Ok(payload),
                Err(_) if !status.is_success() => Err(OpsError::Predictor(format!(
                    "prediction service returned HTTP {}",
                    status.as_u16()
                ))),
                Err(err) => Err(OpsError::Predictor(format!(
                    "malformed prediction payload: {}",
                    err
                ))),
            }
        })
    }

    fn report<'a>(
        &'a self,
        accepted: &'a AcceptedType,
        filter_predictions: bool,
    ) -> PredictorFuture<'a, ()> {
        Box::pin(async move {
            let response = self
                .client
                .get(&self.telemetry_url)
                .query(&accepted.to_query(filter_predictions))
                .timeout(self.telemetry_timeout)
                .send()
                .await?;

            if !response.status().is_success() {
                warn!(status = %response.status(), "Telemetry endpoint rejected report");
                return Err(OpsError::Predictor(format!(
                    "telemetry endpoint returned HTTP {}",
                    response.status().as_u16()
                )));
            }
            Ok(())
        })
    }
}
