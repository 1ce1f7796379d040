//! Offline adapter answering every request with a canned payload.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

use typeslot_core::{AcceptedType, InferApiPayload};

use super::{PredictRequest, PredictorFuture, TypePredictor};
use crate::error::{OpsError, OpsResult};

/// How many recent requests and reports are kept.
pub const MAX_RECORDED: usize = 32;

/// Predictor returning a fixed payload and recording the most recent
/// requests and reports in memory.
#[derive(Debug, Default)]
pub struct FixturePredictor {
    payload: InferApiPayload,
    requests: Mutex<VecDeque<PredictRequest>>,
    reports: Mutex<VecDeque<AcceptedType>>,
}

impl FixturePredictor {
    pub fn new(payload: InferApiPayload) -> Self {
        Self {
            payload,
            requests: Mutex::new(VecDeque::new()),
            reports: Mutex::new(VecDeque::new()),
        }
    }

    /// Load the payload from a JSON file shaped like a service response.
    pub fn from_file(path: &Path) -> OpsResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| OpsError::Fixture {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let payload = serde_json::from_str(&contents).map_err(|e| OpsError::Fixture {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(Self::new(payload))
    }

    /// Recent requests, oldest first.
    pub fn requests(&self) -> Vec<PredictRequest> {
        self.requests
            .lock()
            .map(|r| r.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Recent reports, oldest first.
    pub fn reports(&self) -> Vec<AcceptedType> {
        self.reports
            .lock()
            .map(|r| r.iter().cloned().collect())
            .unwrap_or_default()
    }
}

fn record<T>(log: &Mutex<VecDeque<T>>, item: T) {
    if let Ok(mut log) = log.lock() {
        if log.len() == MAX_RECORDED {
            log.pop_front();
        }
        log.push_back(item);
    }
}

impl TypePredictor for FixturePredictor {
    fn kind(&self) -> &'static str {
        "fixture"
    }

    fn predict<'a>(&'a self, request: &'a PredictRequest) -> PredictorFuture<'a, InferApiPayload> {
        Box::pin(async move {
            record(&self.requests, request.clone());
            Ok(self.payload.clone())
        })
    }

    fn report<'a>(
        &'a self,
        accepted: &'a AcceptedType,
        _filter_predictions: bool,
    ) -> PredictorFuture<'a, ()> {
        Box::pin(async move {
            record(&self.reports, accepted.clone());
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use typeslot_core::{InferApiData, TypeSlot};

    #[tokio::test]
    async fn test_returns_payload_and_records_request() {
        let predictor = FixturePredictor::new(InferApiPayload::success(InferApiData {
            session_id: "s".into(),
            ..Default::default()
        }));
        let request = PredictRequest {
            path: "a.py".into(),
            source: "x = 1\n".into(),
            filter_predictions: true,
        };

        let payload = predictor.predict(&request).await.unwrap();
        assert_eq!(payload.response.unwrap().session_id, "s");
        assert_eq!(predictor.requests(), vec![request]);
    }

    #[tokio::test]
    async fn test_recordings_keep_only_recent_entries() {
        let predictor = FixturePredictor::default();
        for i in 0..MAX_RECORDED + 5 {
            let request = PredictRequest {
                path: format!("file{}.py", i),
                source: "x = 1\n".repeat(100),
                filter_predictions: true,
            };
            predictor.predict(&request).await.unwrap();
            let report = AcceptedType::cancelled(TypeSlot::Variable, "v", i as u32);
            predictor.report(&report, false).await.unwrap();
        }

        let requests = predictor.requests();
        assert_eq!(requests.len(), MAX_RECORDED);
        assert_eq!(requests[0].path, "file5.py");
        assert_eq!(
            requests[MAX_RECORDED - 1].path,
            format!("file{}.py", MAX_RECORDED + 4)
        );
        assert_eq!(predictor.reports().len(), MAX_RECORDED);
    }

    #[tokio::test]
    async fn test_records_reports() {
        let predictor = FixturePredictor::default();
        let report = AcceptedType::cancelled(TypeSlot::Variable, "v", 3);
        predictor.report(&report, false).await.unwrap();
        assert_eq!(predictor.reports(), vec![report]);
    }

    #[test]
    fn test_from_file_errors() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.json");
        assert!(matches!(
            FixturePredictor::from_file(&missing),
            Err(OpsError::Fixture { .. })
        ));

        let broken = temp.path().join("broken.json");
        std::fs::write(&broken, "{not json").unwrap();
        assert!(matches!(
            FixturePredictor::from_file(&broken),
            Err(OpsError::Fixture { .. })
        ));
    }

    #[test]
    fn test_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("payload.json");
        std::fs::write(&path, r#"{"error": "model offline"}"#).unwrap();

        let predictor = FixturePredictor::from_file(&path).unwrap();
        assert_eq!(predictor.payload.error.as_deref(), Some("model offline"));
    }
}
