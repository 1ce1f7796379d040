//! TypeslotContext - The main service for executing operations.
//!
//! The context owns the configuration, the predictor chosen at startup, and
//! the in-memory store of predictions. It can be used by CLI, REST API, or any
//! other consumer; clones share the same store.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use typeslot_core::{complete, transform_infer_api_data, Cursor, InferData, TypeStore};

use crate::config::Config;
use crate::error::{OpsError, OpsResult};
use crate::predictor::{build_predictor, PredictRequest, TypePredictor};
use crate::requests::*;
use crate::responses::*;

/// The main operations context.
///
/// Thread-safe and cheap to clone into request handlers.
#[derive(Clone)]
pub struct TypeslotContext {
    /// Configuration for operations.
    pub config: Config,
    predictor: Arc<dyn TypePredictor>,
    store: Arc<RwLock<TypeStore>>,
    sessions: Arc<RwLock<HashMap<String, String>>>,
}

impl fmt::Debug for TypeslotContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeslotContext")
            .field("config", &self.config)
            .field("predictor", &self.predictor.kind())
            .finish_non_exhaustive()
    }
}

impl TypeslotContext {
    /// Create a context around an already-built predictor.
    pub fn new(config: Config, predictor: Arc<dyn TypePredictor>) -> Self {
        Self {
            config,
            predictor,
            store: Arc::new(RwLock::new(TypeStore::new())),
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a context with the predictor selected by `config`.
    pub fn from_config(config: Config) -> OpsResult<Self> {
        let predictor = build_predictor(&config)?;
        Ok(Self::new(config, predictor))
    }

    /// Short name of the active predictor.
    pub fn predictor_kind(&self) -> &'static str {
        self.predictor.kind()
    }

    // =========================================================================
    // Stub Operations
    // =========================================================================

    /// Render a function stub.
    pub fn stub(&self, request: StubRequest) -> OpsResult<StubResponse> {
        request.validate()?;
        Ok(StubResponse {
            stub: request.render(),
        })
    }

    /// One stub per predicted function of `path`, using top-ranked types.
    pub async fn stubs(&self, path: &str) -> OpsResult<Vec<String>> {
        let data = self.inferred(path).await?;
        Ok(data
            .functions
            .iter()
            .map(|function| StubRequest::from_function(function).render())
            .collect())
    }

    // =========================================================================
    // Inference Operations
    // =========================================================================

    /// Predict types for a source file and store them under its path.
    pub async fn infer(&self, request: InferRequest) -> OpsResult<InferResponse> {
        if request.path.is_empty() {
            return Err(OpsError::invalid_argument("path must not be empty"));
        }
        if request.source.is_empty() {
            return Err(OpsError::EmptySource);
        }
        let max = self.config.max_source_bytes();
        if request.source.len() > max {
            return Err(OpsError::SourceTooLarge {
                size: request.source.len(),
                max,
            });
        }

        info!(
            path = %request.path,
            bytes = request.source.len(),
            predictor = self.predictor.kind(),
            "Inferring types"
        );

        let payload = self
            .predictor
            .predict(&PredictRequest {
                path: request.path.clone(),
                source: request.source,
                filter_predictions: self.config.filter_predictions,
            })
            .await?;

        let api_data = payload.into_result().map_err(|err| {
            warn!(path = %request.path, error = %err, "Prediction service returned no predictions");
            OpsError::from(err)
        })?;

        let data = transform_infer_api_data(&api_data);
        let session_id = (!api_data.session_id.is_empty()).then(|| api_data.session_id.clone());

        self.store.write().await.add(request.path.clone(), data.clone());
        {
            let mut sessions = self.sessions.write().await;
            match &session_id {
                Some(id) => {
                    sessions.insert(request.path.clone(), id.clone());
                }
                None => {
                    sessions.remove(&request.path);
                }
            }
        }

        info!(
            path = %request.path,
            functions = data.functions.len(),
            variables = data.variables.len(),
            "Stored predictions"
        );

        Ok(InferResponse {
            path: request.path,
            session_id,
            function_count: data.functions.len(),
            variable_count: data.variables.len(),
            data,
        })
    }

    /// Stored predictions for `path`.
    pub async fn inferred(&self, path: &str) -> OpsResult<InferData> {
        self.store
            .read()
            .await
            .get(path)
            .cloned()
            .ok_or_else(|| OpsError::NotInferred {
                path: path.to_string(),
            })
    }

    /// Drop stored predictions for `path`. Returns whether anything was stored.
    pub async fn forget(&self, path: &str) -> bool {
        self.sessions.write().await.remove(path);
        self.store.write().await.remove(path).is_some()
    }

    // =========================================================================
    // Hint Operations
    // =========================================================================

    /// Hint candidates at a cursor position.
    ///
    /// With `auto_infer` enabled a file with no stored predictions is inferred
    /// from the request text first.
    pub async fn hints(&self, request: HintRequest) -> OpsResult<HintResponse> {
        let stored = self.store.read().await.get(&request.path).cloned();
        let data = match stored {
            Some(data) => data,
            None if self.config.auto_infer => {
                debug!(path = %request.path, "No stored predictions, inferring first");
                self.infer(InferRequest::new(request.path.clone(), request.text.clone()))
                    .await?
                    .data
            }
            None => {
                return Err(OpsError::NotInferred {
                    path: request.path,
                })
            }
        };

        let cursor = Cursor::from_utf16(&request.text, request.line, request.character);
        let candidates = complete(&data, &cursor, request.trigger);

        debug!(
            path = %request.path,
            line = request.line,
            character = request.character,
            trigger = %request.trigger,
            count = candidates.len(),
            "Computed hints"
        );

        Ok(HintResponse {
            path: request.path,
            candidates,
        })
    }

    // =========================================================================
    // Telemetry Operations
    // =========================================================================

    /// Report an accepted or dismissed prediction.
    ///
    /// Nothing leaves the process unless `share_accepted_predictions` is set.
    /// Delivery failures are logged and reported as `submitted: false`.
    pub async fn accept(&self, request: AcceptRequest) -> OpsResult<AcceptResponse> {
        if !self.config.share_accepted_predictions {
            debug!(path = %request.path, "Sharing accepted predictions is disabled");
            return Ok(AcceptResponse { submitted: false });
        }

        let mut accepted = request.accepted;
        if accepted.session_id.is_none() {
            accepted.session_id = self.sessions.read().await.get(&request.path).cloned();
        }

        match self
            .predictor
            .report(&accepted, self.config.filter_predictions)
            .await
        {
            Ok(()) => {
                info!(
                    path = %request.path,
                    slot = %accepted.slot,
                    accepted = accepted.is_accepted(),
                    "Reported prediction"
                );
                Ok(AcceptResponse { submitted: true })
            }
            Err(err) => {
                warn!(path = %request.path, error = %err, "Failed to report prediction");
                Ok(AcceptResponse { submitted: false })
            }
        }
    }

    // =========================================================================
    // Status Operations
    // =========================================================================

    pub async fn status(&self) -> StatusResponse {
        StatusResponse {
            predictor: self.predictor.kind().to_string(),
            files: self.store.read().await.keys(),
            filter_predictions: self.config.filter_predictions,
            share_accepted_predictions: self.config.share_accepted_predictions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::FixturePredictor;
    use typeslot_core::{InferApiData, InferApiPayload, ParameterDescriptor};

    fn empty_context(payload: InferApiPayload) -> TypeslotContext {
        TypeslotContext::new(Config::default(), Arc::new(FixturePredictor::new(payload)))
    }

    #[test]
    fn test_stub_rejects_empty_name() {
        let ctx = empty_context(InferApiPayload::default());
        assert!(matches!(
            ctx.stub(StubRequest::new("")),
            Err(OpsError::InvalidArgument(_))
        ));

        let response = ctx
            .stub(StubRequest::new("add").with_parameter(ParameterDescriptor::typed("a", "int")))
            .unwrap();
        assert_eq!(response.stub, "def add(a: int): ...");
    }

    #[tokio::test]
    async fn test_infer_rejects_bad_sources() {
        let mut config = Config::default();
        config.max_source_kb = 1;
        let ctx = TypeslotContext::new(config, Arc::new(FixturePredictor::default()));

        assert!(matches!(
            ctx.infer(InferRequest::new("a.py", "")).await,
            Err(OpsError::EmptySource)
        ));
        assert!(matches!(
            ctx.infer(InferRequest::new("a.py", "x".repeat(1025))).await,
            Err(OpsError::SourceTooLarge { size: 1025, max: 1024 })
        ));
        assert!(matches!(
            ctx.infer(InferRequest::new("", "x = 1")).await,
            Err(OpsError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn test_failure_payload_is_not_stored() {
        let ctx = empty_context(InferApiPayload::failure("model offline"));
        let err = ctx.infer(InferRequest::new("a.py", "x = 1\n")).await.unwrap_err();
        assert_eq!(err.code(), "PREDICTION_FAILED");
        assert!(err.to_string().contains("model offline"));
        assert!(ctx.status().await.files.is_empty());
    }

    #[tokio::test]
    async fn test_inferred_and_forget() {
        let ctx = empty_context(InferApiPayload::success(InferApiData::default()));
        assert!(matches!(
            ctx.inferred("a.py").await,
            Err(OpsError::NotInferred { .. })
        ));

        let response = ctx.infer(InferRequest::new("a.py", "x = 1\n")).await.unwrap();
        assert_eq!(response.session_id, None);
        assert!(ctx.inferred("a.py").await.is_ok());

        assert!(ctx.forget("a.py").await);
        assert!(!ctx.forget("a.py").await);
    }

    #[tokio::test]
    async fn test_hints_without_predictions() {
        let ctx = empty_context(InferApiPayload::success(InferApiData::default()));
        let request = HintRequest::new("a.py", "def f(x:", 0, 8);
        assert!(matches!(
            ctx.hints(request).await,
            Err(OpsError::NotInferred { .. })
        ));
    }

    #[tokio::test]
    async fn test_hints_column_counts_utf16_units() {
        let payload: InferApiPayload = serde_json::from_str(
            r#"{"response": {"funcs": [{
                "name": "greet",
                "fn_lc": [[1, 0], [2, 10]],
                "params": {"name": ""},
                "params_p": {"name": [["str", 0.9]]}
            }]}}"#,
        )
        .unwrap();
        let ctx = empty_context(payload);
        let text = "def greet(\u{1F600}, name:\n    pass\n";
        ctx.infer(InferRequest::new("a.py", text)).await.unwrap();

        // The emoji counts as two UTF-16 units, so the cursor after `:` is 19.
        let response = ctx.hints(HintRequest::new("a.py", text, 0, 19)).await.unwrap();
        assert_eq!(response.candidates.len(), 1);
        assert_eq!(response.candidates[0].annotation, "str");
        assert_eq!(response.candidates[0].identifier, "name");
    }

    #[tokio::test]
    async fn test_accept_disabled_by_default() {
        let predictor = Arc::new(FixturePredictor::default());
        let ctx = TypeslotContext::new(Config::default(), predictor.clone());
        let accepted = typeslot_core::AcceptedType::cancelled(typeslot_core::TypeSlot::Variable, "v", 1);

        let response = ctx.accept(AcceptRequest::new("a.py", accepted)).await.unwrap();
        assert!(!response.submitted);
        assert!(predictor.reports().is_empty());
    }
}
