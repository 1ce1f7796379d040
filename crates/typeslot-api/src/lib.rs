//! REST API service for typeslot.
//!
//! Every endpoint is a thin wrapper over a [`TypeslotContext`] operation.
//! Successful responses are wrapped in [`ApiResponse`]; failures carry an
//! [`ErrorBody`] with a stable code.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check with stored file count and predictor kind
//! - `POST /stub` - Render a stub from a JSON `StubRequest`
//! - `POST /upload` - Infer the first file of a multipart upload
//! - `POST /infer?path=...` - Infer a raw text body
//! - `GET /inferred?path=...` - Stored predictions for a file
//! - `GET /stubs?path=...` - One stub per predicted function
//! - `POST /hints` - Hint candidates at a cursor position
//! - `POST /accept` - Report an accepted or dismissed prediction
//! - `GET /fixture` - Sample prediction fixture
//!
//! ## Usage
//!
//! ```rust,no_run
//! use typeslot_api::create_api_router;
//! use typeslot_ops::{Config, TypeslotContext};
//!
//! let ctx = TypeslotContext::from_config(Config::load().unwrap()).unwrap();
//! let app = axum::Router::new().nest("/api", create_api_router(ctx));
//! ```
//!
//! [`TypeslotContext`]: typeslot_ops::TypeslotContext

mod routes;
mod types;

pub use routes::create_api_router;
pub use types::{ApiResponse, ApiState, ErrorBody, HealthResponse};
