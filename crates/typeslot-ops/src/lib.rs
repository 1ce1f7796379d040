//! Typeslot Operations Layer
//!
//! This crate provides a typed API for every typeslot operation. It is
//! consumed by both the CLI and the REST API, so both surfaces behave the
//! same way.
//!
//! ## Architecture
//!
//! - **Requests**: Typed input DTOs for each operation
//! - **Responses**: Typed output DTOs with all relevant data
//! - **TypePredictor**: Port to the prediction model, with a remote HTTP
//!   adapter and an offline fixture adapter
//! - **TypeslotContext**: The service that executes operations and owns the
//!   in-memory type store
//!
//! ## Usage
//!
//! ```rust,no_run
//! use typeslot_ops::{Config, InferRequest, TypeslotContext};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load()?;
//!     let ctx = TypeslotContext::from_config(config)?;
//!
//!     let source = std::fs::read_to_string("app.py")?;
//!     let response = ctx.infer(InferRequest::new("app.py", source)).await?;
//!
//!     println!("Predicted {} functions", response.function_count);
//!     Ok(())
//! }
//! ```

mod config;
mod context;
mod error;
pub mod predictor;
mod requests;
mod responses;

// Re-export public API
pub use config::{
    Config, PredictorKind, CONFIG_KEYS, INFER_URL, INFER_URL_DEV, TELEMETRY_URL,
    TELEMETRY_URL_DEV,
};
pub use context::TypeslotContext;
pub use error::{OpsError, OpsResult};
pub use predictor::{
    build_predictor, FixturePredictor, PredictRequest, RemotePredictor, TypePredictor,
};
pub use requests::*;
pub use responses::*;
