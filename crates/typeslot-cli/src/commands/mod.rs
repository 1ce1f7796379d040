//! CLI command implementations.

pub mod config;
pub mod hints;
pub mod infer;
pub mod serve;
pub mod stub;
