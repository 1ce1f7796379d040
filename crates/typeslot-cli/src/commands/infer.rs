//! Infer command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use typeslot_ops::{Config, InferRequest, InferResponse, TypeslotContext};

/// Read `file`, build a context and infer it.
///
/// Returns the context so callers can run further operations against the
/// stored predictions.
pub async fn infer_file(config: Config, file: &Path) -> Result<(TypeslotContext, InferResponse)> {
    let source = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let ctx = TypeslotContext::from_config(config)?;

    let request = InferRequest::new(file.display().to_string(), source);
    let response = ctx.infer(request).await?;
    Ok((ctx, response))
}

/// Predict types for `file` and print a summary or JSON.
pub async fn execute(config: Config, file: &Path, json: bool) -> Result<()> {
    let (_, response) = infer_file(config, file).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("✅ Inferred {}", response.path);
    println!("{:-<40}", "");
    println!("Functions: {}", response.function_count);
    println!("Variables: {}", response.variable_count);
    if let Some(session_id) = &response.session_id {
        println!("Session:   {}", session_id);
    }

    if !response.data.functions.is_empty() {
        println!();
        for function in &response.data.functions {
            let (first, last) = function.lines;
            println!(
                "   • {} (lines {}-{}) -> {}",
                function.name,
                first,
                last,
                function.return_types.join(" | ")
            );
            for (param, annotations) in &function.params {
                println!("       {}: {}", param, annotations.join(" | "));
            }
        }
    }

    if !response.data.variables.is_empty() {
        println!();
        for variable in &response.data.variables {
            println!(
                "   • {} (line {}): {}",
                variable.name,
                variable.lines.0,
                variable.annotations.join(" | ")
            );
        }
    }

    Ok(())
}
