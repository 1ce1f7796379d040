//! Hints command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use typeslot_ops::{Config, HintRequest};

use super::infer::infer_file;

/// Infer `file` and print the candidates at `line`/`column`.
pub async fn execute(
    config: Config,
    file: &Path,
    line: usize,
    column: usize,
    trigger: char,
) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let (ctx, inferred) = infer_file(config, file).await?;

    let request = HintRequest::new(inferred.path, text, line, column).with_trigger(trigger);
    let response = ctx.hints(request).await?;

    if response.candidates.is_empty() {
        println!("(no hints)");
        return Ok(());
    }

    for candidate in &response.candidates {
        println!(
            "{}. {}  ({} {}, line {})",
            candidate.rank, candidate.annotation, candidate.slot, candidate.identifier, candidate.line
        );
    }
    Ok(())
}
