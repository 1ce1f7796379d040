//! Stub commands.

use std::path::Path;

use anyhow::Result;
use typeslot_core::{ParameterDescriptor, StubRequest};
use typeslot_ops::Config;

use super::infer::infer_file;

/// Render one stub from command-line arguments.
pub fn execute(
    name: String,
    parameters: Vec<ParameterDescriptor>,
    return_type: Option<String>,
) -> Result<()> {
    let request = StubRequest {
        name,
        parameters,
        return_type,
    };
    request.validate()?;
    println!("{}", request.render());
    Ok(())
}

/// Infer `file` and print a stub for every predicted function.
pub async fn stubs(config: Config, file: &Path) -> Result<()> {
    let (ctx, response) = infer_file(config, file).await?;

    for stub in ctx.stubs(&response.path).await? {
        println!("{}", stub);
    }
    Ok(())
}
