use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ArtifactArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `pms artifact`.
pub async fn handle(args: &ArtifactArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let document: serde_json::Value = ctx
        .artifacts()
        .get_json(&args.panel_id, args.name)
        .await
        .with_context(|| format!("failed to read {} for panel {}", args.name, args.panel_id))?
        .with_context(|| {
            format!(
                "{} has not been written for panel {}",
                args.name, args.panel_id
            )
        })?;
    output(&document, flags.format)
}
