use anyhow::Context;
use pms_core::snapshot::PanelSnapshot;
use pms_db::repos::snapshot::ImportSummary;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ImportArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct ImportResponse {
    panel_id: String,
    #[serde(flatten)]
    summary: ImportSummary,
}

/// Handle `pms import`.
pub async fn handle(args: &ImportArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let snapshot = read_snapshot(args)?;
    let summary = ctx
        .db()
        .import_snapshot(&snapshot)
        .await
        .with_context(|| format!("failed to import panel {}", snapshot.panel.id))?;

    output(
        &ImportResponse {
            panel_id: snapshot.panel.id,
            summary,
        },
        flags.format,
    )
}

fn read_snapshot(args: &ImportArgs) -> anyhow::Result<PanelSnapshot> {
    let path = &args.snapshot;
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    serde_json::from_str(&body)
        .with_context(|| format!("failed to parse snapshot {}", path.display()))
}
