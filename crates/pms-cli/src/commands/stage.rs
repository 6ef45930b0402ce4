use pms_engine::EngineError;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::PanelArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `pms cluster`.
pub async fn cluster(args: &PanelArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let clusters = ctx.engine.cluster_questions(&args.panel_id).await?;
    output(&clusters, flags.format)
}

/// Handle `pms distribute`.
///
/// An unsatisfiable distribution prints its deficiency report before failing.
pub async fn distribute(
    args: &PanelArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match ctx.engine.distribute_tag_questions(&args.panel_id).await {
        Ok(distribution) => output(&distribution, flags.format),
        Err(EngineError::Unsatisfiable(report)) => {
            output(&report, flags.format)?;
            anyhow::bail!("tag distribution unsatisfiable: {report}")
        }
        Err(error) => Err(error.into()),
    }
}

/// Handle `pms shortlist`.
pub async fn shortlist(
    args: &PanelArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let finalists = ctx.engine.generate_shortlist(&args.panel_id).await?;
    output(&finalists, flags.format)
}

/// Handle `pms grade`.
pub async fn grade(args: &PanelArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let report = ctx.engine.grade_panel(&args.panel_id).await?;
    output(&report, flags.format)
}
