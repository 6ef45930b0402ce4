use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Import(args) => commands::import::handle(&args, ctx, flags).await,
        Commands::Cluster(args) => commands::stage::cluster(&args, ctx, flags).await,
        Commands::Distribute(args) => commands::stage::distribute(&args, ctx, flags).await,
        Commands::Shortlist(args) => commands::stage::shortlist(&args, ctx, flags).await,
        Commands::Grade(args) => commands::stage::grade(&args, ctx, flags).await,
        Commands::Artifact(args) => commands::artifact::handle(&args, ctx, flags).await,
        Commands::Schema(args) => commands::schema::handle(&args, flags),
    }
}
