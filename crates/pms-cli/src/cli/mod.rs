use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `pms` binary.
#[derive(Debug, Parser)]
#[command(name = "pms", version, about = "Peer-review panel grading engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub const fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands, OutputFormat};
    use crate::cli::root_commands::SchemaTarget;

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["pms", "--format", "raw", "--verbose", "cluster", "p-1"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Cluster(ref args) if args.panel_id == "p-1"));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["pms", "grade", "p-1", "--quiet"]).expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Grade(_)));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["pms", "--format", "table", "cluster", "p-1"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn import_takes_a_path() {
        let cli = Cli::try_parse_from(["pms", "import", "snap.json"]).expect("cli should parse");
        let Commands::Import(args) = cli.command else {
            panic!("expected import");
        };
        assert_eq!(args.snapshot, PathBuf::from("snap.json"));
    }

    #[test]
    fn artifact_name_accepts_aliases() {
        let cli = Cli::try_parse_from(["pms", "artifact", "p-1", "clusters"])
            .expect("cli should parse");
        let Commands::Artifact(args) = cli.command else {
            panic!("expected artifact");
        };
        assert_eq!(args.name, pms_artifacts::ArtifactName::SortedClusters);
    }

    #[test]
    fn schema_rejects_unknown_target() {
        assert!(Cli::try_parse_from(["pms", "schema", "nope"]).is_err());
        let cli = Cli::try_parse_from(["pms", "schema", "metric"]).expect("cli should parse");
        assert!(matches!(cli.command, Commands::Schema(ref args) if args.target == SchemaTarget::Metric));
    }
}
