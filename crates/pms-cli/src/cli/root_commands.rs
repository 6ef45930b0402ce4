use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use pms_artifacts::ArtifactName;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Load a panel snapshot (panel, roster, questions, metrics) into the database.
    Import(ImportArgs),
    /// Group similar questions and write the ranked cluster list.
    Cluster(PanelArgs),
    /// Assign tagging questions to every student.
    Distribute(PanelArgs),
    /// Pick finalists from the top clusters by vote score.
    Shortlist(PanelArgs),
    /// Score questions and students and write the results back.
    Grade(PanelArgs),
    /// Print a stored artifact.
    Artifact(ArtifactArgs),
    /// Print the JSON schema of a record or artifact.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ImportArgs {
    /// Snapshot JSON file.
    pub snapshot: PathBuf,
}

#[derive(Clone, Debug, Args)]
pub struct PanelArgs {
    pub panel_id: String,
}

#[derive(Clone, Debug, Args)]
pub struct ArtifactArgs {
    pub panel_id: String,
    /// `questions.json`, `sortedCluster.json`, `finalQuestions.json`, or
    /// `distribution` / `clusters` / `shortlist`.
    pub name: ArtifactName,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    #[arg(value_enum)]
    pub target: SchemaTarget,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SchemaTarget {
    Question,
    Student,
    Panel,
    Metric,
    Snapshot,
    Clusters,
    Distribution,
    Shortlist,
}
