use pms_core::artifacts::{ClusterDescriptor, ShortlistEntry, TagDistribution};
use pms_core::entities::{Metric, Panel, Question, Student};
use pms_core::snapshot::PanelSnapshot;
use schemars::{Schema, schema_for};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{SchemaArgs, SchemaTarget};
use crate::output::output;

/// Handle `pms schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&schema_of(args.target), flags.format)
}

fn schema_of(target: SchemaTarget) -> Schema {
    match target {
        SchemaTarget::Question => schema_for!(Question),
        SchemaTarget::Student => schema_for!(Student),
        SchemaTarget::Panel => schema_for!(Panel),
        SchemaTarget::Metric => schema_for!(Metric),
        SchemaTarget::Snapshot => schema_for!(PanelSnapshot),
        SchemaTarget::Clusters => schema_for!(Vec<ClusterDescriptor>),
        SchemaTarget::Distribution => schema_for!(TagDistribution),
        SchemaTarget::Shortlist => schema_for!(Vec<ShortlistEntry>),
    }
}
