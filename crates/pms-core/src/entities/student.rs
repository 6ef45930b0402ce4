use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Roster member of a panel. The engine only needs the identifier.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub struct Student {
    pub id: String,
    pub panel_id: String,
}
