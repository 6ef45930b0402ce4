//! The fixed set of artifact documents.

use std::fmt;
use std::str::FromStr;

use crate::ArtifactError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactName {
    /// Student id to assigned question ids, written by distribution.
    TagDistribution,
    /// Ranked cluster descriptors, written by clustering.
    SortedClusters,
    /// Finalist shortlist, written by the shortlist stage.
    FinalQuestions,
}

impl ArtifactName {
    pub const ALL: [Self; 3] = [
        Self::TagDistribution,
        Self::SortedClusters,
        Self::FinalQuestions,
    ];

    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::TagDistribution => "questions.json",
            Self::SortedClusters => "sortedCluster.json",
            Self::FinalQuestions => "finalQuestions.json",
        }
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Accepts either the file name or a short alias (`distribution`,
/// `clusters`, `shortlist`).
impl FromStr for ArtifactName {
    type Err = ArtifactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "questions.json" | "distribution" => Ok(Self::TagDistribution),
            "sortedCluster.json" | "clusters" => Ok(Self::SortedClusters),
            "finalQuestions.json" | "shortlist" => Ok(Self::FinalQuestions),
            other => Err(ArtifactError::UnknownArtifact(other.to_string())),
        }
    }
}
