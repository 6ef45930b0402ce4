//! Finalist shortlist from the ranked clusters and representative votes.

use pms_core::artifacts::{ClusterDescriptor, ShortlistEntry};

/// Rank candidate clusters by their representative's vote score.
///
/// Candidates without a vote score are dropped. Equal scores keep cluster
/// rank order. At most `finalist_count` entries are returned.
#[must_use]
pub fn rank_finalists<I>(candidates: I, finalist_count: usize) -> Vec<ShortlistEntry>
where
    I: IntoIterator<Item = (ClusterDescriptor, Option<i64>)>,
{
    let mut finalists: Vec<ShortlistEntry> = candidates
        .into_iter()
        .filter_map(|(cluster, vote_score)| {
            vote_score.map(|vote_score| ShortlistEntry {
                cluster,
                vote_score,
            })
        })
        .collect();
    finalists.sort_by(|a, b| b.vote_score.cmp(&a.vote_score));
    finalists.truncate(finalist_count);
    finalists
}
