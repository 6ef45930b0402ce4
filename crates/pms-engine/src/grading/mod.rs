//! Grading: cluster quality, per-student stage scores, and cohort summaries.
//!
//! Everything here is pure; [`crate::PanelEngine::grade_panel`] does the
//! reads and writes around it.

pub mod cohort;
pub mod curves;
pub mod stats;
pub mod student;

use std::collections::{BTreeMap, HashMap, HashSet};

use pms_config::ScoringConfig;
use pms_core::artifacts::{ClusterDescriptor, ShortlistEntry};
use pms_core::entities::{CohortStats, Metric, Question};
use rust_decimal::Decimal;

pub use cohort::EngagementCohort;
pub use student::{GradingContext, StudentScores, grade_student};

use self::curves::cluster_quality;
use self::stats::{Spread, summarize, to_decimal};

/// Why one student's grade could not be computed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GradeError {
    #[error("{stage} stage exit precedes its entry")]
    ReversedWindow { stage: &'static str },

    #[error("authored question lookup failed: {0}")]
    QuestionLookup(String),
}

/// Final content score for every question in the panel.
///
/// Each ranked cluster is scored from `net_likes - mean / std_dev` over the
/// cluster population (zero when the population has no spread), and every
/// listed member inherits the cluster's score. Questions no cluster lists,
/// which are the flagged ones, score zero.
#[must_use]
pub fn score_questions(
    clusters: &[ClusterDescriptor],
    questions: &[Question],
    scoring: &ScoringConfig,
) -> BTreeMap<String, Decimal> {
    #[allow(clippy::cast_precision_loss)]
    let nets: Vec<f64> = clusters.iter().map(|c| c.net_likes as f64).collect();
    let spread = Spread::of(&nets);

    let mut by_member: HashMap<&str, Decimal> = HashMap::new();
    for (cluster, &net) in clusters.iter().zip(&nets) {
        let deviation = match spread {
            Some(s) if s.std_dev >= f64::EPSILON => to_decimal(net - s.mean / s.std_dev),
            _ => Decimal::ZERO,
        };
        let score = cluster_quality(deviation, scoring);
        tracing::debug!(
            representative_id = %cluster.representative_id,
            net_likes = cluster.net_likes,
            %deviation,
            %score,
            "scored cluster"
        );
        for member in &cluster.member_ids {
            by_member.insert(member.as_str(), score);
        }
    }

    questions
        .iter()
        .map(|q| {
            let score = by_member
                .get(q.id.as_str())
                .copied()
                .unwrap_or(Decimal::ZERO);
            (q.id.clone(), score)
        })
        .collect()
}

/// Students who authored a question in the tagging pool or the shortlist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageBonuses {
    tag: HashSet<String>,
    vote: HashSet<String>,
}

impl StageBonuses {
    /// Authors of every member of the first `tagging_pool_size` clusters
    /// earn the tag bonus; authors of every shortlisted member earn the
    /// vote bonus. Members missing from `questions` are skipped.
    #[must_use]
    pub fn new(
        clusters: &[ClusterDescriptor],
        shortlist: &[ShortlistEntry],
        questions: &[Question],
        tagging_pool_size: usize,
    ) -> Self {
        let authors: HashMap<&str, &str> = questions
            .iter()
            .map(|q| (q.id.as_str(), q.author_id.as_str()))
            .collect();
        let tag = authors_of(
            clusters
                .iter()
                .take(tagging_pool_size)
                .flat_map(|c| &c.member_ids),
            &authors,
        );
        let vote = authors_of(
            shortlist.iter().flat_map(|e| &e.cluster.member_ids),
            &authors,
        );
        Self { tag, vote }
    }

    /// Bonus sets given directly by student id.
    pub fn from_sets<T, V>(tag: T, vote: V) -> Self
    where
        T: IntoIterator,
        T::Item: Into<String>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        Self {
            tag: tag.into_iter().map(Into::into).collect(),
            vote: vote.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn earns_tag_bonus(&self, student_id: &str) -> bool {
        self.tag.contains(student_id)
    }

    #[must_use]
    pub fn earns_vote_bonus(&self, student_id: &str) -> bool {
        self.vote.contains(student_id)
    }
}

fn authors_of<'a>(
    members: impl Iterator<Item = &'a String>,
    authors: &HashMap<&str, &str>,
) -> HashSet<String> {
    members
        .filter_map(|id| {
            let author = authors.get(id.as_str());
            if author.is_none() {
                tracing::warn!(question_id = %id, "cluster member not found in panel");
            }
            author.map(|a| (*a).to_string())
        })
        .collect()
}

/// Min/max/mean of each stage over the metrics graded without error.
#[must_use]
pub fn cohort_stats(metrics: &[Metric]) -> CohortStats {
    let graded: Vec<&Metric> = metrics
        .iter()
        .filter(|m| m.grading_error.is_none())
        .collect();
    let column = |pick: fn(&Metric) -> Option<Decimal>| -> Vec<Decimal> {
        graded.iter().filter_map(|&m| pick(m)).collect()
    };
    CohortStats {
        question_stage: summarize(&column(|m| m.question_stage_score)),
        tag_stage: summarize(&column(|m| m.tag_stage_score)),
        vote_stage: summarize(&column(|m| m.vote_stage_score)),
    }
}
