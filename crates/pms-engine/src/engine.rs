//! [`PanelEngine`]: runs each stage for one panel against injected stores.

use pms_artifacts::{ArtifactName, ArtifactStore};
use pms_config::PmsConfig;
use pms_core::artifacts::{ClusterDescriptor, ShortlistEntry, TagDistribution};
use pms_core::entities::{CohortStats, Metric, Panel};
use pms_core::store::PanelRepository;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cluster::build_clusters;
use crate::distribute::distribute;
use crate::error::EngineError;
use crate::grading::{
    EngagementCohort, GradeError, GradingContext, StageBonuses, StudentScores, cohort_stats,
    grade_student, score_questions,
};
use crate::shortlist::rank_finalists;

/// Outcome of one grading run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradingReport {
    pub panel_id: String,
    pub graded: usize,
    /// `(student_id, reason)` for every student isolated as a failure.
    pub failed: Vec<(String, String)>,
    pub questions_scored: usize,
    pub cohort: CohortStats,
}

/// Stage runner for panels.
///
/// Every stage recomputes from the source records and replaces its
/// artifact. Runs for the same panel must not overlap.
pub struct PanelEngine<S> {
    store: S,
    artifacts: ArtifactStore,
    config: PmsConfig,
}

impl<S: PanelRepository> PanelEngine<S> {
    pub const fn new(store: S, artifacts: ArtifactStore, config: PmsConfig) -> Self {
        Self {
            store,
            artifacts,
            config,
        }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    async fn require_panel(&self, panel_id: &str) -> Result<Panel, EngineError> {
        self.store
            .get_panel(panel_id)
            .await?
            .ok_or_else(|| EngineError::NotFound {
                entity: "panel",
                id: panel_id.to_string(),
            })
    }

    async fn require_artifact<T: serde::de::DeserializeOwned>(
        &self,
        panel_id: &str,
        name: ArtifactName,
    ) -> Result<T, EngineError> {
        self.artifacts
            .get_json(panel_id, name)
            .await?
            .ok_or_else(|| EngineError::NotFound {
                entity: "artifact",
                id: ArtifactStore::key(panel_id, name).to_string(),
            })
    }

    /// Cluster the panel's questions and store the ranking.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown panel, or a store/artifact failure.
    #[tracing::instrument(skip(self))]
    pub async fn cluster_questions(
        &self,
        panel_id: &str,
    ) -> Result<Vec<ClusterDescriptor>, EngineError> {
        self.require_panel(panel_id).await?;
        let questions = self.store.list_questions_by_panel(panel_id).await?;
        let clusters = build_clusters(&questions);
        self.artifacts
            .put_json(panel_id, ArtifactName::SortedClusters, &clusters)
            .await?;
        tracing::info!(
            questions = questions.len(),
            clusters = clusters.len(),
            "clustered questions"
        );
        Ok(clusters)
    }

    /// Assign tagging questions to every student and store the map.
    ///
    /// Nothing is written unless every student received a full bucket.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown panel, `InsufficientQuestions`,
    /// `Unsatisfiable` with the deficiency report, or a store/artifact failure.
    #[tracing::instrument(skip(self))]
    pub async fn distribute_tag_questions(
        &self,
        panel_id: &str,
    ) -> Result<TagDistribution, EngineError> {
        let required = self
            .store
            .get_required_question_count(panel_id)
            .await?
            .ok_or_else(|| EngineError::NotFound {
                entity: "panel",
                id: panel_id.to_string(),
            })?;
        let questions = self.store.list_questions_by_panel(panel_id).await?;

        let mut students: Vec<String> = Vec::new();
        for id in self.store.list_student_ids(panel_id).await? {
            if students.contains(&id) {
                tracing::warn!(student_id = %id, "duplicate roster entry ignored");
            } else {
                students.push(id);
            }
        }

        let mut rng = match self.config.distribution.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let distribution = distribute(
            panel_id,
            &questions,
            &students,
            required,
            &self.config.distribution,
            &mut rng,
        )?;

        self.artifacts
            .put_json(panel_id, ArtifactName::TagDistribution, &distribution)
            .await?;
        tracing::info!(students = distribution.len(), "distributed tag questions");
        Ok(distribution)
    }

    /// Pick the finalists from the top clusters by representative vote score.
    ///
    /// # Errors
    ///
    /// `NotFound` if the cluster ranking has not been produced, or a
    /// store/artifact failure.
    #[tracing::instrument(skip(self))]
    pub async fn generate_shortlist(
        &self,
        panel_id: &str,
    ) -> Result<Vec<ShortlistEntry>, EngineError> {
        let clusters: Vec<ClusterDescriptor> = self
            .require_artifact(panel_id, ArtifactName::SortedClusters)
            .await?;
        let pool = self.config.shortlist.tagging_pool_size;

        let mut candidates = Vec::with_capacity(pool.min(clusters.len()));
        for cluster in clusters.into_iter().take(pool) {
            let vote_score = self
                .store
                .get_question(&cluster.representative_id)
                .await?
                .and_then(|q| q.vote_score);
            if vote_score.is_none() {
                tracing::debug!(
                    representative_id = %cluster.representative_id,
                    "representative has no vote score"
                );
            }
            candidates.push((cluster, vote_score));
        }

        let finalists = rank_finalists(candidates, self.config.shortlist.finalist_count);
        self.artifacts
            .put_json(panel_id, ArtifactName::FinalQuestions, &finalists)
            .await?;
        tracing::info!(finalists = finalists.len(), "generated shortlist");
        Ok(finalists)
    }

    /// Grade every student of the panel and write back question and metric scores.
    ///
    /// A student whose grade cannot be computed gets zero scores and a
    /// `grading_error` marker, is left out of the cohort statistics, and
    /// does not stop the run.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown panel or a missing cluster/shortlist
    /// artifact, or a store/artifact failure outside the per-student lookups.
    #[tracing::instrument(skip(self))]
    pub async fn grade_panel(&self, panel_id: &str) -> Result<GradingReport, EngineError> {
        let panel = self.require_panel(panel_id).await?;
        let required = self
            .store
            .get_required_question_count(panel_id)
            .await?
            .unwrap_or(panel.questions_required);
        let clusters: Vec<ClusterDescriptor> = self
            .require_artifact(panel_id, ArtifactName::SortedClusters)
            .await?;
        let shortlist: Vec<ShortlistEntry> = self
            .require_artifact(panel_id, ArtifactName::FinalQuestions)
            .await?;
        let scoring = &self.config.scoring;

        let questions = self.store.list_questions_by_panel(panel_id).await?;
        let question_scores = score_questions(&clusters, &questions, scoring);
        for question in &questions {
            let score = question_scores
                .get(&question.id)
                .copied()
                .unwrap_or(Decimal::ZERO);
            if question.final_score != Some(score) {
                let mut updated = question.clone();
                updated.final_score = Some(score);
                self.store.upsert_question(&updated).await?;
            }
        }

        let mut metrics = self.store.list_metrics_by_panel(panel_id).await?;
        let cohort = EngagementCohort::from_metrics(&metrics);
        let bonuses = StageBonuses::new(
            &clusters,
            &shortlist,
            &questions,
            self.config.shortlist.tagging_pool_size,
        );
        let ctx = GradingContext {
            scoring,
            cohort: &cohort,
            bonuses: &bonuses,
            required_questions: required,
        };

        let mut failed = Vec::new();
        for metric in &mut metrics {
            metric.clear_grades();
            match self.grade_one(panel_id, metric, &ctx).await {
                Ok(scores) => scores.apply_to(metric),
                Err(e) => {
                    tracing::warn!(student_id = %metric.student_id, error = %e, "grading failed for student");
                    StudentScores::ZERO.apply_to(metric);
                    metric.grading_error = Some(e.to_string());
                    failed.push((metric.student_id.clone(), e.to_string()));
                }
            }
        }

        let stats = cohort_stats(&metrics);
        for metric in &mut metrics {
            metric.cohort = Some(stats);
            self.store.upsert_metric(metric).await?;
        }

        tracing::info!(
            students = metrics.len(),
            failed = failed.len(),
            clusters = clusters.len(),
            "graded panel"
        );
        Ok(GradingReport {
            panel_id: panel_id.to_string(),
            graded: metrics.len() - failed.len(),
            failed,
            questions_scored: question_scores.len(),
            cohort: stats,
        })
    }

    async fn grade_one(
        &self,
        panel_id: &str,
        metric: &Metric,
        ctx: &GradingContext<'_>,
    ) -> Result<StudentScores, GradeError> {
        let authored = self
            .store
            .list_my_questions(panel_id, &metric.student_id)
            .await
            .map_err(|e| GradeError::QuestionLookup(e.to_string()))?;
        let scores: Vec<Decimal> = authored
            .iter()
            .map(|q| q.final_score.unwrap_or(Decimal::ZERO))
            .collect();
        grade_student(metric, &scores, ctx)
    }
}
