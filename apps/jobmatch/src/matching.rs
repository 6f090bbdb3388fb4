//! Match orchestration: scores a job against a user's resumes.
//!
//! Flow: load job → load candidates → analyze (bounded concurrency) →
//!       reconcile with existing matches → save batch → set match_count.
//!
//! A failing analyzer call skips that resume only. The batch write is
//! all-or-nothing; the match_count update is a second, separate write.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analyzer::{AnalyzerError, MatchAnalysis, TextAnalyzer};
use crate::errors::AppError;
use crate::models::{ResumeCandidate, ResumeMatch};
use crate::store::{JobRepository, MatchWrite};

pub const DEFAULT_TOP_MATCHES: usize = 10;
pub const MAX_TOP_MATCHES: usize = 50;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct MatchOptions {
    /// Restrict the run to these resumes. `None` matches every resume the user has.
    pub resume_ids: Option<Vec<Uuid>>,
    /// Analyzer calls in flight at once. Falls back to the orchestrator default.
    pub concurrency: Option<usize>,
}

/// What happened to one resume in a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MatchOutcome {
    Scored(ResumeMatch),
    Skipped { resume_id: Uuid, reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedResume {
    pub resume_id: Uuid,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchRun {
    pub job_id: Uuid,
    /// Successful matches as persisted, in no particular order.
    pub matches: Vec<ResumeMatch>,
    pub skipped: Vec<SkippedResume>,
}

impl MatchRun {
    fn from_outcomes(job_id: Uuid, outcomes: Vec<MatchOutcome>) -> Self {
        let mut matches = Vec::new();
        let mut skipped = Vec::new();
        for outcome in outcomes {
            match outcome {
                MatchOutcome::Scored(record) => matches.push(record),
                MatchOutcome::Skipped { resume_id, reason } => {
                    skipped.push(SkippedResume { resume_id, reason })
                }
            }
        }
        Self {
            job_id,
            matches,
            skipped,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestrator
// ────────────────────────────────────────────────────────────────────────────

pub struct MatchOrchestrator {
    repo: Arc<dyn JobRepository>,
    analyzer: Arc<dyn TextAnalyzer>,
    concurrency: usize,
}

impl MatchOrchestrator {
    pub fn new(
        repo: Arc<dyn JobRepository>,
        analyzer: Arc<dyn TextAnalyzer>,
        concurrency: usize,
    ) -> Self {
        Self {
            repo,
            analyzer,
            concurrency: concurrency.max(1),
        }
    }

    /// Scores the job against each matchable resume and upserts the results.
    pub async fn run(
        &self,
        job_id: Uuid,
        user_id: Uuid,
        options: MatchOptions,
    ) -> Result<MatchRun, AppError> {
        let job = self
            .repo
            .get_job(job_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Job posting not found".to_string()))?;

        let candidates: Vec<ResumeCandidate> = self
            .repo
            .list_match_candidates(user_id, options.resume_ids.as_deref())
            .await?
            .into_iter()
            .filter(ResumeCandidate::is_matchable)
            .collect();

        let concurrency = options.concurrency.unwrap_or(self.concurrency).max(1);
        info!(
            "Matching job {} against {} resumes (concurrency {})",
            job_id,
            candidates.len(),
            concurrency
        );

        // No store lock is held here; the analyzer calls are the slow part.
        let analyzer = self.analyzer.as_ref();
        let job_text = job.description.as_str();
        let analyzed: Vec<(Uuid, Result<MatchAnalysis, AnalyzerError>, f64)> =
            stream::iter(candidates)
                .map(|candidate| async move {
                    let started = Instant::now();
                    let resume_text = candidate.text().unwrap_or_default();
                    let result = analyzer.match_resume(resume_text, job_text).await;
                    (candidate.id, result, started.elapsed().as_secs_f64())
                })
                .buffer_unordered(concurrency)
                .collect()
                .await;

        let now = Utc::now();
        let model = analyzer.model_id().to_string();
        let mut writes = Vec::new();
        let mut outcomes = Vec::new();

        for (resume_id, result, elapsed) in analyzed {
            match result {
                Ok(analysis) => {
                    let existing = self.repo.find_match(resume_id, job_id, user_id).await?;
                    writes.push(reconcile(
                        existing, resume_id, job_id, user_id, analysis, elapsed, &model, now,
                    )?);
                }
                Err(e) => {
                    warn!("Skipping resume {resume_id} for job {job_id}: {e}");
                    outcomes.push(MatchOutcome::Skipped {
                        resume_id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        self.repo.save_matches(&writes).await?;

        let match_count = writes.len() as u32;
        self.repo.set_match_count(job_id, match_count).await?;

        outcomes.extend(
            writes
                .into_iter()
                .map(|w| MatchOutcome::Scored(w.into_record())),
        );
        let run = MatchRun::from_outcomes(job_id, outcomes);

        info!(
            "Match run for job {} done: {} scored, {} skipped",
            job_id,
            run.matches.len(),
            run.skipped.len()
        );
        Ok(run)
    }
}

/// Overwrites the scoring fields of an existing record, or builds a new one.
/// User state (bookmark, applied, notes) and identity are kept on update.
#[allow(clippy::too_many_arguments)]
fn reconcile(
    existing: Option<ResumeMatch>,
    resume_id: Uuid,
    job_id: Uuid,
    user_id: Uuid,
    analysis: MatchAnalysis,
    elapsed_secs: f64,
    model: &str,
    now: DateTime<Utc>,
) -> Result<MatchWrite, AppError> {
    let analysis = analysis.clamped();
    let match_data = serde_json::to_value(&analysis).map_err(|e| {
        AppError::Internal(anyhow::anyhow!("Failed to serialize match analysis: {e}"))
    })?;
    let processing_time = analysis.processing_time.unwrap_or(elapsed_secs);

    let (mut record, is_new) = match existing {
        Some(record) => (record, false),
        None => (
            ResumeMatch {
                id: Uuid::new_v4(),
                resume_id,
                job_id,
                user_id,
                overall_score: 0.0,
                skills_score: None,
                experience_score: None,
                education_score: None,
                keyword_score: None,
                matched_skills: Vec::new(),
                missing_skills: Vec::new(),
                matched_keywords: Vec::new(),
                missing_keywords: Vec::new(),
                recommendations: Vec::new(),
                match_data: serde_json::Value::Null,
                processing_time_secs: None,
                analyzer_model: None,
                is_bookmarked: false,
                is_applied: false,
                applied_at: None,
                notes: None,
                created_at: now,
                updated_at: now,
            },
            true,
        ),
    };

    record.overall_score = analysis.overall_match_score;
    record.skills_score = analysis.skills_match_score;
    record.experience_score = analysis.experience_match_score;
    record.education_score = analysis.education_match_score;
    record.keyword_score = analysis.keyword_match_score;
    record.matched_skills = analysis.matched_skills;
    record.missing_skills = analysis.missing_skills;
    record.matched_keywords = analysis.matched_keywords;
    record.missing_keywords = analysis.missing_keywords;
    record.recommendations = analysis.recommendations;
    record.match_data = match_data;
    record.processing_time_secs = Some(processing_time);
    record.analyzer_model = Some(model.to_string());
    record.updated_at = now;

    Ok(if is_new {
        MatchWrite::Create(record)
    } else {
        MatchWrite::Update(record)
    })
}

/// Keeps matches scoring at least `min_score`, best first, at most `limit`
/// (1..=50, default 10).
pub fn select_top_matches(
    mut matches: Vec<ResumeMatch>,
    min_score: Option<f64>,
    limit: Option<usize>,
) -> Vec<ResumeMatch> {
    let limit = limit.unwrap_or(DEFAULT_TOP_MATCHES).clamp(1, MAX_TOP_MATCHES);
    if let Some(min) = min_score {
        matches.retain(|m| m.overall_score >= min);
    }
    matches.sort_by(|a, b| b.overall_score.total_cmp(&a.overall_score));
    matches.truncate(limit);
    matches
}
