//! Job catalog service: lifecycle, quota, search, stats, URL import and the
//! user actions on match records.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::config::Config;
use crate::errors::AppError;
use crate::models::{JobPosting, JobPostingUpdate, NewJobPosting, ResumeMatch};
use crate::search::{JobSearchCriteria, QueryBuilder};
use crate::stats::{aggregate_job_stats, JobStats};
use crate::store::JobRepository;

pub mod import;

pub use import::{detect_platform, ExtractedJob, JobExtractor, JobImportRequest};

const MAX_NOTES_CHARS: usize = 2000;

// ────────────────────────────────────────────────────────────────────────────
// Entitlements
// ────────────────────────────────────────────────────────────────────────────

/// Premium status lookup. Account management lives outside this crate.
#[async_trait]
pub trait EntitlementProvider: Send + Sync {
    async fn is_premium(&self, user_id: Uuid) -> anyhow::Result<bool>;
}

/// Fixed set of premium users. Everyone else is standard tier.
#[derive(Debug, Clone, Default)]
pub struct StaticEntitlements {
    premium: HashSet<Uuid>,
}

impl StaticEntitlements {
    pub fn new(premium: impl IntoIterator<Item = Uuid>) -> Self {
        Self {
            premium: premium.into_iter().collect(),
        }
    }
}

#[async_trait]
impl EntitlementProvider for StaticEntitlements {
    async fn is_premium(&self, user_id: Uuid) -> anyhow::Result<bool> {
        Ok(self.premium.contains(&user_id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobQuotas {
    pub standard: u32,
    pub premium: u32,
}

impl JobQuotas {
    pub fn from_config(config: &Config) -> Self {
        Self {
            standard: config.standard_job_quota,
            premium: config.premium_job_quota,
        }
    }

    pub fn for_tier(&self, is_premium: bool) -> u32 {
        if is_premium {
            self.premium
        } else {
            self.standard
        }
    }
}

impl Default for JobQuotas {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Responses
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct JobPage {
    pub jobs: Vec<JobPosting>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

// ────────────────────────────────────────────────────────────────────────────
// Service
// ────────────────────────────────────────────────────────────────────────────

pub struct JobService {
    repo: Arc<dyn JobRepository>,
    entitlements: Arc<dyn EntitlementProvider>,
    extractor: Option<Arc<dyn JobExtractor>>,
    quotas: JobQuotas,
}

impl JobService {
    pub fn new(
        repo: Arc<dyn JobRepository>,
        entitlements: Arc<dyn EntitlementProvider>,
        quotas: JobQuotas,
    ) -> Self {
        Self {
            repo,
            entitlements,
            extractor: None,
            quotas,
        }
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn JobExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub async fn create_job(
        &self,
        user_id: Uuid,
        input: NewJobPosting,
    ) -> Result<JobPosting, AppError> {
        let job = input.into_job(user_id, Utc::now())?;

        let is_premium = self.entitlements.is_premium(user_id).await?;
        let max_jobs = self.quotas.for_tier(is_premium);
        let existing = self.repo.count_jobs(user_id).await?;
        if existing >= u64::from(max_jobs) {
            return Err(AppError::Validation(format!(
                "Job description limit reached ({max_jobs})"
            )));
        }

        self.repo.create_job(&job).await?;
        info!("Created job {} for user {}", job.id, user_id);
        Ok(job)
    }

    /// Returns the job and counts the view. A failed view increment is logged only.
    pub async fn get_job(&self, job_id: Uuid, user_id: Uuid) -> Result<JobPosting, AppError> {
        let mut job = self.require_job(job_id, user_id).await?;
        match self.repo.increment_view_count(job_id).await {
            Ok(()) => job.view_count = job.view_count.saturating_add(1),
            Err(e) => warn!("Failed to record view for job {job_id}: {e}"),
        }
        Ok(job)
    }

    pub async fn update_job(
        &self,
        job_id: Uuid,
        user_id: Uuid,
        update: JobPostingUpdate,
    ) -> Result<JobPosting, AppError> {
        let mut job = self.require_job(job_id, user_id).await?;
        update.apply_to(&mut job, Utc::now())?;
        self.repo.update_job(&job).await?;
        info!("Updated job {}", job_id);
        Ok(job)
    }

    /// Soft delete hides the job; hard delete removes it and its matches.
    pub async fn delete_job(&self, job_id: Uuid, user_id: Uuid, hard: bool) -> Result<(), AppError> {
        let deleted = if hard {
            self.repo.hard_delete_job(job_id, user_id).await?
        } else {
            self.repo.soft_delete_job(job_id, user_id, Utc::now()).await?
        };
        if !deleted {
            return Err(AppError::NotFound("Job posting not found".to_string()));
        }
        info!("Deleted job {} (hard: {})", job_id, hard);
        Ok(())
    }

    pub async fn search_jobs(
        &self,
        user_id: Uuid,
        criteria: &JobSearchCriteria,
    ) -> Result<JobPage, AppError> {
        criteria.validate()?;
        let query = QueryBuilder::for_user(user_id).with_criteria(criteria).build();
        let (jobs, total) = self.repo.query_jobs(&query).await?;

        let page_size = query.pagination.limit;
        let total_pages = total.div_ceil(u64::from(page_size)) as u32;
        Ok(JobPage {
            jobs,
            total,
            page: query.pagination.page(),
            page_size,
            total_pages,
        })
    }

    pub async fn job_stats(&self, user_id: Uuid) -> Result<JobStats, AppError> {
        let jobs = self.repo.list_jobs(user_id).await?;
        let matches = self.repo.list_matches_for_user(user_id).await?;
        Ok(aggregate_job_stats(&jobs, &matches, Utc::now()))
    }

    /// Premium only. The imported posting goes through the normal create path,
    /// so validation and quota apply.
    pub async fn import_from_url(
        &self,
        user_id: Uuid,
        request: JobImportRequest,
    ) -> Result<JobPosting, AppError> {
        if !self.entitlements.is_premium(user_id).await? {
            return Err(AppError::Validation(
                "Premium subscription required for job URL import".to_string(),
            ));
        }

        let url = import::parse_job_url(&request.url)?;
        let extractor = self
            .extractor
            .as_ref()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("No job extractor configured")))?;
        let extracted = extractor
            .extract(&url)
            .await
            .map_err(|e| AppError::Validation(format!("Job import failed: {e}")))?;

        let input = import::to_new_job(extracted, &url, request.save_as_draft)?;
        let job = self.create_job(user_id, input).await?;
        info!("Job imported from URL: {} as {}", url, job.id);
        Ok(job)
    }

    // ── Match records ───────────────────────────────────────────────────────

    /// Existing matches for an owned job, best score first.
    pub async fn list_matches_for_job(
        &self,
        job_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<ResumeMatch>, AppError> {
        self.require_job(job_id, user_id).await?;
        let mut matches = self.repo.list_matches_for_job(job_id, user_id).await?;
        matches.sort_by(|a, b| b.overall_score.total_cmp(&a.overall_score));
        Ok(matches)
    }

    pub async fn toggle_bookmark(
        &self,
        match_id: Uuid,
        user_id: Uuid,
    ) -> Result<ResumeMatch, AppError> {
        self.modify_match(match_id, user_id, |m| m.toggle_bookmark(Utc::now()))
            .await
    }

    pub async fn mark_applied(&self, match_id: Uuid, user_id: Uuid) -> Result<ResumeMatch, AppError> {
        self.modify_match(match_id, user_id, |m| m.mark_applied(Utc::now()))
            .await
    }

    /// Blank notes clear the field.
    pub async fn set_notes(
        &self,
        match_id: Uuid,
        user_id: Uuid,
        notes: Option<String>,
    ) -> Result<ResumeMatch, AppError> {
        let notes = notes.filter(|n| !n.trim().is_empty());
        if notes
            .as_deref()
            .is_some_and(|n| n.chars().count() > MAX_NOTES_CHARS)
        {
            return Err(AppError::Validation(format!(
                "Notes must be at most {MAX_NOTES_CHARS} characters"
            )));
        }
        self.modify_match(match_id, user_id, move |m| {
            m.notes = notes;
            m.updated_at = Utc::now();
        })
        .await
    }

    async fn modify_match<F>(
        &self,
        match_id: Uuid,
        user_id: Uuid,
        change: F,
    ) -> Result<ResumeMatch, AppError>
    where
        F: FnOnce(&mut ResumeMatch) + Send,
    {
        let mut record = self
            .repo
            .get_match(match_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Match not found".to_string()))?;
        change(&mut record);
        self.repo.update_match(&record).await?;
        Ok(record)
    }

    async fn require_job(&self, job_id: Uuid, user_id: Uuid) -> Result<JobPosting, AppError> {
        self.repo
            .get_job(job_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Job posting not found".to_string()))
    }
}
