//! Persistence seam for jobs, matches and resume candidates.
//!
//! Services and orchestrators hold an `Arc<dyn JobRepository>`. `InMemoryStore`
//! ships with the crate; a database-backed store implements the same trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{JobPosting, ResumeCandidate, ResumeMatch};
use crate::search::JobQuery;

pub mod memory;

pub use memory::InMemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A write would break a uniqueness constraint. The batch was rolled back.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("record not found: {0}")]
    NotFound(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// One entry of a match batch. Creates must not collide with an existing
/// (resume, job, user) triple; updates must target an existing record.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchWrite {
    Create(ResumeMatch),
    Update(ResumeMatch),
}

impl MatchWrite {
    pub fn into_record(self) -> ResumeMatch {
        match self {
            MatchWrite::Create(m) | MatchWrite::Update(m) => m,
        }
    }
}

/// Job reads never return soft-deleted rows unless stated otherwise.
#[async_trait]
pub trait JobRepository: Send + Sync {
    // ── Jobs ────────────────────────────────────────────────────────────────

    async fn create_job(&self, job: &JobPosting) -> StoreResult<()>;

    /// Owned, non-deleted job or `None`.
    async fn get_job(&self, job_id: Uuid, user_id: Uuid) -> StoreResult<Option<JobPosting>>;

    /// Replaces the stored row. Fails with `NotFound` if it no longer exists.
    async fn update_job(&self, job: &JobPosting) -> StoreResult<()>;

    /// Sets `deleted_at`. Returns false when there was nothing to delete.
    async fn soft_delete_job(
        &self,
        job_id: Uuid,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> StoreResult<bool>;

    /// Removes the job and every match that references it.
    async fn hard_delete_job(&self, job_id: Uuid, user_id: Uuid) -> StoreResult<bool>;

    /// Number of non-deleted jobs the user owns.
    async fn count_jobs(&self, user_id: Uuid) -> StoreResult<u64>;

    /// Evaluates the query over one consistent snapshot. Returns the page and the total.
    async fn query_jobs(&self, query: &JobQuery) -> StoreResult<(Vec<JobPosting>, u64)>;

    /// Snapshot of the user's non-deleted jobs, oldest first.
    async fn list_jobs(&self, user_id: Uuid) -> StoreResult<Vec<JobPosting>>;

    async fn increment_view_count(&self, job_id: Uuid) -> StoreResult<()>;

    async fn set_match_count(&self, job_id: Uuid, match_count: u32) -> StoreResult<()>;

    // ── Resumes ─────────────────────────────────────────────────────────────

    /// The user's resumes, optionally restricted to `resume_ids`. Deleted and
    /// text-less resumes are included; callers decide what is matchable.
    async fn list_match_candidates(
        &self,
        user_id: Uuid,
        resume_ids: Option<&[Uuid]>,
    ) -> StoreResult<Vec<ResumeCandidate>>;

    // ── Matches ─────────────────────────────────────────────────────────────

    async fn find_match(
        &self,
        resume_id: Uuid,
        job_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<ResumeMatch>>;

    async fn get_match(&self, match_id: Uuid, user_id: Uuid) -> StoreResult<Option<ResumeMatch>>;

    async fn list_matches_for_job(
        &self,
        job_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Vec<ResumeMatch>>;

    async fn list_matches_for_user(&self, user_id: Uuid) -> StoreResult<Vec<ResumeMatch>>;

    /// Applies every write or none of them.
    async fn save_matches(&self, writes: &[MatchWrite]) -> StoreResult<()>;

    async fn update_match(&self, record: &ResumeMatch) -> StoreResult<()>;
}
