//! In-memory `JobRepository` for embedding and tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{JobPosting, ResumeCandidate, ResumeMatch};
use crate::search::JobQuery;
use crate::store::{JobRepository, MatchWrite, StoreError, StoreResult};

#[derive(Debug, Default)]
struct MemoryState {
    jobs: HashMap<Uuid, JobPosting>,
    matches: HashMap<Uuid, ResumeMatch>,
    resumes: HashMap<Uuid, ResumeCandidate>,
}

impl MemoryState {
    fn find_match_by_key(&self, key: (Uuid, Uuid, Uuid)) -> Option<&ResumeMatch> {
        self.matches.values().find(|m| m.key() == key)
    }
}

/// Cheap to clone; clones share the same data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<MemoryState>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a resume. Resumes are owned by another subsystem, so the trait has no writer.
    pub async fn insert_resume(&self, resume: ResumeCandidate) {
        self.state.write().await.resumes.insert(resume.id, resume);
    }

    /// Makes every subsequent call fail with `StoreError::Unavailable` until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl JobRepository for InMemoryStore {
    async fn create_job(&self, job: &JobPosting) -> StoreResult<()> {
        self.check_available()?;
        let mut state = self.state.write().await;
        if state.jobs.contains_key(&job.id) {
            return Err(StoreError::Conflict(format!("job {} already exists", job.id)));
        }
        state.jobs.insert(job.id, job.clone());
        Ok(())
    }

    async fn get_job(&self, job_id: Uuid, user_id: Uuid) -> StoreResult<Option<JobPosting>> {
        self.check_available()?;
        let state = self.state.read().await;
        Ok(state
            .jobs
            .get(&job_id)
            .filter(|j| j.user_id == user_id && !j.is_deleted())
            .cloned())
    }

    async fn update_job(&self, job: &JobPosting) -> StoreResult<()> {
        self.check_available()?;
        let mut state = self.state.write().await;
        match state.jobs.get_mut(&job.id) {
            Some(stored) => {
                *stored = job.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("job {}", job.id))),
        }
    }

    async fn soft_delete_job(
        &self,
        job_id: Uuid,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> StoreResult<bool> {
        self.check_available()?;
        let mut state = self.state.write().await;
        match state.jobs.get_mut(&job_id) {
            Some(job) if job.user_id == user_id && !job.is_deleted() => {
                job.deleted_at = Some(now);
                job.updated_at = now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn hard_delete_job(&self, job_id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        self.check_available()?;
        let mut state = self.state.write().await;
        let owned = state.jobs.get(&job_id).is_some_and(|j| j.user_id == user_id);
        if !owned {
            return Ok(false);
        }
        state.jobs.remove(&job_id);
        state.matches.retain(|_, m| m.job_id != job_id);
        Ok(true)
    }

    async fn count_jobs(&self, user_id: Uuid) -> StoreResult<u64> {
        self.check_available()?;
        let state = self.state.read().await;
        Ok(state
            .jobs
            .values()
            .filter(|j| j.user_id == user_id && !j.is_deleted())
            .count() as u64)
    }

    async fn query_jobs(&self, query: &JobQuery) -> StoreResult<(Vec<JobPosting>, u64)> {
        self.check_available()?;
        let state = self.state.read().await;
        Ok(query.execute(state.jobs.values()))
    }

    async fn list_jobs(&self, user_id: Uuid) -> StoreResult<Vec<JobPosting>> {
        self.check_available()?;
        let state = self.state.read().await;
        let mut jobs: Vec<JobPosting> = state
            .jobs
            .values()
            .filter(|j| j.user_id == user_id && !j.is_deleted())
            .cloned()
            .collect();
        jobs.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(jobs)
    }

    async fn increment_view_count(&self, job_id: Uuid) -> StoreResult<()> {
        self.check_available()?;
        let mut state = self.state.write().await;
        let job = state
            .jobs
            .get_mut(&job_id)
            .ok_or_else(|| StoreError::NotFound(format!("job {job_id}")))?;
        job.view_count = job.view_count.saturating_add(1);
        Ok(())
    }

    async fn set_match_count(&self, job_id: Uuid, match_count: u32) -> StoreResult<()> {
        self.check_available()?;
        let mut state = self.state.write().await;
        let job = state
            .jobs
            .get_mut(&job_id)
            .ok_or_else(|| StoreError::NotFound(format!("job {job_id}")))?;
        job.match_count = match_count;
        Ok(())
    }

    async fn list_match_candidates(
        &self,
        user_id: Uuid,
        resume_ids: Option<&[Uuid]>,
    ) -> StoreResult<Vec<ResumeCandidate>> {
        self.check_available()?;
        let state = self.state.read().await;
        let mut candidates: Vec<ResumeCandidate> = state
            .resumes
            .values()
            .filter(|r| r.user_id == user_id)
            .filter(|r| resume_ids.map_or(true, |ids| ids.contains(&r.id)))
            .cloned()
            .collect();
        candidates.sort_by_key(|r| r.id);
        Ok(candidates)
    }

    async fn find_match(
        &self,
        resume_id: Uuid,
        job_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<ResumeMatch>> {
        self.check_available()?;
        let state = self.state.read().await;
        Ok(state
            .find_match_by_key((resume_id, job_id, user_id))
            .cloned())
    }

    async fn get_match(&self, match_id: Uuid, user_id: Uuid) -> StoreResult<Option<ResumeMatch>> {
        self.check_available()?;
        let state = self.state.read().await;
        Ok(state
            .matches
            .get(&match_id)
            .filter(|m| m.user_id == user_id)
            .cloned())
    }

    async fn list_matches_for_job(
        &self,
        job_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Vec<ResumeMatch>> {
        self.check_available()?;
        let state = self.state.read().await;
        Ok(state
            .matches
            .values()
            .filter(|m| m.job_id == job_id && m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_matches_for_user(&self, user_id: Uuid) -> StoreResult<Vec<ResumeMatch>> {
        self.check_available()?;
        let state = self.state.read().await;
        Ok(state
            .matches
            .values()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn save_matches(&self, writes: &[MatchWrite]) -> StoreResult<()> {
        self.check_available()?;
        let mut state = self.state.write().await;

        // Stage on a copy so a failing write leaves the committed state untouched.
        let mut staged = state.matches.clone();
        for write in writes {
            match write {
                MatchWrite::Create(record) => {
                    let key = record.key();
                    if staged.contains_key(&record.id) || staged.values().any(|m| m.key() == key) {
                        return Err(StoreError::Conflict(format!(
                            "match already exists for resume {} and job {}",
                            record.resume_id, record.job_id
                        )));
                    }
                    staged.insert(record.id, record.clone());
                }
                MatchWrite::Update(record) => match staged.get_mut(&record.id) {
                    Some(existing) if existing.key() == record.key() => {
                        *existing = record.clone();
                    }
                    _ => {
                        return Err(StoreError::NotFound(format!("match {}", record.id)));
                    }
                },
            }
        }
        state.matches = staged;
        Ok(())
    }

    async fn update_match(&self, record: &ResumeMatch) -> StoreResult<()> {
        self.check_available()?;
        let mut state = self.state.write().await;
        match state.matches.get_mut(&record.id) {
            Some(existing) => {
                *existing = record.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("match {}", record.id))),
        }
    }
}
