//! Job analysis: one analyzer pass over a job description, merged back into the job.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::analyzer::{clamp_score, RequirementsExtraction, TextAnalyzer};
use crate::errors::AppError;
use crate::models::JobPosting;
use crate::scoring::{analysis_quality_score, complexity_score};
use crate::store::JobRepository;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobAnalysisReport {
    pub job_id: Uuid,
    pub analysis_score: f64,
    pub complexity_score: f64,

    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub keywords: Vec<String>,
    pub requirements: Vec<String>,
    pub category: Option<String>,
    pub seniority: Option<String>,

    pub clarity_score: Option<f64>,
    pub completeness_score: Option<f64>,
    pub specificity_score: Option<f64>,
    pub suggestions: Vec<String>,
    pub missing_info: Vec<String>,
    pub industry_terms: Vec<String>,
    pub role_terms: Vec<String>,

    pub analyzed_at: DateTime<Utc>,
}

pub struct JobAnalysisOrchestrator {
    repo: Arc<dyn JobRepository>,
    analyzer: Arc<dyn TextAnalyzer>,
}

impl JobAnalysisOrchestrator {
    pub fn new(repo: Arc<dyn JobRepository>, analyzer: Arc<dyn TextAnalyzer>) -> Self {
        Self { repo, analyzer }
    }

    /// Extracts requirements from the description, merges them into the job,
    /// recomputes both scores and persists. Analyzer failures are not retried.
    pub async fn analyze(&self, job_id: Uuid, user_id: Uuid) -> Result<JobAnalysisReport, AppError> {
        let mut job = self
            .repo
            .get_job(job_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Job posting not found".to_string()))?;

        let extraction = self.analyzer.extract_requirements(&job.description).await?;

        let now = Utc::now();
        apply_extraction(&mut job, &extraction, now)?;
        self.repo.update_job(&job).await?;

        let analysis_score = job.analysis_score.unwrap_or_default();
        let complexity = job.complexity_score.unwrap_or_default();
        info!(
            "Analyzed job {}: analysis_score={}, complexity_score={}",
            job_id, analysis_score, complexity
        );

        Ok(JobAnalysisReport {
            job_id,
            analysis_score,
            complexity_score: complexity,
            required_skills: job.required_skills.clone().unwrap_or_default(),
            preferred_skills: job.preferred_skills.clone().unwrap_or_default(),
            keywords: job.keywords.clone().unwrap_or_default(),
            requirements: job.requirements.clone().unwrap_or_default(),
            category: extraction.category,
            seniority: extraction.seniority,
            clarity_score: extraction.clarity_score.map(clamp_score),
            completeness_score: extraction.completeness_score.map(clamp_score),
            specificity_score: extraction.specificity_score.map(clamp_score),
            suggestions: extraction.suggestions.unwrap_or_default(),
            missing_info: extraction.missing_info.unwrap_or_default(),
            industry_terms: extraction.industry_terms.unwrap_or_default(),
            role_terms: extraction.role_terms.unwrap_or_default(),
            analyzed_at: now,
        })
    }
}

/// Overwrites each list the extraction supplied with at least one entry.
/// Absent or empty lists leave the job's data alone.
fn apply_extraction(
    job: &mut JobPosting,
    extraction: &RequirementsExtraction,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    merge_list(&mut job.required_skills, &extraction.required_skills);
    merge_list(&mut job.preferred_skills, &extraction.preferred_skills);
    merge_list(&mut job.keywords, &extraction.keywords);
    merge_list(&mut job.requirements, &extraction.requirements);

    job.structured_data = serde_json::to_value(extraction).map_err(|e| {
        AppError::Internal(anyhow::anyhow!("Failed to serialize extraction: {e}"))
    })?;
    job.complexity_score = Some(complexity_score(job));
    job.analysis_score = Some(analysis_quality_score(extraction));
    job.last_analyzed_at = Some(now);
    job.updated_at = now;
    Ok(())
}

fn merge_list(field: &mut Option<Vec<String>>, extracted: &Option<Vec<String>>) {
    if let Some(values) = extracted.as_ref().filter(|v| !v.is_empty()) {
        *field = Some(values.clone());
    }
}
