//! Fixtures and a scripted analyzer shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::analyzer::{AnalyzerError, MatchAnalysis, RequirementsExtraction, TextAnalyzer};
use crate::models::{NewJobPosting, ResumeCandidate, ResumeMatch};

/// Resume text containing this marker makes `match_resume` fail.
pub const FAIL_MARKER: &str = "FAIL";

pub fn make_new_job() -> NewJobPosting {
    NewJobPosting {
        title: "Backend Engineer".to_string(),
        company: "Acme".to_string(),
        description: "Build and operate Go services backed by SQL.".to_string(),
        ..Default::default()
    }
}

pub fn make_resume(user_id: Uuid, text: Option<&str>) -> ResumeCandidate {
    ResumeCandidate {
        id: Uuid::new_v4(),
        user_id,
        title: "Resume".to_string(),
        raw_text: text.map(String::from),
        is_deleted: false,
    }
}

pub fn make_match(user_id: Uuid, score: f64) -> ResumeMatch {
    let now = Utc::now();
    ResumeMatch {
        id: Uuid::new_v4(),
        resume_id: Uuid::new_v4(),
        job_id: Uuid::new_v4(),
        user_id,
        overall_score: score,
        skills_score: None,
        experience_score: None,
        education_score: None,
        keyword_score: None,
        matched_skills: vec![],
        missing_skills: vec![],
        matched_keywords: vec![],
        missing_keywords: vec![],
        recommendations: vec![],
        match_data: json!({}),
        processing_time_secs: None,
        analyzer_model: None,
        is_bookmarked: false,
        is_applied: false,
        applied_at: None,
        notes: None,
        created_at: now,
        updated_at: now,
    }
}

/// Analyzer with fixed answers. Tracks calls and peak concurrency.
pub struct StubAnalyzer {
    score: Mutex<f64>,
    extraction: Option<RequirementsExtraction>,
    delay: Duration,
    match_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl StubAnalyzer {
    pub fn new(score: f64) -> Self {
        Self {
            score: Mutex::new(score),
            extraction: Some(RequirementsExtraction::default()),
            delay: Duration::ZERO,
            match_calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_delay_ms(mut self, ms: u64) -> Self {
        self.delay = Duration::from_millis(ms);
        self
    }

    pub fn with_extraction(mut self, extraction: RequirementsExtraction) -> Self {
        self.extraction = Some(extraction);
        self
    }

    /// `extract_requirements` fails from now on.
    pub fn without_extraction(mut self) -> Self {
        self.extraction = None;
        self
    }

    pub fn set_score(&self, score: f64) {
        *self.score.lock().unwrap() = score;
    }

    pub fn match_calls(&self) -> usize {
        self.match_calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextAnalyzer for StubAnalyzer {
    async fn extract_requirements(
        &self,
        _description: &str,
    ) -> Result<RequirementsExtraction, AnalyzerError> {
        self.extraction
            .clone()
            .ok_or_else(|| AnalyzerError::Unavailable("stub extraction disabled".to_string()))
    }

    async fn match_resume(
        &self,
        resume_text: &str,
        _job_text: &str,
    ) -> Result<MatchAnalysis, AnalyzerError> {
        self.match_calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if resume_text.contains(FAIL_MARKER) {
            return Err(AnalyzerError::Unavailable("stub analyzer refused".to_string()));
        }
        let score = *self.score.lock().unwrap();
        Ok(MatchAnalysis {
            overall_match_score: score,
            skills_match_score: Some(score),
            matched_skills: vec!["Go".to_string()],
            missing_skills: vec!["Kafka".to_string()],
            recommendations: vec!["Mention SQL tuning work".to_string()],
            ..Default::default()
        })
    }

    fn model_id(&self) -> &str {
        "stub-analyzer"
    }
}
