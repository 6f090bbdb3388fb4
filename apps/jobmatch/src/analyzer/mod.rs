//! Text analyzer: the pluggable capability that turns free text into structured
//! requirement and match data.
//!
//! The engine only consumes this trait. `LlmTextAnalyzer` is the default backend;
//! tests and embedders supply their own. Orchestrators hold an `Arc<dyn TextAnalyzer>`
//! passed in at construction.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm_client::LlmError;

pub mod llm;
pub mod prompts;

pub use llm::LlmTextAnalyzer;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("{0}")]
    Unavailable(String),

    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Malformed analyzer output: {0}")]
    InvalidOutput(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// Structured requirements extracted from a job description.
/// Every key is optional; absent keys leave the job's existing data alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequirementsExtraction {
    pub required_skills: Option<Vec<String>>,
    pub preferred_skills: Option<Vec<String>>,
    pub keywords: Option<Vec<String>>,
    pub requirements: Option<Vec<String>>,
    pub category: Option<String>,
    pub seniority: Option<String>,
    pub clarity_score: Option<f64>,
    pub completeness_score: Option<f64>,
    pub specificity_score: Option<f64>,
    pub suggestions: Option<Vec<String>>,
    pub missing_info: Option<Vec<String>>,
    pub industry_terms: Option<Vec<String>>,
    pub role_terms: Option<Vec<String>>,
}

/// Result of comparing one resume against one job description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchAnalysis {
    pub overall_match_score: f64,
    pub skills_match_score: Option<f64>,
    pub experience_match_score: Option<f64>,
    pub education_match_score: Option<f64>,
    pub keyword_match_score: Option<f64>,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub recommendations: Vec<String>,
    /// Seconds spent producing this result, when the backend measured it.
    pub processing_time: Option<f64>,
}

impl MatchAnalysis {
    /// Clamps every score into [0, 100]. Non-finite scores become 0.
    pub fn clamped(mut self) -> Self {
        self.overall_match_score = clamp_score(self.overall_match_score);
        for score in [
            &mut self.skills_match_score,
            &mut self.experience_match_score,
            &mut self.education_match_score,
            &mut self.keyword_match_score,
        ] {
            *score = score.map(clamp_score);
        }
        self
    }
}

pub(crate) fn clamp_score(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap analysis backends without touching the orchestrators.
/// Implementations must not retry on behalf of the engine's callers beyond what
/// their own transport policy specifies.
#[async_trait]
pub trait TextAnalyzer: Send + Sync {
    async fn extract_requirements(
        &self,
        description: &str,
    ) -> Result<RequirementsExtraction, AnalyzerError>;

    async fn match_resume(
        &self,
        resume_text: &str,
        job_text: &str,
    ) -> Result<MatchAnalysis, AnalyzerError>;

    /// Identifier stored on match records, e.g. the model name.
    fn model_id(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_extraction_deserializes() {
        let json = r#"{"required_skills": ["Rust"], "category": "engineering"}"#;
        let extraction: RequirementsExtraction = serde_json::from_str(json).unwrap();
        assert_eq!(extraction.required_skills, Some(vec!["Rust".to_string()]));
        assert_eq!(extraction.category.as_deref(), Some("engineering"));
        assert!(extraction.keywords.is_none());
    }

    #[test]
    fn test_match_analysis_defaults_missing_lists() {
        let json = r#"{"overall_match_score": 72.5, "skills_match_score": 80}"#;
        let analysis: MatchAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.overall_match_score, 72.5);
        assert_eq!(analysis.skills_match_score, Some(80.0));
        assert!(analysis.matched_skills.is_empty());
        assert!(analysis.education_match_score.is_none());
    }

    #[test]
    fn test_clamped_bounds_scores() {
        let analysis = MatchAnalysis {
            overall_match_score: 140.0,
            skills_match_score: Some(-3.0),
            keyword_match_score: Some(f64::NAN),
            ..Default::default()
        }
        .clamped();
        assert_eq!(analysis.overall_match_score, 100.0);
        assert_eq!(analysis.skills_match_score, Some(0.0));
        assert_eq!(analysis.keyword_match_score, Some(0.0));
        assert_eq!(analysis.experience_match_score, None);
    }
}
