use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::debug;

use crate::analyzer::prompts::{extraction_prompt, match_prompt, EXTRACTION_SYSTEM, MATCH_SYSTEM};
use crate::analyzer::{AnalyzerError, MatchAnalysis, RequirementsExtraction, TextAnalyzer};
use crate::config::Config;
use crate::llm_client::prompts::json_system;
use crate::llm_client::{LlmClient, MODEL};

/// Analyzer backed by Claude through `LlmClient`.
pub struct LlmTextAnalyzer {
    llm: LlmClient,
    extraction_system: String,
    match_system: String,
}

impl LlmTextAnalyzer {
    pub fn new(llm: LlmClient) -> Self {
        Self {
            llm,
            extraction_system: json_system(EXTRACTION_SYSTEM),
            match_system: json_system(MATCH_SYSTEM),
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.require_api_key()?.to_string();
        let llm = LlmClient::new(api_key, Duration::from_secs(config.llm_timeout_secs))?;
        Ok(Self::new(llm))
    }
}

#[async_trait]
impl TextAnalyzer for LlmTextAnalyzer {
    async fn extract_requirements(
        &self,
        description: &str,
    ) -> Result<RequirementsExtraction, AnalyzerError> {
        let prompt = extraction_prompt(description);
        let extraction: RequirementsExtraction =
            self.llm.call_json(&prompt, &self.extraction_system).await?;
        debug!(
            "Extracted {} required skills",
            extraction.required_skills.as_ref().map_or(0, Vec::len)
        );
        Ok(extraction)
    }

    async fn match_resume(
        &self,
        resume_text: &str,
        job_text: &str,
    ) -> Result<MatchAnalysis, AnalyzerError> {
        let started = Instant::now();
        let prompt = match_prompt(resume_text, job_text);
        let analysis: MatchAnalysis = self.llm.call_json(&prompt, &self.match_system).await?;
        let elapsed = started.elapsed().as_secs_f64();
        debug!("Resume match scored in {elapsed:.2}s");
        Ok(MatchAnalysis {
            processing_time: Some(elapsed),
            ..analysis.clamped()
        })
    }

    fn model_id(&self) -> &str {
        MODEL
    }
}
