use std::sync::Arc;

use tracing::info;

use crate::analysis::JobAnalysisOrchestrator;
use crate::analyzer::{LlmTextAnalyzer, TextAnalyzer};
use crate::config::Config;
use crate::jobs::{EntitlementProvider, JobExtractor, JobQuotas, JobService};
use crate::llm_client;
use crate::matching::MatchOrchestrator;
use crate::store::JobRepository;

/// Shared collaborators an embedding application builds once and hands out.
/// Services are cheap to construct from it per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub repo: Arc<dyn JobRepository>,
    /// Pluggable analyzer. Default: `LlmTextAnalyzer` via `with_llm_analyzer`.
    pub analyzer: Arc<dyn TextAnalyzer>,
    pub entitlements: Arc<dyn EntitlementProvider>,
    /// URL import is disabled while this is `None`.
    pub extractor: Option<Arc<dyn JobExtractor>>,
}

impl AppState {
    pub fn new(
        config: Config,
        repo: Arc<dyn JobRepository>,
        analyzer: Arc<dyn TextAnalyzer>,
        entitlements: Arc<dyn EntitlementProvider>,
    ) -> Self {
        Self {
            config,
            repo,
            analyzer,
            entitlements,
            extractor: None,
        }
    }

    /// Builds the state with the Claude-backed analyzer. Fails without an API key.
    pub fn with_llm_analyzer(
        config: Config,
        repo: Arc<dyn JobRepository>,
        entitlements: Arc<dyn EntitlementProvider>,
    ) -> anyhow::Result<Self> {
        let analyzer = Arc::new(LlmTextAnalyzer::from_config(&config)?);
        info!("LLM analyzer initialized (model: {})", llm_client::MODEL);
        Ok(Self::new(config, repo, analyzer, entitlements))
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn JobExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn job_service(&self) -> JobService {
        let service = JobService::new(
            self.repo.clone(),
            self.entitlements.clone(),
            JobQuotas::from_config(&self.config),
        );
        match &self.extractor {
            Some(extractor) => service.with_extractor(extractor.clone()),
            None => service,
        }
    }

    pub fn match_orchestrator(&self) -> MatchOrchestrator {
        MatchOrchestrator::new(
            self.repo.clone(),
            self.analyzer.clone(),
            self.config.match_concurrency,
        )
    }

    pub fn analysis_orchestrator(&self) -> JobAnalysisOrchestrator {
        JobAnalysisOrchestrator::new(self.repo.clone(), self.analyzer.clone())
    }
}
