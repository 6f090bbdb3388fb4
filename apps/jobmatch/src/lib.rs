//! jobmatch: job-posting catalog with resume matching, scoring and statistics.
//!
//! The engine is storage- and model-agnostic. Callers supply a `JobRepository`,
//! a `TextAnalyzer` and an `EntitlementProvider`; `AppState` wires them into
//! `JobService`, `MatchOrchestrator` and `JobAnalysisOrchestrator`.

pub mod analysis;
pub mod analyzer;
pub mod config;
pub mod errors;
pub mod jobs;
pub mod llm_client;
pub mod matching;
pub mod models;
pub mod scoring;
pub mod search;
pub mod state;
pub mod stats;
pub mod store;
pub mod telemetry;

#[cfg(test)]
mod test_support;

pub use analysis::{JobAnalysisOrchestrator, JobAnalysisReport};
pub use analyzer::{AnalyzerError, MatchAnalysis, RequirementsExtraction, TextAnalyzer};
pub use config::Config;
pub use errors::AppError;
pub use jobs::{EntitlementProvider, JobPage, JobQuotas, JobService, StaticEntitlements};
pub use matching::{select_top_matches, MatchOptions, MatchOrchestrator, MatchOutcome, MatchRun};
pub use state::AppState;
pub use stats::JobStats;
pub use store::{InMemoryStore, JobRepository, MatchWrite, StoreError};
