//! Importing a posting from a job-board URL. Fetching and parsing the page is
//! the extractor's job; this module validates input and maps the result.

use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{JobStatus, NewJobPosting};

const UNKNOWN_COMPANY: &str = "Unknown Company";

#[derive(Debug, Clone, Deserialize)]
pub struct JobImportRequest {
    pub url: String,
    #[serde(default)]
    pub save_as_draft: bool,
}

/// Fields a page extractor could recover. Title and description are required
/// for the import to succeed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractedJob {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<Vec<String>>,
}

/// Scrapes a job posting page. Implementations live outside this crate.
#[async_trait]
pub trait JobExtractor: Send + Sync {
    async fn extract(&self, url: &Url) -> anyhow::Result<ExtractedJob>;
}

/// Requires an absolute URL with a scheme and a host.
pub fn parse_job_url(raw: &str) -> Result<Url, AppError> {
    let invalid = || AppError::Validation("Invalid URL provided".to_string());
    let url = Url::parse(raw.trim()).map_err(|_| invalid())?;
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid());
    }
    Ok(url)
}

/// Names the job board a URL belongs to, or "Other".
pub fn detect_platform(url: &Url) -> &'static str {
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    const PLATFORMS: &[(&str, &str)] = &[
        ("linkedin.com", "LinkedIn"),
        ("indeed.com", "Indeed"),
        ("glassdoor.com", "Glassdoor"),
        ("monster.com", "Monster"),
        ("ziprecruiter.com", "ZipRecruiter"),
    ];
    PLATFORMS
        .iter()
        .find(|(domain, _)| host.contains(*domain))
        .map_or("Other", |(_, name)| *name)
}

/// Builds the create request for an imported posting.
pub fn to_new_job(
    extracted: ExtractedJob,
    url: &Url,
    save_as_draft: bool,
) -> Result<NewJobPosting, AppError> {
    let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
    if !present(&extracted.title) || !present(&extracted.description) {
        return Err(AppError::Validation(
            "Could not extract job information from URL".to_string(),
        ));
    }

    Ok(NewJobPosting {
        title: extracted.title.unwrap_or_default(),
        company: extracted
            .company
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_COMPANY.to_string()),
        location: extracted.location,
        description: extracted.description.unwrap_or_default(),
        requirements: extracted.requirements,
        source_url: Some(url.to_string()),
        source_platform: Some(detect_platform(url).to_string()),
        status: if save_as_draft {
            JobStatus::Draft
        } else {
            JobStatus::Active
        },
        ..Default::default()
    })
}
