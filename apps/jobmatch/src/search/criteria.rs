use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::models::{ExperienceLevel, JobType, RemoteType};

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Default number of jobs per page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Maximum number of jobs per page.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Clamp a requested page size into `1..=MAX_PAGE_SIZE`, falling back to the default.
pub fn clamp_page_size(page_size: Option<u32>) -> u32 {
    page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

/// Pages are 1-based; anything below 1 becomes 1.
pub fn clamp_page(page: Option<u32>) -> u32 {
    page.unwrap_or(1).max(1)
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    CreatedAt,
    Title,
    Company,
    PostedDate,
}

impl SortField {
    /// Unknown names fall back to `CreatedAt`.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "title" => SortField::Title,
            "company" => SortField::Company,
            "posted_date" => SortField::PostedDate,
            _ => SortField::CreatedAt,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Anything other than `asc` sorts descending.
    pub fn parse(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("asc") {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }
}

// ---------------------------------------------------------------------------
// Criteria
// ---------------------------------------------------------------------------

/// Optional search filters as they arrive from a caller. All fields narrow the
/// result with AND; unset or blank fields are ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct JobSearchCriteria {
    /// Free text matched against title, company, description and location.
    pub query: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    pub experience_level: Option<ExperienceLevel>,
    pub remote_type: Option<RemoteType>,
    pub industry: Option<String>,
    #[validate(range(min = 0))]
    pub salary_min: Option<i64>,
    #[validate(range(min = 0))]
    pub salary_max: Option<i64>,
    pub posted_after: Option<DateTime<Utc>>,
    pub posted_before: Option<DateTime<Utc>>,
    pub has_salary_info: Option<bool>,
    pub is_remote_friendly: Option<bool>,

    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl JobSearchCriteria {
    pub fn sort_field(&self) -> SortField {
        self.sort_by
            .as_deref()
            .map(SortField::parse)
            .unwrap_or_default()
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_order
            .as_deref()
            .map(SortDirection::parse)
            .unwrap_or_default()
    }

    pub fn page(&self) -> u32 {
        clamp_page(self.page)
    }

    pub fn page_size(&self) -> u32 {
        clamp_page_size(self.page_size)
    }
}

/// A zero salary bound is treated as unset.
pub(crate) fn non_zero(bound: Option<i64>) -> Option<i64> {
    bound.filter(|b| *b != 0)
}

/// Returns the trimmed text, or `None` when it is blank.
pub(crate) fn non_blank(text: &Option<String>) -> Option<&str> {
    text.as_deref().map(str::trim).filter(|t| !t.is_empty())
}
