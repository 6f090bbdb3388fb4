use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::errors::AppError;

pub const VALID_CURRENCIES: &[&str] = &["USD", "EUR", "GBP", "CAD", "AUD", "JPY", "INR"];
pub const VALID_SALARY_PERIODS: &[&str] = &["yearly", "monthly", "weekly", "daily", "hourly"];
pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_SALARY_PERIOD: &str = "yearly";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Active,
    Closed,
    Draft,
    Expired,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    #[default]
    FullTime,
    PartTime,
    Contract,
    Temporary,
    Internship,
    Freelance,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    EntryLevel,
    #[default]
    MidLevel,
    SeniorLevel,
    Executive,
    Student,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteType {
    #[default]
    OnSite,
    Remote,
    Hybrid,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Active => "active",
            JobStatus::Closed => "closed",
            JobStatus::Draft => "draft",
            JobStatus::Expired => "expired",
        }
    }
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "full_time",
            JobType::PartTime => "part_time",
            JobType::Contract => "contract",
            JobType::Temporary => "temporary",
            JobType::Internship => "internship",
            JobType::Freelance => "freelance",
        }
    }
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::EntryLevel => "entry_level",
            ExperienceLevel::MidLevel => "mid_level",
            ExperienceLevel::SeniorLevel => "senior_level",
            ExperienceLevel::Executive => "executive",
            ExperienceLevel::Student => "student",
        }
    }

    pub fn is_senior(&self) -> bool {
        matches!(self, ExperienceLevel::SeniorLevel | ExperienceLevel::Executive)
    }
}

impl RemoteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteType::OnSite => "on_site",
            RemoteType::Remote => "remote",
            RemoteType::Hybrid => "hybrid",
        }
    }
}

/// A cataloged job posting owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: Uuid,
    pub user_id: Uuid,

    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub job_type: JobType,
    pub experience_level: ExperienceLevel,
    pub remote_type: RemoteType,
    pub industry: Option<String>,
    pub department: Option<String>,

    pub description: String,
    pub responsibilities: Option<Vec<String>>,
    pub requirements: Option<Vec<String>>,
    pub nice_to_have: Option<Vec<String>>,
    pub benefits: Option<Vec<String>>,
    pub required_skills: Option<Vec<String>>,
    pub preferred_skills: Option<Vec<String>>,
    pub keywords: Option<Vec<String>>,
    pub education_requirements: Option<Vec<String>>,

    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub salary_currency: String,
    pub salary_period: String,
    pub years_experience_min: Option<i32>,
    pub years_experience_max: Option<i32>,

    pub application_url: Option<String>,
    pub application_email: Option<String>,
    pub application_deadline: Option<DateTime<Utc>>,

    pub status: JobStatus,
    pub source_url: Option<String>,
    pub source_platform: Option<String>,
    pub posted_date: Option<DateTime<Utc>>,

    /// Raw analyzer output from the last analysis run.
    pub structured_data: Value,
    pub analysis_score: Option<f64>,
    pub complexity_score: Option<f64>,
    pub last_analyzed_at: Option<DateTime<Utc>>,

    pub view_count: u32,
    pub match_count: u32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker. Deleted jobs are invisible to reads, search and stats.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl JobPosting {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn is_active(&self) -> bool {
        self.status == JobStatus::Active
    }

    pub fn has_salary_info(&self) -> bool {
        self.salary_min.is_some() || self.salary_max.is_some()
    }

    pub fn is_remote_friendly(&self) -> bool {
        matches!(self.remote_type, RemoteType::Remote | RemoteType::Hybrid)
    }

    /// True once the application deadline has passed.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.application_deadline.is_some_and(|deadline| now > deadline)
    }

    /// Required plus preferred skills, de-duplicated in first-seen order.
    pub fn total_skills(&self) -> Vec<String> {
        let mut skills: Vec<String> = Vec::new();
        let all = self
            .required_skills
            .iter()
            .flatten()
            .chain(self.preferred_skills.iter().flatten());
        for skill in all {
            if !skills.contains(skill) {
                skills.push(skill.clone());
            }
        }
        skills
    }

    pub fn salary_range_text(&self) -> String {
        let currency = &self.salary_currency;
        let period = &self.salary_period;
        match (self.salary_min, self.salary_max) {
            (Some(min), Some(max)) => format!("{currency} {min} - {max} {period}"),
            (Some(min), None) => format!("{currency} {min}+ {period}"),
            (None, Some(max)) => format!("Up to {currency} {max} {period}"),
            (None, None) => "Not specified".to_string(),
        }
    }

    /// Checks the invariants that span more than one field.
    pub fn check_invariants(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("Job title is required".to_string()));
        }
        if self.company.trim().is_empty() {
            return Err(AppError::Validation("Company name is required".to_string()));
        }
        if self.description.trim().chars().count() < 10 {
            return Err(AppError::Validation(
                "Job description must be at least 10 characters".to_string(),
            ));
        }
        check_ranges(
            self.salary_min,
            self.salary_max,
            self.years_experience_min,
            self.years_experience_max,
        )
        .map_err(|e| {
            AppError::Validation(
                e.message
                    .map(|m| m.into_owned())
                    .unwrap_or_else(|| e.code.into_owned()),
            )
        })
    }
}

/// Input for creating a job posting. Unset optional fields take the model defaults.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_new_job_ranges"))]
pub struct NewJobPosting {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 200))]
    pub company: String,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    #[serde(default)]
    pub job_type: JobType,
    #[serde(default)]
    pub experience_level: ExperienceLevel,
    #[serde(default)]
    pub remote_type: RemoteType,
    #[validate(length(max = 100))]
    pub industry: Option<String>,
    #[validate(length(max = 100))]
    pub department: Option<String>,
    #[validate(length(min = 10))]
    pub description: String,

    #[validate(range(min = 0))]
    pub salary_min: Option<i64>,
    #[validate(range(min = 0))]
    pub salary_max: Option<i64>,
    pub salary_currency: Option<String>,
    pub salary_period: Option<String>,

    pub responsibilities: Option<Vec<String>>,
    pub requirements: Option<Vec<String>>,
    pub nice_to_have: Option<Vec<String>>,
    pub benefits: Option<Vec<String>>,
    pub required_skills: Option<Vec<String>>,
    pub preferred_skills: Option<Vec<String>>,
    pub education_requirements: Option<Vec<String>>,
    #[validate(range(min = 0, max = 50))]
    pub years_experience_min: Option<i32>,
    #[validate(range(min = 0, max = 50))]
    pub years_experience_max: Option<i32>,

    #[validate(length(max = 500))]
    pub application_url: Option<String>,
    #[validate(length(max = 255))]
    pub application_email: Option<String>,
    pub application_deadline: Option<DateTime<Utc>>,

    #[serde(default)]
    pub status: JobStatus,
    pub posted_date: Option<DateTime<Utc>>,
    #[validate(length(max = 500))]
    pub source_url: Option<String>,
    #[validate(length(max = 100))]
    pub source_platform: Option<String>,
}

impl NewJobPosting {
    /// Trims and validates the input, then builds the stored record.
    pub fn into_job(mut self, user_id: Uuid, now: DateTime<Utc>) -> Result<JobPosting, AppError> {
        self.title = self.title.trim().to_string();
        self.company = self.company.trim().to_string();
        self.description = self.description.trim().to_string();
        self.validate()?;

        let job = JobPosting {
            id: Uuid::new_v4(),
            user_id,
            title: self.title,
            company: self.company,
            location: self.location,
            job_type: self.job_type,
            experience_level: self.experience_level,
            remote_type: self.remote_type,
            industry: self.industry,
            department: self.department,
            description: self.description,
            responsibilities: self.responsibilities,
            requirements: self.requirements,
            nice_to_have: self.nice_to_have,
            benefits: self.benefits,
            required_skills: self.required_skills,
            preferred_skills: self.preferred_skills,
            keywords: None,
            education_requirements: self.education_requirements,
            salary_min: self.salary_min,
            salary_max: self.salary_max,
            salary_currency: normalize_currency(self.salary_currency.as_deref()),
            salary_period: normalize_salary_period(self.salary_period.as_deref()),
            years_experience_min: self.years_experience_min,
            years_experience_max: self.years_experience_max,
            application_url: self.application_url,
            application_email: self.application_email,
            application_deadline: self.application_deadline,
            status: self.status,
            source_url: self.source_url,
            source_platform: self.source_platform,
            posted_date: Some(self.posted_date.unwrap_or(now)),
            structured_data: Value::Object(Default::default()),
            analysis_score: None,
            complexity_score: None,
            last_analyzed_at: None,
            view_count: 0,
            match_count: 0,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        job.check_invariants()?;
        Ok(job)
    }
}

/// Partial update. Only fields that are `Some` change.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct JobPostingUpdate {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub company: Option<String>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    pub experience_level: Option<ExperienceLevel>,
    pub remote_type: Option<RemoteType>,
    #[validate(length(max = 100))]
    pub industry: Option<String>,
    #[validate(length(max = 100))]
    pub department: Option<String>,
    #[validate(length(min = 10))]
    pub description: Option<String>,

    #[validate(range(min = 0))]
    pub salary_min: Option<i64>,
    #[validate(range(min = 0))]
    pub salary_max: Option<i64>,
    pub salary_currency: Option<String>,
    pub salary_period: Option<String>,

    pub responsibilities: Option<Vec<String>>,
    pub requirements: Option<Vec<String>>,
    pub nice_to_have: Option<Vec<String>>,
    pub benefits: Option<Vec<String>>,
    pub required_skills: Option<Vec<String>>,
    pub preferred_skills: Option<Vec<String>>,
    pub education_requirements: Option<Vec<String>>,
    #[validate(range(min = 0, max = 50))]
    pub years_experience_min: Option<i32>,
    #[validate(range(min = 0, max = 50))]
    pub years_experience_max: Option<i32>,

    #[validate(length(max = 500))]
    pub application_url: Option<String>,
    #[validate(length(max = 255))]
    pub application_email: Option<String>,
    pub application_deadline: Option<DateTime<Utc>>,

    pub status: Option<JobStatus>,
}

impl JobPostingUpdate {
    /// Merges the supplied fields into `job` and re-checks the merged record.
    /// `job` is left untouched when validation fails.
    pub fn apply_to(self, job: &mut JobPosting, now: DateTime<Utc>) -> Result<(), AppError> {
        self.validate()?;

        let mut merged = job.clone();
        if let Some(v) = self.title {
            merged.title = v.trim().to_string();
        }
        if let Some(v) = self.company {
            merged.company = v.trim().to_string();
        }
        if let Some(v) = self.description {
            merged.description = v.trim().to_string();
        }
        if let Some(v) = self.salary_currency {
            merged.salary_currency = normalize_currency(Some(&v));
        }
        if let Some(v) = self.salary_period {
            merged.salary_period = normalize_salary_period(Some(&v));
        }
        set_if_some(&mut merged.location, self.location);
        set_if_some(&mut merged.industry, self.industry);
        set_if_some(&mut merged.department, self.department);
        set_if_some(&mut merged.salary_min, self.salary_min);
        set_if_some(&mut merged.salary_max, self.salary_max);
        set_if_some(&mut merged.responsibilities, self.responsibilities);
        set_if_some(&mut merged.requirements, self.requirements);
        set_if_some(&mut merged.nice_to_have, self.nice_to_have);
        set_if_some(&mut merged.benefits, self.benefits);
        set_if_some(&mut merged.required_skills, self.required_skills);
        set_if_some(&mut merged.preferred_skills, self.preferred_skills);
        set_if_some(&mut merged.education_requirements, self.education_requirements);
        set_if_some(&mut merged.years_experience_min, self.years_experience_min);
        set_if_some(&mut merged.years_experience_max, self.years_experience_max);
        set_if_some(&mut merged.application_url, self.application_url);
        set_if_some(&mut merged.application_email, self.application_email);
        set_if_some(&mut merged.application_deadline, self.application_deadline);
        if let Some(v) = self.job_type {
            merged.job_type = v;
        }
        if let Some(v) = self.experience_level {
            merged.experience_level = v;
        }
        if let Some(v) = self.remote_type {
            merged.remote_type = v;
        }
        if let Some(v) = self.status {
            merged.status = v;
        }

        merged.check_invariants()?;
        merged.updated_at = now;
        *job = merged;
        Ok(())
    }
}

fn set_if_some<T>(field: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *field = value;
    }
}

fn normalize_currency(currency: Option<&str>) -> String {
    match currency {
        Some(c) if VALID_CURRENCIES.contains(&c) => c.to_string(),
        _ => DEFAULT_CURRENCY.to_string(),
    }
}

fn normalize_salary_period(period: Option<&str>) -> String {
    match period {
        Some(p) if VALID_SALARY_PERIODS.contains(&p) => p.to_string(),
        _ => DEFAULT_SALARY_PERIOD.to_string(),
    }
}

fn validate_new_job_ranges(job: &NewJobPosting) -> Result<(), ValidationError> {
    check_ranges(
        job.salary_min,
        job.salary_max,
        job.years_experience_min,
        job.years_experience_max,
    )
}

fn check_ranges(
    salary_min: Option<i64>,
    salary_max: Option<i64>,
    years_min: Option<i32>,
    years_max: Option<i32>,
) -> Result<(), ValidationError> {
    if let (Some(min), Some(max)) = (salary_min, salary_max) {
        if max < min {
            return Err(range_error(
                "salary_range",
                "Maximum salary must be greater than or equal to minimum salary",
            ));
        }
    }
    if let (Some(min), Some(max)) = (years_min, years_max) {
        if max < min {
            return Err(range_error(
                "experience_range",
                "Maximum experience must be greater than or equal to minimum experience",
            ));
        }
    }
    Ok(())
}

fn range_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}
