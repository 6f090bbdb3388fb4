//! Deterministic job scores. Pure functions, no I/O.

use crate::analyzer::RequirementsExtraction;
use crate::models::JobPosting;

const COMPLEXITY_BASE: f64 = 20.0;
const DETAILED_REQUIREMENTS_POINTS: f64 = 20.0;
const BROAD_SKILLS_POINTS: f64 = 20.0;
const EDUCATION_POINTS: f64 = 15.0;
const EXPERIENCE_POINTS: f64 = 15.0;
const SENIORITY_POINTS: f64 = 10.0;

/// More than this many requirements counts as a detailed posting.
const REQUIREMENTS_THRESHOLD: usize = 3;
/// More than this many required skills counts as a broad skill set.
const REQUIRED_SKILLS_THRESHOLD: usize = 5;
/// More than this many years of minimum experience counts as demanding.
const YEARS_EXPERIENCE_THRESHOLD: i32 = 3;

/// Points per tracked field present in an extraction.
const EXTRACTION_FIELD_POINTS: f64 = 20.0;

/// Rubric score for how demanding a posting is: 20 base, then
/// +20 requirements > 3, +20 required skills > 5, +15 any education requirement,
/// +15 min experience > 3 years, +10 senior or executive level. Capped at 100.
pub fn complexity_score(job: &JobPosting) -> f64 {
    let mut score = COMPLEXITY_BASE;

    if list_len(&job.requirements) > REQUIREMENTS_THRESHOLD {
        score += DETAILED_REQUIREMENTS_POINTS;
    }
    if list_len(&job.required_skills) > REQUIRED_SKILLS_THRESHOLD {
        score += BROAD_SKILLS_POINTS;
    }
    if list_len(&job.education_requirements) > 0 {
        score += EDUCATION_POINTS;
    }
    if job
        .years_experience_min
        .is_some_and(|years| years > YEARS_EXPERIENCE_THRESHOLD)
    {
        score += EXPERIENCE_POINTS;
    }
    if job.experience_level.is_senior() {
        score += SENIORITY_POINTS;
    }

    score.min(100.0)
}

/// Completeness of an analyzer extraction: +20 for each of required skills,
/// keywords, requirements, category and seniority being present.
pub fn analysis_quality_score(extraction: &RequirementsExtraction) -> f64 {
    let present = [
        list_len(&extraction.required_skills) > 0,
        list_len(&extraction.keywords) > 0,
        list_len(&extraction.requirements) > 0,
        text_present(&extraction.category),
        text_present(&extraction.seniority),
    ];

    let score = present.iter().filter(|p| **p).count() as f64 * EXTRACTION_FIELD_POINTS;
    score.min(100.0)
}

fn list_len(list: &Option<Vec<String>>) -> usize {
    list.as_ref().map_or(0, Vec::len)
}

fn text_present(text: &Option<String>) -> bool {
    text.as_deref().is_some_and(|t| !t.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExperienceLevel, NewJobPosting};
    use chrono::Utc;
    use uuid::Uuid;

    fn make_job() -> JobPosting {
        NewJobPosting {
            title: "Engineer".to_string(),
            company: "Acme".to_string(),
            description: "A perfectly ordinary engineering job.".to_string(),
            experience_level: ExperienceLevel::EntryLevel,
            ..Default::default()
        }
        .into_job(Uuid::new_v4(), Utc::now())
        .unwrap()
    }

    fn strings(n: usize) -> Option<Vec<String>> {
        Some((0..n).map(|i| format!("item-{i}")).collect())
    }

    #[test]
    fn test_bare_job_scores_base() {
        assert_eq!(complexity_score(&make_job()), 20.0);
    }

    #[test]
    fn test_every_rubric_item_scores_full() {
        let job = JobPosting {
            requirements: strings(4),
            required_skills: strings(6),
            education_requirements: strings(1),
            years_experience_min: Some(5),
            experience_level: ExperienceLevel::Executive,
            ..make_job()
        };
        assert_eq!(complexity_score(&job), 100.0);
    }

    #[test]
    fn test_thresholds_are_strict() {
        let job = JobPosting {
            requirements: strings(3),
            required_skills: strings(5),
            years_experience_min: Some(3),
            experience_level: ExperienceLevel::MidLevel,
            ..make_job()
        };
        assert_eq!(complexity_score(&job), 20.0);
    }

    #[test]
    fn test_empty_education_list_scores_nothing() {
        let job = JobPosting {
            education_requirements: Some(vec![]),
            ..make_job()
        };
        assert_eq!(complexity_score(&job), 20.0);
    }

    #[test]
    fn test_senior_level_adds_ten() {
        let job = JobPosting {
            experience_level: ExperienceLevel::SeniorLevel,
            ..make_job()
        };
        assert_eq!(complexity_score(&job), 30.0);
    }

    #[test]
    fn test_complexity_is_stable_across_calls() {
        let job = JobPosting {
            requirements: strings(7),
            years_experience_min: Some(10),
            ..make_job()
        };
        let first = complexity_score(&job);
        assert_eq!(first, complexity_score(&job));
        assert!((0.0..=100.0).contains(&first));
    }

    #[test]
    fn test_empty_extraction_scores_zero() {
        assert_eq!(analysis_quality_score(&RequirementsExtraction::default()), 0.0);
    }

    #[test]
    fn test_quality_score_grows_with_fields() {
        let mut extraction = RequirementsExtraction::default();
        let mut previous = analysis_quality_score(&extraction);

        extraction.required_skills = Some(vec!["Rust".into()]);
        let step = analysis_quality_score(&extraction);
        assert!(step >= previous);
        previous = step;

        extraction.keywords = Some(vec!["backend".into()]);
        extraction.requirements = Some(vec!["5 years".into()]);
        extraction.category = Some("engineering".into());
        let step = analysis_quality_score(&extraction);
        assert!(step >= previous);
        previous = step;

        extraction.seniority = Some("senior".into());
        let full = analysis_quality_score(&extraction);
        assert!(full >= previous);
        assert_eq!(full, 100.0);
    }

    #[test]
    fn test_blank_category_not_counted() {
        let extraction = RequirementsExtraction {
            category: Some("  ".into()),
            seniority: Some("mid".into()),
            ..Default::default()
        };
        assert_eq!(analysis_quality_score(&extraction), 20.0);
    }
}
