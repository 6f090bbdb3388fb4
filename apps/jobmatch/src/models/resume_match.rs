use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

pub const GOOD_MATCH_THRESHOLD: f64 = 70.0;
pub const EXCELLENT_MATCH_THRESHOLD: f64 = 85.0;

/// Scored comparison between one resume and one job posting.
/// At most one record exists per (resume_id, job_id, user_id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeMatch {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub job_id: Uuid,
    pub user_id: Uuid,

    pub overall_score: f64,
    pub skills_score: Option<f64>,
    pub experience_score: Option<f64>,
    pub education_score: Option<f64>,
    pub keyword_score: Option<f64>,

    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub recommendations: Vec<String>,
    pub match_data: Value,

    pub processing_time_secs: Option<f64>,
    pub analyzer_model: Option<String>,

    pub is_bookmarked: bool,
    pub is_applied: bool,
    pub applied_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResumeMatch {
    pub fn key(&self) -> (Uuid, Uuid, Uuid) {
        (self.resume_id, self.job_id, self.user_id)
    }

    pub fn match_percentage(&self) -> u32 {
        self.overall_score.round().clamp(0.0, 100.0) as u32
    }

    pub fn is_good_match(&self) -> bool {
        self.overall_score >= GOOD_MATCH_THRESHOLD
    }

    pub fn is_excellent_match(&self) -> bool {
        self.overall_score >= EXCELLENT_MATCH_THRESHOLD
    }

    pub fn toggle_bookmark(&mut self, now: DateTime<Utc>) {
        self.is_bookmarked = !self.is_bookmarked;
        self.updated_at = now;
    }

    pub fn mark_applied(&mut self, now: DateTime<Utc>) {
        self.is_applied = true;
        self.applied_at = Some(now);
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_match(score: f64) -> ResumeMatch {
        let now = Utc::now();
        ResumeMatch {
            id: Uuid::new_v4(),
            resume_id: Uuid::new_v4(),
            job_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
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

    #[test]
    fn test_match_quality_thresholds() {
        assert!(!make_match(69.9).is_good_match());
        assert!(make_match(70.0).is_good_match());
        assert!(!make_match(84.9).is_excellent_match());
        assert!(make_match(85.0).is_excellent_match());
    }

    #[test]
    fn test_match_percentage_rounds() {
        assert_eq!(make_match(72.6).match_percentage(), 73);
        assert_eq!(make_match(0.2).match_percentage(), 0);
    }

    #[test]
    fn test_user_actions_stamp_updated_at() {
        let mut record = make_match(50.0);
        let later = record.updated_at + chrono::Duration::minutes(5);

        record.toggle_bookmark(later);
        assert!(record.is_bookmarked);
        assert_eq!(record.updated_at, later);

        record.mark_applied(later);
        assert!(record.is_applied);
        assert_eq!(record.applied_at, Some(later));
    }
}
