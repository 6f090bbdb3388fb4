//! Statistical rollups over one user's job and match snapshot.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::models::{JobPosting, ResumeMatch};

const MAX_INDUSTRY_GROUPS: usize = 10;
const MAX_POPULAR_SKILLS: usize = 10;
const MAX_POPULAR_INDUSTRIES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    pub key: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillCount {
    pub skill: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobStats {
    pub total_jobs: u32,
    pub active_jobs: u32,
    pub jobs_by_type: Vec<GroupCount>,
    /// Jobs without an industry are not counted. At most 10 groups.
    pub jobs_by_industry: Vec<GroupCount>,
    pub jobs_by_experience_level: Vec<GroupCount>,
    pub jobs_this_week: u32,
    pub jobs_this_month: u32,
    pub popular_skills: Vec<SkillCount>,
    pub popular_industries: Vec<String>,
    pub matches: MatchRollup,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchRollup {
    pub total_matches: u32,
    /// `None` when there are no matches.
    pub average_match_score: Option<f64>,
    pub bookmarked: u32,
    pub applied: u32,
}

/// Reduces one snapshot into the stats response. Deleted jobs are skipped.
pub fn aggregate_job_stats(
    jobs: &[JobPosting],
    matches: &[ResumeMatch],
    now: DateTime<Utc>,
) -> JobStats {
    let live: Vec<&JobPosting> = jobs.iter().filter(|j| !j.is_deleted()).collect();

    let week_ago = now - Duration::days(7);
    let month_ago = now - Duration::days(30);

    let industries = group_counts(live.iter().filter_map(|j| j.industry.as_deref()));

    JobStats {
        total_jobs: live.len() as u32,
        active_jobs: live.iter().filter(|j| j.is_active()).count() as u32,
        jobs_by_type: group_counts(live.iter().map(|j| j.job_type.as_str())),
        jobs_by_industry: industries.iter().take(MAX_INDUSTRY_GROUPS).cloned().collect(),
        jobs_by_experience_level: group_counts(live.iter().map(|j| j.experience_level.as_str())),
        jobs_this_week: live.iter().filter(|j| j.created_at >= week_ago).count() as u32,
        jobs_this_month: live.iter().filter(|j| j.created_at >= month_ago).count() as u32,
        popular_skills: popular_skills(&live, MAX_POPULAR_SKILLS),
        popular_industries: top_keys(industries, MAX_POPULAR_INDUSTRIES),
        matches: match_rollup(matches),
    }
}

/// Counts every required and preferred skill occurrence. A skill listed in both
/// lists of one job counts twice. Ties keep first-encountered order.
pub fn popular_skills(jobs: &[&JobPosting], limit: usize) -> Vec<SkillCount> {
    let skills = jobs.iter().flat_map(|job| {
        job.required_skills
            .iter()
            .flatten()
            .chain(job.preferred_skills.iter().flatten())
            .map(String::as_str)
    });

    let mut counts = group_counts(skills);
    // stable sort keeps equal counts in first-encountered order
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
        .into_iter()
        .take(limit)
        .map(|g| SkillCount {
            skill: g.key,
            count: g.count,
        })
        .collect()
}

pub fn match_rollup(matches: &[ResumeMatch]) -> MatchRollup {
    if matches.is_empty() {
        return MatchRollup::default();
    }
    let sum: f64 = matches.iter().map(|m| m.overall_score).sum();
    MatchRollup {
        total_matches: matches.len() as u32,
        average_match_score: Some(sum / matches.len() as f64),
        bookmarked: matches.iter().filter(|m| m.is_bookmarked).count() as u32,
        applied: matches.iter().filter(|m| m.is_applied).count() as u32,
    }
}

/// Groups keys in first-seen order.
fn group_counts<'a, I>(keys: I) -> Vec<GroupCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut groups: Vec<GroupCount> = Vec::new();
    for key in keys {
        match index.get(key) {
            Some(&i) => groups[i].count += 1,
            None => {
                index.insert(key, groups.len());
                groups.push(GroupCount {
                    key: key.to_string(),
                    count: 1,
                });
            }
        }
    }
    groups
}

fn top_keys(mut groups: Vec<GroupCount>, limit: usize) -> Vec<String> {
    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups.into_iter().take(limit).map(|g| g.key).collect()
}
