//! Store-independent query descriptor for job search.
//!
//! A `JobQuery` is an ordered list of predicates (ANDed left to right), one
//! ordering and one page window. The in-memory store evaluates it directly;
//! a SQL-backed store would translate each predicate into a WHERE fragment.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{ExperienceLevel, JobPosting, JobType, RemoteType};
use crate::search::criteria::{
    clamp_page, clamp_page_size, non_blank, non_zero, JobSearchCriteria, SortDirection, SortField,
};

/// Text columns a substring predicate can inspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Title,
    Company,
    Description,
    Location,
    Industry,
}

impl TextField {
    fn value(self, job: &JobPosting) -> Option<&str> {
        match self {
            TextField::Title => Some(&job.title),
            TextField::Company => Some(&job.company),
            TextField::Description => Some(&job.description),
            TextField::Location => job.location.as_deref(),
            TextField::Industry => job.industry.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    OwnedBy(Uuid),
    NotDeleted,
    /// Case-insensitive substring match on any of `fields`. `needle` is stored lowercased.
    Contains { fields: Vec<TextField>, needle: String },
    JobTypeIs(JobType),
    ExperienceLevelIs(ExperienceLevel),
    RemoteTypeIn(Vec<RemoteType>),
    /// Either salary bound is at least the value.
    SalaryAtLeast(i64),
    /// Either salary bound is at most the value.
    SalaryAtMost(i64),
    PostedAfter(DateTime<Utc>),
    PostedBefore(DateTime<Utc>),
    /// `true`: min or max set. `false`: both absent.
    SalaryPresent(bool),
}

impl Predicate {
    pub fn contains(fields: &[TextField], needle: &str) -> Self {
        Predicate::Contains {
            fields: fields.to_vec(),
            needle: needle.to_lowercase(),
        }
    }

    pub fn matches(&self, job: &JobPosting) -> bool {
        match self {
            Predicate::OwnedBy(user_id) => job.user_id == *user_id,
            Predicate::NotDeleted => !job.is_deleted(),
            Predicate::Contains { fields, needle } => fields.iter().any(|field| {
                field
                    .value(job)
                    .is_some_and(|v| v.to_lowercase().contains(needle.as_str()))
            }),
            Predicate::JobTypeIs(job_type) => job.job_type == *job_type,
            Predicate::ExperienceLevelIs(level) => job.experience_level == *level,
            Predicate::RemoteTypeIn(types) => types.contains(&job.remote_type),
            Predicate::SalaryAtLeast(bound) => {
                job.salary_min.is_some_and(|s| s >= *bound)
                    || job.salary_max.is_some_and(|s| s >= *bound)
            }
            Predicate::SalaryAtMost(bound) => {
                job.salary_min.is_some_and(|s| s <= *bound)
                    || job.salary_max.is_some_and(|s| s <= *bound)
            }
            Predicate::PostedAfter(bound) => job.posted_date.is_some_and(|d| d >= *bound),
            Predicate::PostedBefore(bound) => job.posted_date.is_some_and(|d| d <= *bound),
            Predicate::SalaryPresent(present) => job.has_salary_info() == *present,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderBy {
    pub field: SortField,
    pub direction: SortDirection,
}

impl OrderBy {
    /// Compares two jobs by the sort key, breaking ties by id so pages stay stable.
    pub fn compare(&self, a: &JobPosting, b: &JobPosting) -> Ordering {
        let by_key = match self.field {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::PostedDate => a.posted_date.cmp(&b.posted_date),
            SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            SortField::Company => a.company.to_lowercase().cmp(&b.company.to_lowercase()),
        };
        let by_key = match self.direction {
            SortDirection::Asc => by_key,
            SortDirection::Desc => by_key.reverse(),
        };
        by_key.then_with(|| a.id.cmp(&b.id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: u32,
    pub offset: u64,
}

impl Pagination {
    pub fn from_page(page: u32, page_size: u32) -> Self {
        let page = clamp_page(Some(page));
        let limit = clamp_page_size(Some(page_size));
        Self {
            limit,
            offset: u64::from(page - 1) * u64::from(limit),
        }
    }

    pub fn page(&self) -> u32 {
        (self.offset / u64::from(self.limit.max(1))) as u32 + 1
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::from_page(1, clamp_page_size(None))
    }
}

/// A fully composed search over one user's jobs.
#[derive(Debug, Clone, PartialEq)]
pub struct JobQuery {
    pub predicates: Vec<Predicate>,
    pub order: OrderBy,
    pub pagination: Pagination,
}

impl JobQuery {
    pub fn matches(&self, job: &JobPosting) -> bool {
        self.predicates.iter().all(|p| p.matches(job))
    }

    /// Filters, sorts and pages `jobs`. Returns the page and the pre-pagination total.
    pub fn execute<'a, I>(&self, jobs: I) -> (Vec<JobPosting>, u64)
    where
        I: IntoIterator<Item = &'a JobPosting>,
    {
        let mut hits: Vec<&JobPosting> = jobs.into_iter().filter(|j| self.matches(j)).collect();
        let total = hits.len() as u64;
        hits.sort_by(|a, b| self.order.compare(a, b));

        let page = hits
            .into_iter()
            .skip(usize::try_from(self.pagination.offset).unwrap_or(usize::MAX))
            .take(self.pagination.limit as usize)
            .cloned()
            .collect();
        (page, total)
    }
}

/// Composes a `JobQuery`. Ownership and soft-delete filtering are always applied.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    predicates: Vec<Predicate>,
    order: OrderBy,
    pagination: Pagination,
}

impl QueryBuilder {
    pub fn for_user(user_id: Uuid) -> Self {
        Self {
            predicates: vec![Predicate::OwnedBy(user_id), Predicate::NotDeleted],
            order: OrderBy::default(),
            pagination: Pagination::default(),
        }
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn sort(mut self, field: SortField, direction: SortDirection) -> Self {
        self.order = OrderBy { field, direction };
        self
    }

    pub fn page(mut self, page: u32, page_size: u32) -> Self {
        self.pagination = Pagination::from_page(page, page_size);
        self
    }

    /// Adds a predicate for every set criterion, then the sort and page window.
    pub fn with_criteria(mut self, criteria: &JobSearchCriteria) -> Self {
        if let Some(query) = non_blank(&criteria.query) {
            self = self.filter(Predicate::contains(
                &[
                    TextField::Title,
                    TextField::Company,
                    TextField::Description,
                    TextField::Location,
                ],
                query,
            ));
        }
        if let Some(company) = non_blank(&criteria.company) {
            self = self.filter(Predicate::contains(&[TextField::Company], company));
        }
        if let Some(location) = non_blank(&criteria.location) {
            self = self.filter(Predicate::contains(&[TextField::Location], location));
        }
        if let Some(job_type) = criteria.job_type {
            self = self.filter(Predicate::JobTypeIs(job_type));
        }
        if let Some(level) = criteria.experience_level {
            self = self.filter(Predicate::ExperienceLevelIs(level));
        }
        if let Some(remote_type) = criteria.remote_type {
            self = self.filter(Predicate::RemoteTypeIn(vec![remote_type]));
        }
        if let Some(industry) = non_blank(&criteria.industry) {
            self = self.filter(Predicate::contains(&[TextField::Industry], industry));
        }
        if let Some(min) = non_zero(criteria.salary_min) {
            self = self.filter(Predicate::SalaryAtLeast(min));
        }
        if let Some(max) = non_zero(criteria.salary_max) {
            self = self.filter(Predicate::SalaryAtMost(max));
        }
        if let Some(after) = criteria.posted_after {
            self = self.filter(Predicate::PostedAfter(after));
        }
        if let Some(before) = criteria.posted_before {
            self = self.filter(Predicate::PostedBefore(before));
        }
        if let Some(present) = criteria.has_salary_info {
            self = self.filter(Predicate::SalaryPresent(present));
        }
        if let Some(remote_friendly) = criteria.is_remote_friendly {
            let types = if remote_friendly {
                vec![RemoteType::Remote, RemoteType::Hybrid]
            } else {
                vec![RemoteType::OnSite]
            };
            self = self.filter(Predicate::RemoteTypeIn(types));
        }

        self.sort(criteria.sort_field(), criteria.sort_direction())
            .page(criteria.page(), criteria.page_size())
    }

    pub fn build(self) -> JobQuery {
        JobQuery {
            predicates: self.predicates,
            order: self.order,
            pagination: self.pagination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewJobPosting;
    use chrono::Duration;

    fn make_job(user_id: Uuid, title: &str, company: &str) -> JobPosting {
        NewJobPosting {
            title: title.to_string(),
            company: company.to_string(),
            description: "Design and ship backend services.".to_string(),
            ..Default::default()
        }
        .into_job(user_id, Utc::now())
        .unwrap()
    }

    fn with_salary(mut job: JobPosting, min: Option<i64>, max: Option<i64>) -> JobPosting {
        job.salary_min = min;
        job.salary_max = max;
        job
    }

    #[test]
    fn test_owner_and_soft_delete_always_applied() {
        let user = Uuid::new_v4();
        let mine = make_job(user, "Engineer", "Acme");
        let other = make_job(Uuid::new_v4(), "Engineer", "Acme");
        let mut deleted = make_job(user, "Engineer", "Acme");
        deleted.deleted_at = Some(Utc::now());

        let query = QueryBuilder::for_user(user).build();
        let (rows, total) = query.execute([&mine, &other, &deleted]);
        assert_eq!(total, 1);
        assert_eq!(rows[0].id, mine.id);
    }

    #[test]
    fn test_free_text_is_case_insensitive_across_fields() {
        let user = Uuid::new_v4();
        let mut by_location = make_job(user, "Engineer", "Acme");
        by_location.location = Some("Remote - Berlin".to_string());
        let by_company = make_job(user, "Engineer", "Berlin Labs");
        let miss = make_job(user, "Engineer", "Acme");

        let criteria = JobSearchCriteria {
            query: Some("BERLIN".to_string()),
            ..Default::default()
        };
        let query = QueryBuilder::for_user(user).with_criteria(&criteria).build();
        let (_, total) = query.execute([&by_location, &by_company, &miss]);
        assert_eq!(total, 2);
    }

    #[test]
    fn test_blank_text_criteria_ignored() {
        let user = Uuid::new_v4();
        let criteria = JobSearchCriteria {
            query: Some("   ".to_string()),
            company: Some(String::new()),
            ..Default::default()
        };
        let query = QueryBuilder::for_user(user).with_criteria(&criteria).build();
        assert_eq!(query.predicates.len(), 2);
    }

    #[test]
    fn test_salary_filters_use_either_bound() {
        let user = Uuid::new_v4();
        let only_max = with_salary(make_job(user, "A", "Acme"), None, Some(120_000));
        let only_min = with_salary(make_job(user, "B", "Acme"), Some(90_000), None);
        let low = with_salary(make_job(user, "C", "Acme"), Some(40_000), Some(60_000));
        let none = make_job(user, "D", "Acme");

        let at_least = Predicate::SalaryAtLeast(100_000);
        assert!(at_least.matches(&only_max));
        assert!(!at_least.matches(&only_min));
        assert!(!at_least.matches(&low));
        assert!(!at_least.matches(&none));

        let at_most = Predicate::SalaryAtMost(50_000);
        assert!(at_most.matches(&low));
        assert!(!at_most.matches(&only_max));
        assert!(!at_most.matches(&none));
    }

    #[test]
    fn test_salary_presence_and_remote_friendly() {
        let user = Uuid::new_v4();
        let mut remote = with_salary(make_job(user, "A", "Acme"), Some(1), None);
        remote.remote_type = RemoteType::Remote;
        let onsite = make_job(user, "B", "Acme");

        assert!(Predicate::SalaryPresent(true).matches(&remote));
        assert!(Predicate::SalaryPresent(false).matches(&onsite));

        let criteria = JobSearchCriteria {
            is_remote_friendly: Some(false),
            ..Default::default()
        };
        let query = QueryBuilder::for_user(user).with_criteria(&criteria).build();
        let (rows, _) = query.execute([&remote, &onsite]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, onsite.id);
    }

    #[test]
    fn test_posted_bounds_are_inclusive() {
        let user = Uuid::new_v4();
        let job = make_job(user, "A", "Acme");
        let posted = job.posted_date.unwrap();
        assert!(Predicate::PostedAfter(posted).matches(&job));
        assert!(Predicate::PostedBefore(posted).matches(&job));
        assert!(!Predicate::PostedAfter(posted + Duration::seconds(1)).matches(&job));
    }

    #[test]
    fn test_pagination_reports_total_before_paging() {
        let user = Uuid::new_v4();
        let jobs: Vec<JobPosting> = (0..7)
            .map(|i| make_job(user, &format!("Job {i}"), "Acme"))
            .collect();

        let query = QueryBuilder::for_user(user).page(2, 3).build();
        let (rows, total) = query.execute(&jobs);
        assert_eq!(total, 7);
        assert_eq!(rows.len(), 3);

        let query = QueryBuilder::for_user(user).page(3, 3).build();
        let (rows, _) = query.execute(&jobs);
        assert_eq!(rows.len(), 1);

        let query = QueryBuilder::for_user(user).page(9, 3).build();
        let (rows, total) = query.execute(&jobs);
        assert!(rows.is_empty());
        assert_eq!(total, 7);
    }

    #[test]
    fn test_pages_do_not_overlap_on_equal_keys() {
        let user = Uuid::new_v4();
        let now = Utc::now();
        let jobs: Vec<JobPosting> = (0..6)
            .map(|_| {
                let mut job = make_job(user, "Same", "Acme");
                job.created_at = now;
                job
            })
            .collect();

        let first = QueryBuilder::for_user(user).page(1, 3).build().execute(&jobs).0;
        let second = QueryBuilder::for_user(user).page(2, 3).build().execute(&jobs).0;
        for job in &first {
            assert!(second.iter().all(|other| other.id != job.id));
        }
    }

    #[test]
    fn test_sort_by_title_ascending() {
        let user = Uuid::new_v4();
        let b = make_job(user, "beta", "Acme");
        let a = make_job(user, "Alpha", "Acme");
        let criteria = JobSearchCriteria {
            sort_by: Some("title".to_string()),
            sort_order: Some("asc".to_string()),
            ..Default::default()
        };
        let (rows, _) = QueryBuilder::for_user(user)
            .with_criteria(&criteria)
            .build()
            .execute([&b, &a]);
        assert_eq!(rows[0].title, "Alpha");
        assert_eq!(rows[1].title, "beta");
    }

    #[test]
    fn test_default_sort_is_newest_first() {
        let user = Uuid::new_v4();
        let mut old = make_job(user, "Old", "Acme");
        old.created_at = Utc::now() - Duration::days(3);
        let new = make_job(user, "New", "Acme");
        let criteria = JobSearchCriteria {
            sort_by: Some("bogus".to_string()),
            ..Default::default()
        };
        let (rows, _) = QueryBuilder::for_user(user)
            .with_criteria(&criteria)
            .build()
            .execute([&old, &new]);
        assert_eq!(rows[0].title, "New");
    }

    /// Three jobs with distinct company, location, industry, type and remote setup.
    fn make_catalog(user: Uuid) -> [JobPosting; 3] {
        let now = Utc::now();

        let mut a = make_job(user, "A", "Zeta Corp");
        a.location = Some("London".to_string());
        a.industry = Some("Tech".to_string());
        a.remote_type = RemoteType::Remote;
        a.experience_level = ExperienceLevel::SeniorLevel;
        a.posted_date = Some(now - Duration::days(1));

        let mut b = make_job(user, "B", "Alpha Inc");
        b.location = Some("Paris".to_string());
        b.industry = Some("Finance".to_string());
        b.remote_type = RemoteType::Hybrid;
        b.experience_level = ExperienceLevel::MidLevel;
        b.posted_date = Some(now - Duration::days(5));

        let mut c = make_job(user, "C", "beta labs");
        c.location = Some("Berlin".to_string());
        c.remote_type = RemoteType::OnSite;
        c.job_type = JobType::PartTime;
        c.experience_level = ExperienceLevel::MidLevel;
        c.posted_date = None;

        [a, b, c]
    }

    fn titles(user: Uuid, jobs: &[JobPosting], criteria: JobSearchCriteria) -> Vec<String> {
        let criteria = JobSearchCriteria {
            sort_by: criteria.sort_by.or(Some("title".to_string())),
            sort_order: criteria.sort_order.or(Some("asc".to_string())),
            ..criteria
        };
        QueryBuilder::for_user(user)
            .with_criteria(&criteria)
            .build()
            .execute(jobs)
            .0
            .into_iter()
            .map(|j| j.title)
            .collect()
    }

    #[test]
    fn test_remote_friendly_matches_remote_and_hybrid() {
        let user = Uuid::new_v4();
        let jobs = make_catalog(user);
        let criteria = JobSearchCriteria {
            is_remote_friendly: Some(true),
            ..Default::default()
        };
        assert_eq!(titles(user, &jobs, criteria), ["A", "B"]);
    }

    #[test]
    fn test_text_filters_are_case_insensitive_substrings() {
        let user = Uuid::new_v4();
        let jobs = make_catalog(user);

        let by_company = JobSearchCriteria {
            company: Some("ALPHA".to_string()),
            ..Default::default()
        };
        assert_eq!(titles(user, &jobs, by_company), ["B"]);

        let by_location = JobSearchCriteria {
            location: Some("par".to_string()),
            ..Default::default()
        };
        assert_eq!(titles(user, &jobs, by_location), ["B"]);

        // A job without an industry never matches an industry filter.
        let by_industry = JobSearchCriteria {
            industry: Some("tech".to_string()),
            ..Default::default()
        };
        assert_eq!(titles(user, &jobs, by_industry), ["A"]);
    }

    #[test]
    fn test_enum_filters_use_equality() {
        let user = Uuid::new_v4();
        let jobs = make_catalog(user);

        let part_time = JobSearchCriteria {
            job_type: Some(JobType::PartTime),
            ..Default::default()
        };
        assert_eq!(titles(user, &jobs, part_time), ["C"]);

        let mid = JobSearchCriteria {
            experience_level: Some(ExperienceLevel::MidLevel),
            ..Default::default()
        };
        assert_eq!(titles(user, &jobs, mid), ["B", "C"]);

        let on_site = JobSearchCriteria {
            remote_type: Some(RemoteType::OnSite),
            ..Default::default()
        };
        assert_eq!(titles(user, &jobs, on_site), ["C"]);
    }

    #[test]
    fn test_criteria_combine_with_and() {
        let user = Uuid::new_v4();
        let jobs = make_catalog(user);
        let criteria = JobSearchCriteria {
            job_type: Some(JobType::FullTime),
            experience_level: Some(ExperienceLevel::MidLevel),
            remote_type: Some(RemoteType::Hybrid),
            ..Default::default()
        };
        assert_eq!(titles(user, &jobs, criteria), ["B"]);

        let disjoint = JobSearchCriteria {
            company: Some("alpha".to_string()),
            location: Some("London".to_string()),
            ..Default::default()
        };
        assert!(titles(user, &jobs, disjoint).is_empty());
    }

    #[test]
    fn test_sort_by_company_and_posted_date() {
        let user = Uuid::new_v4();
        let jobs = make_catalog(user);

        let by_company = JobSearchCriteria {
            sort_by: Some("company".to_string()),
            ..Default::default()
        };
        assert_eq!(titles(user, &jobs, by_company), ["B", "C", "A"]);

        // Undated jobs sort first ascending, last descending.
        let posted_asc = JobSearchCriteria {
            sort_by: Some("posted_date".to_string()),
            ..Default::default()
        };
        assert_eq!(titles(user, &jobs, posted_asc), ["C", "B", "A"]);

        let posted_desc = JobSearchCriteria {
            sort_by: Some("posted_date".to_string()),
            sort_order: Some("desc".to_string()),
            ..Default::default()
        };
        assert_eq!(titles(user, &jobs, posted_desc), ["A", "B", "C"]);
    }

    #[test]
    fn test_zero_salary_bound_is_ignored() {
        let user = Uuid::new_v4();
        let jobs = make_catalog(user);
        let criteria = JobSearchCriteria {
            salary_min: Some(0),
            ..Default::default()
        };
        let query = QueryBuilder::for_user(user).with_criteria(&criteria).build();
        assert_eq!(query.predicates.len(), 2);
        assert_eq!(titles(user, &jobs, criteria), ["A", "B", "C"]);
    }

    #[test]
    fn test_pagination_from_page() {
        let p = Pagination::from_page(3, 20);
        assert_eq!(p.offset, 40);
        assert_eq!(p.page(), 3);
        assert_eq!(Pagination::from_page(0, 0).limit, 1);
    }
}
