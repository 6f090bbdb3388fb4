pub mod job;
pub mod resume;
pub mod resume_match;

pub use job::{
    ExperienceLevel, JobPosting, JobPostingUpdate, JobStatus, JobType, NewJobPosting, RemoteType,
};
pub use resume::ResumeCandidate;
pub use resume_match::ResumeMatch;
