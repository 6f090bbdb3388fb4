// Prompt templates for the LLM-backed analyzer.
// Keep the JSON key names in sync with `RequirementsExtraction` and
// `MatchAnalysis`.

pub const EXTRACTION_SYSTEM: &str = "You are an expert technical recruiter. \
    You read job descriptions and extract structured, factual requirements. \
    Never invent requirements that are not stated or clearly implied.";

pub const EXTRACTION_INSTRUCTIONS: &str = r#"Extract the requirements from the job description below.

Return a JSON object with these keys (omit a key if the description gives no basis for it):
- "required_skills": array of strings
- "preferred_skills": array of strings
- "keywords": array of ATS keywords
- "requirements": array of requirement sentences
- "category": string, the job family (e.g. "software_engineering")
- "seniority": string, e.g. "junior", "mid", "senior", "executive"
- "clarity_score", "completeness_score", "specificity_score": numbers 0-100 rating the posting
- "suggestions": array of improvements for the posting
- "missing_info": array of information the posting lacks
- "industry_terms": array of strings
- "role_terms": array of strings"#;

pub const MATCH_SYSTEM: &str = "You are an expert resume reviewer. \
    You compare a resume against a job description and score the fit honestly. \
    Scores are numbers from 0 to 100.";

pub const MATCH_INSTRUCTIONS: &str = r#"Compare the resume with the job description.

Return a JSON object with:
- "overall_match_score": number 0-100 (required)
- "skills_match_score", "experience_match_score", "education_match_score", "keyword_match_score": numbers 0-100, omit any you cannot judge
- "matched_skills", "missing_skills", "matched_keywords", "missing_keywords": arrays of strings
- "recommendations": array of concrete edits that would improve the resume for this job"#;

pub fn extraction_prompt(description: &str) -> String {
    format!("{EXTRACTION_INSTRUCTIONS}\n\nJOB DESCRIPTION:\n{description}")
}

/// Resume and job text are appended verbatim after the instructions.
pub fn match_prompt(resume_text: &str, job_text: &str) -> String {
    format!("{MATCH_INSTRUCTIONS}\n\nRESUME:\n{resume_text}\n\nJOB DESCRIPTION:\n{job_text}")
}
