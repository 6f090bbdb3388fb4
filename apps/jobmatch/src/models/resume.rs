use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The slice of a resume the matcher needs. Resumes are owned by another
/// subsystem; the store hands these out read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeCandidate {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    /// Text extracted from the uploaded file. `None` until extraction finished.
    pub raw_text: Option<String>,
    pub is_deleted: bool,
}

impl ResumeCandidate {
    /// Deleted resumes and resumes without extracted text are skipped, not errored.
    pub fn is_matchable(&self) -> bool {
        !self.is_deleted && self.text().is_some()
    }

    pub fn text(&self) -> Option<&str> {
        self.raw_text.as_deref().filter(|t| !t.trim().is_empty())
    }
}
