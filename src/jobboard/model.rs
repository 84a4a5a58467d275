use crate::error::{BoardError, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Generates an opaque id such as `job_0192f1...`.
///
/// The suffix is a UUIDv7, so ids of one kind sort in creation order. Stores
/// keep their records in sorted maps and rely on this for insertion order.
pub fn new_id(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::now_v7().simple())
}

/// A signed-up user as seen by everything outside the identity store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Stored account. Never leaves the identity store; callers get a [`User`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl CredentialRecord {
    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub owner_id: String,
    pub file_name: String,
    pub file_type: String,
    pub file_size: u64,
    /// `data:<mime>;base64,<payload>`
    pub file_content: String,
    pub upload_date: DateTime<Utc>,
}

impl Document {
    pub fn encode_content(mime_type: &str, bytes: &[u8]) -> String {
        format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
    }

    /// Recovers the uploaded bytes from the stored data URI.
    pub fn decode_content(&self) -> Result<Vec<u8>> {
        let payload = self
            .file_content
            .split_once(";base64,")
            .map(|(_, payload)| payload)
            .ok_or_else(|| {
                BoardError::Store(format!("Document {} has no base64 payload", self.id))
            })?;
        STANDARD
            .decode(payload)
            .map_err(|e| BoardError::Store(format!("Document {} is corrupt: {}", self.id, e)))
    }
}

/// The caller-supplied part of a job posting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewJob {
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: String,
    pub category: String,
    pub description: String,
    pub requirements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: String,
    pub category: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub date_posted: DateTime<Utc>,
}

impl JobPosting {
    pub fn new(owner_id: &str, fields: NewJob) -> Self {
        Self {
            id: new_id("job"),
            owner_id: owner_id.to_string(),
            title: fields.title,
            company: fields.company,
            location: fields.location,
            salary: fields.salary,
            category: fields.category,
            description: fields.description,
            requirements: fields.requirements,
            date_posted: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ApplicationStatus::Pending),
            "reviewed" => Ok(ApplicationStatus::Reviewed),
            "accepted" => Ok(ApplicationStatus::Accepted),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(BoardError::Validation(format!(
                "Unknown status '{}' (expected pending, reviewed, accepted or rejected)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub job_id: String,
    pub applicant_id: String,
    pub applicant_name: String,
    pub applicant_email: String,
    pub document_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
    pub status: ApplicationStatus,
    pub application_date: DateTime<Utc>,
}

/// Everything `Registry::apply` needs to file an application.
#[derive(Debug, Clone)]
pub struct ApplicationRequest {
    pub job_id: String,
    pub applicant_id: String,
    pub applicant_name: String,
    pub applicant_email: String,
    pub document_id: String,
    pub cover_letter: Option<String>,
}

impl ApplicationRequest {
    pub fn new(job_id: &str, applicant: &User, document_id: &str) -> Self {
        Self {
            job_id: job_id.to_string(),
            applicant_id: applicant.id.clone(),
            applicant_name: applicant.name.clone(),
            applicant_email: applicant.email.clone(),
            document_id: document_id.to_string(),
            cover_letter: None,
        }
    }

    pub fn with_cover_letter(mut self, cover_letter: Option<String>) -> Self {
        self.cover_letter = cover_letter.filter(|c| !c.trim().is_empty());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_sort_in_creation_order() {
        let ids: Vec<String> = (0..50).map(|_| new_id("job")).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        assert!(ids[0].starts_with("job_"));
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!(
            "Accepted".parse::<ApplicationStatus>().unwrap(),
            ApplicationStatus::Accepted
        );
        assert!("hired".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&ApplicationStatus::Reviewed).unwrap();
        assert_eq!(json, "\"reviewed\"");
    }

    #[test]
    fn document_content_decodes_back_to_bytes() {
        let doc = Document {
            id: "cv_1".into(),
            owner_id: "user_1".into(),
            file_name: "cv.pdf".into(),
            file_type: "application/pdf".into(),
            file_size: 5,
            file_content: Document::encode_content("application/pdf", b"%PDF-"),
            upload_date: Utc::now(),
        };
        assert!(doc.file_content.starts_with("data:application/pdf;base64,"));
        assert_eq!(doc.decode_content().unwrap(), b"%PDF-");
    }

    #[test]
    fn blank_cover_letter_is_dropped() {
        let user = User {
            id: "user_1".into(),
            name: "Bea".into(),
            email: "bea@example.com".into(),
        };
        let req = ApplicationRequest::new("job_1", &user, "cv_1")
            .with_cover_letter(Some("   ".into()));
        assert!(req.cover_letter.is_none());
    }
}
