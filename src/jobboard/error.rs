use thiserror::Error;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Unsupported document type: {0} (only PDF and DOCX are accepted)")]
    UnsupportedType(String),

    #[error("Document is too large: {size} bytes (limit is {limit} bytes)")]
    TooLarge { size: u64, limit: u64 },

    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Application not found: {0}")]
    ApplicationNotFound(String),

    #[error("An account with email {0} already exists")]
    EmailTaken(String),

    #[error("You have already applied for job {job_id}")]
    DuplicateApplication { job_id: String },

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Failed to hash password")]
    PasswordHash,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, BoardError>;
