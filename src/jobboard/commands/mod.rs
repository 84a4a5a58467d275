use crate::commands::dashboard::DashboardSummary;
use crate::config::BoardConfig;
use crate::model::{Application, Document, JobPosting, User};
use std::path::PathBuf;

pub mod applications;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod documents;
pub mod helpers;
pub mod jobs;

#[derive(Debug, Clone)]
pub struct BoardPaths {
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// An application with the bits needed to display it: the job it is for (if
/// that still exists) and a label for the attached document.
#[derive(Debug, Clone)]
pub struct ApplicationView {
    pub application: Application,
    pub job: Option<JobPosting>,
    pub document_label: String,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub user: Option<User>,
    pub jobs: Vec<JobPosting>,
    pub applications: Vec<ApplicationView>,
    pub documents: Vec<Document>,
    pub exported: Option<PathBuf>,
    pub config: Option<BoardConfig>,
    pub summary: Option<DashboardSummary>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }

    pub fn with_jobs(mut self, jobs: Vec<JobPosting>) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn with_applications(mut self, applications: Vec<ApplicationView>) -> Self {
        self.applications = applications;
        self
    }

    pub fn with_documents(mut self, documents: Vec<Document>) -> Self {
        self.documents = documents;
        self
    }

    pub fn with_exported(mut self, path: PathBuf) -> Self {
        self.exported = Some(path);
        self
    }

    pub fn with_config(mut self, config: BoardConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_summary(mut self, summary: DashboardSummary) -> Self {
        self.summary = Some(summary);
        self
    }
}
