//! # API Facade
//!
//! A thin facade over the command layer and the single entry point for every
//! board operation, whatever UI sits on top.
//!
//! The facade dispatches to `commands/*.rs`, normalizes a few inputs (status
//! names, file paths) and returns `Result<CmdResult>`. It does no printing
//! and holds no business rules.
//!
//! `JobBoardApi<B: StorageBackend>` is generic over the backend:
//! - Production: `JobBoardApi<FsBackend>`
//! - Testing: `JobBoardApi<MemBackend>`
//!
//! Tests here check dispatch and argument plumbing only. The rules themselves
//! are tested in the command and store modules.

use crate::board::Board;
use crate::commands;
use crate::error::Result;
use crate::model::{ApplicationStatus, NewJob};
use crate::observer::BoardObserver;
use crate::store::StorageBackend;
use std::path::Path;
use std::rc::Rc;
use std::str::FromStr;

pub struct JobBoardApi<B: StorageBackend> {
    board: Board<B>,
    paths: commands::BoardPaths,
}

impl<B: StorageBackend> JobBoardApi<B> {
    pub fn new(board: Board<B>, paths: commands::BoardPaths) -> Self {
        Self { board, paths }
    }

    pub fn subscribe(&mut self, observer: Rc<dyn BoardObserver>) {
        self.board.subscribe(observer);
    }

    pub fn register(&mut self, name: &str, email: &str, password: &str) -> Result<CmdResult> {
        commands::auth::register(&mut self.board, name, email, password)
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<CmdResult> {
        commands::auth::login(&mut self.board, email, password)
    }

    pub fn logout(&mut self) -> Result<CmdResult> {
        commands::auth::logout(&mut self.board)
    }

    pub fn whoami(&self) -> Result<CmdResult> {
        commands::auth::whoami(&self.board)
    }

    pub fn dashboard(&self) -> Result<CmdResult> {
        commands::dashboard::run(&self.board)
    }

    pub fn post_job(&mut self, fields: NewJob) -> Result<CmdResult> {
        commands::jobs::create(&mut self.board, fields)
    }

    pub fn list_jobs(&self, filter: &JobFilter) -> Result<CmdResult> {
        commands::jobs::list(&self.board, filter)
    }

    pub fn show_job(&self, job_id: &str) -> Result<CmdResult> {
        commands::jobs::show(&self.board, job_id.trim())
    }

    pub fn delete_job(&mut self, job_id: &str) -> Result<CmdResult> {
        commands::jobs::delete(&mut self.board, job_id.trim())
    }

    pub fn upload_document<P: AsRef<Path>>(&mut self, path: P) -> Result<CmdResult> {
        commands::documents::upload(&mut self.board, path.as_ref())
    }

    pub fn list_documents(&self) -> Result<CmdResult> {
        commands::documents::list(&self.board)
    }

    pub fn delete_document(&mut self, document_id: &str) -> Result<CmdResult> {
        commands::documents::delete(&mut self.board, document_id.trim())
    }

    pub fn export_document<P: AsRef<Path>>(
        &self,
        document_id: &str,
        target: P,
    ) -> Result<CmdResult> {
        commands::documents::export(&self.board, document_id.trim(), target.as_ref())
    }

    pub fn apply(
        &mut self,
        job_id: &str,
        document_id: &str,
        cover_letter: Option<String>,
    ) -> Result<CmdResult> {
        commands::applications::apply(
            &mut self.board,
            job_id.trim(),
            document_id.trim(),
            cover_letter,
        )
    }

    pub fn my_applications(&self) -> Result<CmdResult> {
        commands::applications::mine(&self.board)
    }

    pub fn applications_for_job(&self, job_id: &str) -> Result<CmdResult> {
        commands::applications::for_job(&self.board, job_id.trim())
    }

    pub fn withdraw(&mut self, application_id: &str) -> Result<CmdResult> {
        commands::applications::withdraw(&mut self.board, application_id.trim())
    }

    /// `status` is a status name (`pending`, `reviewed`, `accepted`, `rejected`).
    pub fn set_status(&mut self, application_id: &str, status: &str) -> Result<CmdResult> {
        let status = ApplicationStatus::from_str(status.trim())?;
        commands::applications::set_status(&mut self.board, application_id.trim(), status)
    }

    pub fn config(&self, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.paths, action)
    }
}

pub use crate::commands::config::ConfigAction;
pub use crate::commands::dashboard::DashboardSummary;
pub use crate::commands::jobs::JobFilter;
pub use crate::commands::{ApplicationView, BoardPaths, CmdMessage, CmdResult, MessageLevel};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fixtures::BoardFixture;
    use crate::config::BoardConfig;
    use crate::error::BoardError;
    use crate::store::mem_backend::MemBackend;
    use std::path::PathBuf;

    fn make_api() -> JobBoardApi<MemBackend> {
        let board = Board::open(MemBackend::new(), BoardConfig::default()).unwrap();
        JobBoardApi::new(
            board,
            BoardPaths {
                data_dir: PathBuf::from("/tmp/unused"),
            },
        )
    }

    #[test]
    fn test_register_signs_in() {
        let mut api = make_api();
        api.register("Ada", "ada@example.com", "pw").unwrap();
        let me = api.whoami().unwrap();
        assert_eq!(me.user.unwrap().email, "ada@example.com");
    }

    #[test]
    fn test_ids_are_trimmed() {
        let mut api = make_api();
        api.register("Ada", "ada@example.com", "pw").unwrap();
        let job = api
            .post_job(BoardFixture::sample_job("Dev"))
            .unwrap()
            .jobs
            .remove(0);

        let shown = api.show_job(&format!("  {} ", job.id)).unwrap();
        assert_eq!(shown.jobs[0].id, job.id);
    }

    #[test]
    fn test_set_status_parses_name() {
        let mut api = make_api();
        api.register("Ada", "ada@example.com", "pw").unwrap();
        assert!(matches!(
            api.set_status("app_x", "hired"),
            Err(BoardError::Validation(_))
        ));

        assert!(matches!(
            api.set_status("app_x", "Accepted"),
            Err(BoardError::ApplicationNotFound(_))
        ));
    }

    #[test]
    fn test_list_jobs_dispatches_filter() {
        let mut api = make_api();
        api.register("Ada", "ada@example.com", "pw").unwrap();
        api.post_job(BoardFixture::sample_job("Rust Dev")).unwrap();
        api.post_job(BoardFixture::sample_job("Go Dev")).unwrap();

        let filter = JobFilter {
            search: Some("rust".into()),
            ..Default::default()
        };
        let listed = api.list_jobs(&filter).unwrap();
        assert_eq!(listed.jobs.len(), 1);
        assert_eq!(listed.jobs[0].title, "Rust Dev");
    }

    #[test]
    fn test_dashboard_counts_own_postings() {
        let mut api = make_api();
        assert!(matches!(api.dashboard(), Err(BoardError::NotAuthenticated)));

        api.register("Ada", "ada@example.com", "pw").unwrap();
        api.post_job(BoardFixture::sample_job("Dev")).unwrap();
        let result = api.dashboard().unwrap();
        assert_eq!(result.user.unwrap().name, "Ada");
        assert_eq!(result.summary.unwrap().jobs_posted, 1);
        assert_eq!(result.jobs.len(), 1);
    }
}
