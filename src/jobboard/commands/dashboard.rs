use crate::board::Board;
use crate::commands::CmdResult;
use crate::error::Result;
use crate::store::StorageBackend;

/// How many of the user's own postings the dashboard lists.
pub const RECENT_JOBS: usize = 3;

/// Activity counts for the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub jobs_posted: usize,
    pub documents: usize,
    /// Applications received across all of the user's postings.
    pub applications_received: usize,
    pub applications_sent: usize,
}

/// Counts plus the user's most recent postings, newest first.
pub fn run<B: StorageBackend>(board: &Board<B>) -> Result<CmdResult> {
    let user = board.require_user()?;

    let own_jobs = board.registry.list_by_owner(&user.id);
    let applications_received = own_jobs
        .iter()
        .map(|job| board.registry.list_applications_for_job(&job.id, &user.id).len())
        .sum();

    let summary = DashboardSummary {
        jobs_posted: own_jobs.len(),
        documents: board.documents.list(&user.id).len(),
        applications_received,
        applications_sent: board.registry.list_applications_by_applicant(&user.id).len(),
    };
    let recent = own_jobs.into_iter().rev().take(RECENT_JOBS).collect();

    Ok(CmdResult::default()
        .with_user(user)
        .with_summary(summary)
        .with_jobs(recent))
}
