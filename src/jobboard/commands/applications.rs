use crate::board::Board;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{BoardError, Result};
use crate::model::{ApplicationRequest, ApplicationStatus};
use crate::store::StorageBackend;

use super::helpers::view_application;

/// Applies to a job as the signed-in user with one of their own documents.
pub fn apply<B: StorageBackend>(
    board: &mut Board<B>,
    job_id: &str,
    document_id: &str,
    cover_letter: Option<String>,
) -> Result<CmdResult> {
    let user = board.require_user()?;

    let job = board
        .registry
        .get_job(job_id)
        .cloned()
        .ok_or_else(|| BoardError::JobNotFound(job_id.to_string()))?;
    if job.owner_id == user.id {
        return Err(BoardError::Validation(
            "You cannot apply to your own job posting".to_string(),
        ));
    }

    let owns_document = board
        .documents
        .get(document_id)
        .is_some_and(|doc| doc.owner_id == user.id);
    if !owns_document {
        return Err(BoardError::DocumentNotFound(document_id.to_string()));
    }

    let request =
        ApplicationRequest::new(job_id, &user, document_id).with_cover_letter(cover_letter);
    let application = board.registry.apply(request)?;
    let view = view_application(board, application);

    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!(
            "Applied to {} at {}",
            job.title, job.company
        )))
        .with_applications(vec![view]))
}

/// The signed-in user's applications, oldest first.
pub fn mine<B: StorageBackend>(board: &Board<B>) -> Result<CmdResult> {
    let user = board.require_user()?;
    let views = board
        .registry
        .list_applications_by_applicant(&user.id)
        .into_iter()
        .map(|app| view_application(board, app))
        .collect();
    Ok(CmdResult::default().with_applications(views))
}

/// Applications received for a job. Empty unless the signed-in user owns it.
pub fn for_job<B: StorageBackend>(board: &Board<B>, job_id: &str) -> Result<CmdResult> {
    let user = board.require_user()?;
    let views = board
        .registry
        .list_applications_for_job(job_id, &user.id)
        .into_iter()
        .map(|app| view_application(board, app))
        .collect();
    Ok(CmdResult::default().with_applications(views))
}

fn ensure_application<B: StorageBackend>(board: &Board<B>, application_id: &str) -> Result<()> {
    match board.registry.get_application(application_id) {
        Some(_) => Ok(()),
        None => Err(BoardError::ApplicationNotFound(application_id.to_string())),
    }
}

pub fn withdraw<B: StorageBackend>(
    board: &mut Board<B>,
    application_id: &str,
) -> Result<CmdResult> {
    let user = board.require_user()?;
    ensure_application(board, application_id)?;
    let result = match board.registry.withdraw(application_id, &user.id)? {
        Some(app) => {
            let view = view_application(board, app);
            CmdResult::default()
                .with_message(CmdMessage::success("Application withdrawn"))
                .with_applications(vec![view])
        }
        None => CmdResult::default().with_message(CmdMessage::warning(
            "Nothing withdrawn: only your own pending applications can be withdrawn",
        )),
    };
    Ok(result)
}

pub fn set_status<B: StorageBackend>(
    board: &mut Board<B>,
    application_id: &str,
    status: ApplicationStatus,
) -> Result<CmdResult> {
    let user = board.require_user()?;
    ensure_application(board, application_id)?;
    let result = match board
        .registry
        .update_status(application_id, &user.id, status)?
    {
        Some(app) => {
            let view = view_application(board, app);
            CmdResult::default()
                .with_message(CmdMessage::success(format!(
                    "{}'s application is now {}",
                    view.application.applicant_name, status
                )))
                .with_applications(vec![view])
        }
        None => CmdResult::default().with_message(CmdMessage::warning(
            "Status unchanged: only the job's owner can update its applications",
        )),
    };
    Ok(result)
}
