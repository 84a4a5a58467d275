use crate::board::Board;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{BoardError, Result};
use crate::model::Document;
use crate::store::StorageBackend;
use std::fs;
use std::path::{Path, PathBuf};

use super::helpers::{format_file_size, mime_for_path};

/// Uploads a file from disk as the signed-in user's CV.
pub fn upload<B: StorageBackend>(board: &mut Board<B>, path: &Path) -> Result<CmdResult> {
    let user = board.require_user()?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| BoardError::Validation(format!("Not a file: {}", path.display())))?
        .to_string();
    let mime_type = mime_for_path(path);
    let size = fs::metadata(path)?.len();

    // Reject before opening the file.
    board.documents.policy().check(mime_type, size)?;

    let file = fs::File::open(path)?;
    let document = board
        .documents
        .upload_from_reader(&user.id, file, &file_name, mime_type, size)?;

    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!(
            "Uploaded {} ({})",
            document.file_name,
            format_file_size(document.file_size)
        )))
        .with_documents(vec![document]))
}

pub fn list<B: StorageBackend>(board: &Board<B>) -> Result<CmdResult> {
    let user = board.require_user()?;
    Ok(CmdResult::default().with_documents(board.documents.list(&user.id)))
}

fn own_document<B: StorageBackend>(board: &Board<B>, document_id: &str) -> Result<Document> {
    let user = board.require_user()?;
    board
        .documents
        .get(document_id)
        .filter(|doc| doc.owner_id == user.id)
        .cloned()
        .ok_or_else(|| BoardError::DocumentNotFound(document_id.to_string()))
}

/// Deletes one of the signed-in user's documents. Applications that used it
/// keep their (now dangling) reference.
pub fn delete<B: StorageBackend>(board: &mut Board<B>, document_id: &str) -> Result<CmdResult> {
    let document = own_document(board, document_id)?;
    board.documents.delete(&document.id)?;
    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!(
            "Deleted {}",
            document.file_name
        )))
        .with_documents(vec![document]))
}

/// Writes a stored document back out. A directory target gets the original
/// file name.
pub fn export<B: StorageBackend>(
    board: &Board<B>,
    document_id: &str,
    target: &Path,
) -> Result<CmdResult> {
    let document = own_document(board, document_id)?;
    let bytes = document.decode_content()?;

    let out: PathBuf = if target.is_dir() {
        target.join(&document.file_name)
    } else {
        target.to_path_buf()
    };
    fs::write(&out, bytes)?;

    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!(
            "Exported {} to {}",
            document.file_name,
            out.display()
        )))
        .with_exported(out))
}
