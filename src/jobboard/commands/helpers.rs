use crate::board::Board;
use crate::commands::ApplicationView;
use crate::documents::{MIME_DOCX, MIME_PDF};
use crate::error::{BoardError, Result};
use crate::model::Application;
use crate::store::StorageBackend;
use std::path::Path;

/// Shown for applications whose document has since been deleted.
pub const MISSING_DOCUMENT_LABEL: &str = "CV Document";

/// `512 B`, `1.50 KB`, `2.00 MB`
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    }
}

/// MIME type from a file extension. Unknown extensions map to
/// `application/octet-stream`, which the upload policy then rejects.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("pdf") => MIME_PDF,
        Some("docx") => MIME_DOCX,
        Some("doc") => "application/msword",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Empty (after trimming) becomes a validation error naming the field.
pub fn require_field(name: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BoardError::Validation(format!("{} is required", name)));
    }
    Ok(trimmed.to_string())
}

pub fn view_application<B: StorageBackend>(
    board: &Board<B>,
    application: Application,
) -> ApplicationView {
    let job = board.registry.get_job(&application.job_id).cloned();
    let document_label = board
        .documents
        .get(&application.document_id)
        .map(|doc| doc.file_name.clone())
        .unwrap_or_else(|| MISSING_DOCUMENT_LABEL.to_string());
    ApplicationView {
        application,
        job,
        document_label,
    }
}
