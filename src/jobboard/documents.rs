//! # Document Store
//!
//! Uploaded CVs, kept as base64 data URIs and scoped by owner. Deleting a
//! document does not touch applications that reference it; those fall back
//! to a placeholder label when displayed.

use crate::error::{BoardError, Result};
use crate::model::{new_id, Document};
use crate::observer::{BoardObserver, Observers};
use crate::store::{self, Entry, StorageBackend};
use chrono::Utc;
use log::{debug, info};
use std::collections::BTreeMap;
use std::io::Read;
use std::rc::Rc;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// 5 MiB
pub const DEFAULT_MAX_DOCUMENT_BYTES: u64 = 5 * 1024 * 1024;

/// Upload limits. Defaults accept PDF and DOCX up to 5 MiB.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    pub accepted_types: Vec<String>,
    pub max_bytes: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            accepted_types: vec![MIME_PDF.to_string(), MIME_DOCX.to_string()],
            max_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
        }
    }
}

impl UploadPolicy {
    /// Type first, then size.
    pub fn check(&self, mime_type: &str, size_bytes: u64) -> Result<()> {
        if !self.accepted_types.iter().any(|t| t == mime_type) {
            return Err(BoardError::UnsupportedType(mime_type.to_string()));
        }
        if size_bytes > self.max_bytes {
            return Err(BoardError::TooLarge {
                size: size_bytes,
                limit: self.max_bytes,
            });
        }
        Ok(())
    }
}

pub struct DocumentStore<B: StorageBackend> {
    backend: B,
    documents: BTreeMap<String, Document>,
    policy: UploadPolicy,
    observers: Observers,
}

impl<B: StorageBackend> DocumentStore<B> {
    pub fn open(backend: B) -> Result<Self> {
        Self::open_with_policy(backend, UploadPolicy::default())
    }

    pub fn open_with_policy(backend: B, policy: UploadPolicy) -> Result<Self> {
        let documents: BTreeMap<String, Document> =
            store::load_or_default(&backend, Entry::Documents)?;
        debug!("document store opened: {} document(s)", documents.len());
        Ok(Self {
            backend,
            documents,
            policy,
            observers: Observers::new(),
        })
    }

    pub fn subscribe(&mut self, observer: Rc<dyn BoardObserver>) {
        self.observers.subscribe(observer);
    }

    pub fn unsubscribe(&mut self, observer: &Rc<dyn BoardObserver>) -> bool {
        self.observers.unsubscribe(observer)
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Validates, encodes and stores a document for `owner_id`.
    ///
    /// `size_bytes` is the size the caller reports for the file and is what the
    /// limit is checked against.
    pub fn upload(
        &mut self,
        owner_id: &str,
        bytes: &[u8],
        file_name: &str,
        mime_type: &str,
        size_bytes: u64,
    ) -> Result<Document> {
        self.policy.check(mime_type, size_bytes)?;

        let document = Document {
            id: new_id("cv"),
            owner_id: owner_id.to_string(),
            file_name: file_name.to_string(),
            file_type: mime_type.to_string(),
            file_size: size_bytes,
            file_content: Document::encode_content(mime_type, bytes),
            upload_date: Utc::now(),
        };

        let mut documents = self.documents.clone();
        documents.insert(document.id.clone(), document.clone());
        store::save(&self.backend, Entry::Documents, &documents)?;
        self.documents = documents;

        info!(
            "uploaded {} ({}, {} bytes) for {}",
            document.id, document.file_name, document.file_size, owner_id
        );
        self.observers.notify(|o| o.on_document_uploaded(&document));
        Ok(document)
    }

    /// Reads the whole file before touching any state. A read error is
    /// returned as-is and nothing is stored.
    ///
    /// `size_bytes` only allows an early reject. The read stops one byte past
    /// the limit and the policy is checked again against what was actually
    /// read, which is also the size recorded on the document.
    pub fn upload_from_reader<R: Read>(
        &mut self,
        owner_id: &str,
        reader: R,
        file_name: &str,
        mime_type: &str,
        size_bytes: u64,
    ) -> Result<Document> {
        self.policy.check(mime_type, size_bytes)?;
        let mut bytes = Vec::new();
        reader
            .take(self.policy.max_bytes.saturating_add(1))
            .read_to_end(&mut bytes)?;
        let actual = bytes.len() as u64;
        if actual != size_bytes {
            debug!("{} reported {} bytes but read {}", file_name, size_bytes, actual);
        }
        self.upload(owner_id, &bytes, file_name, mime_type, actual)
    }

    /// The owner's documents, oldest first.
    pub fn list(&self, owner_id: &str) -> Vec<Document> {
        self.documents
            .values()
            .filter(|doc| doc.owner_id == owner_id)
            .cloned()
            .collect()
    }

    pub fn get(&self, document_id: &str) -> Option<&Document> {
        self.documents.get(document_id)
    }

    /// Removes a document regardless of owner; callers scope by owner through
    /// [`list`](Self::list). Unknown ids are a no-op returning `Ok(None)`.
    pub fn delete(&mut self, document_id: &str) -> Result<Option<Document>> {
        if !self.documents.contains_key(document_id) {
            return Ok(None);
        }

        let mut documents = self.documents.clone();
        let removed = documents.remove(document_id);
        store::save(&self.backend, Entry::Documents, &documents)?;
        self.documents = documents;

        if let Some(document) = &removed {
            info!("deleted document {}", document.id);
            self.observers.notify(|o| o.on_document_deleted(document));
        }
        Ok(removed)
    }
}
