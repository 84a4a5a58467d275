//! # Listing & Application Registry
//!
//! Owns job postings and the applications filed against them.
//!
//! ## Rules
//!
//! - One application per `(job, applicant)` pair.
//! - Only a job's owner may see its applications, change their status, or
//!   delete the job. Anyone else gets an empty list or a no-op, never an error.
//! - Deleting a job deletes every application filed against it.
//! - An applicant may withdraw (delete) their application only while it is
//!   `pending`.
//! - The owner may set any status, including back to `pending`.
//!
//! ## Commit Order
//!
//! Every mutation is computed on a copy of the maps and written to the backend
//! before it replaces the in-memory state, so memory never runs ahead of the
//! durable mirror. Job deletion touches two entries: applications are written
//! first, then jobs; if the jobs write fails the applications entry is put back.
//!
//! Lookups and the cascade are linear scans over the maps.

use crate::error::{BoardError, Result};
use crate::model::{new_id, Application, ApplicationRequest, ApplicationStatus, JobPosting, NewJob};
use crate::observer::{BoardObserver, Observers};
use crate::store::{self, Entry, StorageBackend};
use chrono::Utc;
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::rc::Rc;

/// What a successful `delete_job` took with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRemoval {
    pub job: JobPosting,
    pub applications: Vec<Application>,
}

pub struct Registry<B: StorageBackend> {
    backend: B,
    jobs: BTreeMap<String, JobPosting>,
    applications: BTreeMap<String, Application>,
    observers: Observers,
}

impl<B: StorageBackend> Registry<B> {
    pub fn open(backend: B) -> Result<Self> {
        let jobs: BTreeMap<String, JobPosting> = store::load_or_default(&backend, Entry::Jobs)?;
        let applications: BTreeMap<String, Application> =
            store::load_or_default(&backend, Entry::Applications)?;
        debug!(
            "registry opened: {} job(s), {} application(s)",
            jobs.len(),
            applications.len()
        );
        Ok(Self {
            backend,
            jobs,
            applications,
            observers: Observers::new(),
        })
    }

    pub fn subscribe(&mut self, observer: Rc<dyn BoardObserver>) {
        self.observers.subscribe(observer);
    }

    pub fn unsubscribe(&mut self, observer: &Rc<dyn BoardObserver>) -> bool {
        self.observers.unsubscribe(observer)
    }

    // --- Jobs ---

    /// Posts a job for `owner_id`. Field contents are the caller's business.
    pub fn create_job(&mut self, owner_id: &str, fields: NewJob) -> Result<JobPosting> {
        let job = JobPosting::new(owner_id, fields);

        let mut jobs = self.jobs.clone();
        jobs.insert(job.id.clone(), job.clone());
        store::save(&self.backend, Entry::Jobs, &jobs)?;
        self.jobs = jobs;

        info!("{} posted job {} ({})", owner_id, job.id, job.title);
        self.observers.notify(|o| o.on_job_created(&job));
        Ok(job)
    }

    /// All jobs, oldest first.
    pub fn list_all(&self) -> Vec<JobPosting> {
        self.jobs.values().cloned().collect()
    }

    pub fn list_by_owner(&self, owner_id: &str) -> Vec<JobPosting> {
        self.jobs
            .values()
            .filter(|job| job.owner_id == owner_id)
            .cloned()
            .collect()
    }

    pub fn get_job(&self, job_id: &str) -> Option<&JobPosting> {
        self.jobs.get(job_id)
    }

    /// Removes the job and all of its applications, if `caller_id` owns it.
    /// Returns `Ok(None)` for unknown jobs and for anyone but the owner.
    pub fn delete_job(&mut self, job_id: &str, caller_id: &str) -> Result<Option<JobRemoval>> {
        let owned = self
            .jobs
            .get(job_id)
            .is_some_and(|job| job.owner_id == caller_id);
        if !owned {
            debug!("delete_job({}) by {} ignored", job_id, caller_id);
            return Ok(None);
        }

        let mut jobs = self.jobs.clone();
        let mut applications = self.applications.clone();
        let Some(job) = jobs.remove(job_id) else {
            return Ok(None);
        };
        let removed: Vec<Application> = self
            .applications
            .values()
            .filter(|app| app.job_id == job_id)
            .cloned()
            .collect();
        applications.retain(|_, app| app.job_id != job_id);

        store::save(&self.backend, Entry::Applications, &applications)?;
        if let Err(e) = store::save(&self.backend, Entry::Jobs, &jobs) {
            let restored = store::save(&self.backend, Entry::Applications, &self.applications);
            if let Err(restore) = restored {
                warn!(
                    "could not restore applications after failed delete of {}: {}",
                    job_id, restore
                );
            }
            return Err(e);
        }
        self.jobs = jobs;
        self.applications = applications;

        info!(
            "deleted job {} and {} application(s)",
            job.id,
            removed.len()
        );
        self.observers.notify(|o| o.on_job_deleted(&job, &removed));
        Ok(Some(JobRemoval {
            job,
            applications: removed,
        }))
    }

    // --- Applications ---

    pub fn has_applied(&self, job_id: &str, applicant_id: &str) -> bool {
        self.applications
            .values()
            .any(|app| app.job_id == job_id && app.applicant_id == applicant_id)
    }

    /// Files a `pending` application.
    ///
    /// Fails with [`BoardError::JobNotFound`] for unknown jobs and
    /// [`BoardError::DuplicateApplication`] if this applicant already applied.
    /// The document id is not checked here; it is a weak reference.
    pub fn apply(&mut self, request: ApplicationRequest) -> Result<Application> {
        if !self.jobs.contains_key(&request.job_id) {
            return Err(BoardError::JobNotFound(request.job_id));
        }
        if self.has_applied(&request.job_id, &request.applicant_id) {
            return Err(BoardError::DuplicateApplication {
                job_id: request.job_id,
            });
        }

        let application = Application {
            id: new_id("app"),
            job_id: request.job_id,
            applicant_id: request.applicant_id,
            applicant_name: request.applicant_name,
            applicant_email: request.applicant_email,
            document_id: request.document_id,
            cover_letter: request.cover_letter,
            status: ApplicationStatus::Pending,
            application_date: Utc::now(),
        };

        let mut applications = self.applications.clone();
        applications.insert(application.id.clone(), application.clone());
        store::save(&self.backend, Entry::Applications, &applications)?;
        self.applications = applications;

        info!(
            "{} applied to {} ({})",
            application.applicant_id, application.job_id, application.id
        );
        self.observers.notify(|o| o.on_application_submitted(&application));
        Ok(application)
    }

    /// Applications for a job, visible only to the job's owner. Everyone else,
    /// including callers asking about unknown jobs, gets an empty list.
    pub fn list_applications_for_job(&self, job_id: &str, caller_id: &str) -> Vec<Application> {
        match self.jobs.get(job_id) {
            Some(job) if job.owner_id == caller_id => self
                .applications
                .values()
                .filter(|app| app.job_id == job_id)
                .cloned()
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn list_applications_by_applicant(&self, applicant_id: &str) -> Vec<Application> {
        self.applications
            .values()
            .filter(|app| app.applicant_id == applicant_id)
            .cloned()
            .collect()
    }

    pub fn get_application(&self, application_id: &str) -> Option<&Application> {
        self.applications.get(application_id)
    }

    /// Deletes the application if `caller_id` filed it and it is still
    /// `pending`. Anything else is a no-op returning `Ok(None)`.
    pub fn withdraw(
        &mut self,
        application_id: &str,
        caller_id: &str,
    ) -> Result<Option<Application>> {
        let allowed = self.applications.get(application_id).is_some_and(|app| {
            app.applicant_id == caller_id && app.status == ApplicationStatus::Pending
        });
        if !allowed {
            debug!("withdraw({}) by {} ignored", application_id, caller_id);
            return Ok(None);
        }

        let mut applications = self.applications.clone();
        let removed = applications.remove(application_id);
        store::save(&self.backend, Entry::Applications, &applications)?;
        self.applications = applications;

        if let Some(application) = &removed {
            info!("{} withdrew {}", caller_id, application.id);
            self.observers.notify(|o| o.on_application_withdrawn(application));
        }
        Ok(removed)
    }

    /// Sets the status if `caller_id` owns the job the application is for.
    /// Anything else is a no-op returning `Ok(None)`.
    pub fn update_status(
        &mut self,
        application_id: &str,
        caller_id: &str,
        status: ApplicationStatus,
    ) -> Result<Option<Application>> {
        let Some(current) = self.applications.get(application_id) else {
            return Ok(None);
        };
        let owns_job = self
            .jobs
            .get(&current.job_id)
            .is_some_and(|job| job.owner_id == caller_id);
        if !owns_job {
            debug!(
                "update_status({}) by {} ignored: not the job owner",
                application_id, caller_id
            );
            return Ok(None);
        }

        let mut updated = current.clone();
        updated.status = status;
        let mut applications = self.applications.clone();
        applications.insert(updated.id.clone(), updated.clone());
        store::save(&self.backend, Entry::Applications, &applications)?;
        self.applications = applications;

        info!("{} set {} to {}", caller_id, updated.id, updated.status);
        self.observers.notify(|o| o.on_application_status_changed(&updated));
        Ok(Some(updated))
    }
}
