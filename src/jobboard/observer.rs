//! Change notification for the stores.
//!
//! Presentation code subscribes a [`BoardObserver`] and re-reads whatever it
//! displays when notified. Stores notify only after the durable write for a
//! change has succeeded, so an observer never sees state that was not saved.

use crate::model::{Application, Document, JobPosting, User};
use log::trace;
use std::rc::Rc;

/// Receives notifications about committed store mutations.
///
/// All methods have default empty implementations so observers can choose which
/// events they care about.
pub trait BoardObserver {
    /// Sign in, registration (which signs in) and sign out. `None` means signed out.
    fn on_session_changed(&self, _user: Option<&User>) {}

    fn on_document_uploaded(&self, _document: &Document) {}

    fn on_document_deleted(&self, _document: &Document) {}

    fn on_job_created(&self, _job: &JobPosting) {}

    /// The job and every application that was removed with it.
    fn on_job_deleted(&self, _job: &JobPosting, _applications: &[Application]) {}

    fn on_application_submitted(&self, _application: &Application) {}

    fn on_application_withdrawn(&self, _application: &Application) {}

    fn on_application_status_changed(&self, _application: &Application) {}
}

/// An ordered list of subscribers. Observers are called in the order added.
#[derive(Default, Clone)]
pub struct Observers {
    observers: Vec<Rc<dyn BoardObserver>>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Rc<dyn BoardObserver>) {
        self.observers.push(observer);
    }

    /// Removes a previously subscribed observer (compared by pointer).
    /// Returns false if it was not subscribed.
    pub fn unsubscribe(&mut self, observer: &Rc<dyn BoardObserver>) -> bool {
        let before = self.observers.len();
        self.observers.retain(|existing| !Rc::ptr_eq(existing, observer));
        self.observers.len() != before
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn notify(&self, event: impl Fn(&dyn BoardObserver)) {
        trace!("notifying {} observer(s)", self.observers.len());
        for observer in &self.observers {
            event(observer.as_ref());
        }
    }
}

#[cfg(any(test, feature = "test_utils"))]
pub mod recording {
    use super::*;
    use std::cell::RefCell;

    /// Records every notification as a short string, e.g. `job_created:job_...`.
    #[derive(Default)]
    pub struct RecordingObserver {
        pub events: RefCell<Vec<String>>,
    }

    impl RecordingObserver {
        pub fn new() -> Rc<Self> {
            Rc::new(Self::default())
        }

        pub fn events(&self) -> Vec<String> {
            self.events.borrow().clone()
        }

        fn push(&self, event: String) {
            self.events.borrow_mut().push(event);
        }
    }

    impl BoardObserver for RecordingObserver {
        fn on_session_changed(&self, user: Option<&User>) {
            match user {
                Some(u) => self.push(format!("session:{}", u.id)),
                None => self.push("session:none".to_string()),
            }
        }

        fn on_document_uploaded(&self, document: &Document) {
            self.push(format!("document_uploaded:{}", document.id));
        }

        fn on_document_deleted(&self, document: &Document) {
            self.push(format!("document_deleted:{}", document.id));
        }

        fn on_job_created(&self, job: &JobPosting) {
            self.push(format!("job_created:{}", job.id));
        }

        fn on_job_deleted(&self, job: &JobPosting, applications: &[Application]) {
            self.push(format!("job_deleted:{}:{}", job.id, applications.len()));
        }

        fn on_application_submitted(&self, application: &Application) {
            self.push(format!("applied:{}", application.id));
        }

        fn on_application_withdrawn(&self, application: &Application) {
            self.push(format!("withdrawn:{}", application.id));
        }

        fn on_application_status_changed(&self, application: &Application) {
            self.push(format!("status:{}:{}", application.id, application.status));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::recording::RecordingObserver;
    use super::*;

    #[test]
    fn unsubscribe_stops_notifications() {
        let mut observers = Observers::new();
        let recorder = RecordingObserver::new();
        let handle: Rc<dyn BoardObserver> = recorder.clone();
        observers.subscribe(handle.clone());

        observers.notify(|o| o.on_session_changed(None));
        assert!(observers.unsubscribe(&handle));
        observers.notify(|o| o.on_session_changed(None));

        assert_eq!(recorder.events(), vec!["session:none".to_string()]);
        assert!(observers.is_empty());
    }
}
