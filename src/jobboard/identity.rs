//! # Identity Store
//!
//! Owns the account table and the current session.
//!
//! - Emails are unique, compared case-insensitively.
//! - Passwords are hashed with Argon2id before they are persisted; the plain
//!   password only ever lives on the stack of `register`/`login`.
//! - The session entry holds a [`User`] (never the credential record).
//!
//! There is exactly one signed-in user at a time, or none.

use crate::error::{BoardError, Result};
use crate::model::{new_id, CredentialRecord, User};
use crate::observer::{BoardObserver, Observers};
use crate::store::{self, Entry, StorageBackend};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::rc::Rc;

pub struct IdentityStore<B: StorageBackend> {
    backend: B,
    users: BTreeMap<String, CredentialRecord>,
    session: Option<User>,
    observers: Observers,
}

impl<B: StorageBackend> IdentityStore<B> {
    /// Loads accounts and any saved session from the backend.
    ///
    /// A session entry that cannot be parsed is discarded rather than failing
    /// the whole board: the user simply has to sign in again.
    pub fn open(backend: B) -> Result<Self> {
        let users: BTreeMap<String, CredentialRecord> =
            store::load_or_default(&backend, Entry::Users)?;

        let session = match store::load::<User, _>(&backend, Entry::Session) {
            Ok(session) => session,
            Err(BoardError::Serialization(e)) => {
                warn!("discarding unreadable session entry: {}", e);
                backend.remove_entry(Entry::Session.key())?;
                None
            }
            Err(e) => return Err(e),
        };

        debug!(
            "identity store opened: {} account(s), session={:?}",
            users.len(),
            session.as_ref().map(|u| u.id.as_str())
        );

        Ok(Self {
            backend,
            users,
            session,
            observers: Observers::new(),
        })
    }

    pub fn subscribe(&mut self, observer: Rc<dyn BoardObserver>) {
        self.observers.subscribe(observer);
    }

    pub fn unsubscribe(&mut self, observer: &Rc<dyn BoardObserver>) -> bool {
        self.observers.unsubscribe(observer)
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Any registered account by id, signed in or not.
    pub fn find_user(&self, id: &str) -> Option<User> {
        self.users.get(id).map(CredentialRecord::to_user)
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    fn find_by_email(&self, email: &str) -> Option<&CredentialRecord> {
        let wanted = email.to_lowercase();
        self.users
            .values()
            .find(|record| record.email.to_lowercase() == wanted)
    }

    /// Creates an account and signs it in.
    ///
    /// Fails with [`BoardError::EmailTaken`] if any account already uses the
    /// email, ignoring case. Nothing is written in that case.
    pub fn register(&mut self, name: &str, email: &str, password: &str) -> Result<User> {
        if self.find_by_email(email).is_some() {
            return Err(BoardError::EmailTaken(email.to_string()));
        }

        let record = CredentialRecord {
            id: new_id("user"),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: hash_password(password)?,
        };
        let user = record.to_user();

        let mut users = self.users.clone();
        users.insert(record.id.clone(), record);

        store::save(&self.backend, Entry::Users, &users)?;
        if let Err(e) = store::save(&self.backend, Entry::Session, &user) {
            if let Err(restore) = store::save(&self.backend, Entry::Users, &self.users) {
                warn!("could not restore account table after failed sign-in: {}", restore);
            }
            return Err(e);
        }

        self.users = users;
        self.session = Some(user.clone());
        info!("registered {} <{}>", user.id, user.email);
        self.observers.notify(|o| o.on_session_changed(self.session.as_ref()));
        Ok(user)
    }

    /// Signs in when the email (any case) and the password (exactly) match.
    pub fn login(&mut self, email: &str, password: &str) -> Result<User> {
        let record = self
            .find_by_email(email)
            .ok_or(BoardError::InvalidCredentials)?;
        verify_password(password, &record.password_hash)?;
        let user = record.to_user();

        store::save(&self.backend, Entry::Session, &user)?;
        self.session = Some(user.clone());
        info!("signed in as {}", user.id);
        self.observers.notify(|o| o.on_session_changed(self.session.as_ref()));
        Ok(user)
    }

    /// Ends the session. Signing out while signed out is fine.
    pub fn logout(&mut self) -> Result<()> {
        self.backend.remove_entry(Entry::Session.key())?;
        if let Some(user) = self.session.take() {
            info!("signed out {}", user.id);
            self.observers.notify(|o| o.on_session_changed(None));
        }
        Ok(())
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| BoardError::PasswordHash)
}

fn verify_password(password: &str, hash: &str) -> Result<()> {
    let parsed = PasswordHash::new(hash).map_err(|_| BoardError::InvalidCredentials)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| BoardError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::recording::RecordingObserver;
    use crate::store::mem_backend::MemBackend;

    fn open() -> (MemBackend, IdentityStore<MemBackend>) {
        let backend = MemBackend::new();
        let store = IdentityStore::open(backend.clone()).unwrap();
        (backend, store)
    }

    #[test]
    fn register_signs_in_and_persists_session() {
        let (backend, mut store) = open();
        let user = store.register("Ada", "ada@example.com", "s3cret").unwrap();

        assert!(store.is_authenticated());
        assert_eq!(store.current_user(), Some(&user));
        assert!(user.id.starts_with("user_"));

        let reopened = IdentityStore::open(backend).unwrap();
        assert_eq!(reopened.current_user(), Some(&user));
    }

    #[test]
    fn duplicate_email_is_rejected_ignoring_case() {
        let (backend, mut store) = open();
        store.register("Ada", "ada@example.com", "one").unwrap();
        let users_before = backend.raw("users");

        let err = store
            .register("Imposter", "ADA@Example.com", "two")
            .unwrap_err();
        assert!(matches!(err, BoardError::EmailTaken(_)));
        assert_eq!(store.user_count(), 1);
        assert_eq!(backend.raw("users"), users_before);
    }

    #[test]
    fn login_requires_exact_password_but_any_email_case() {
        let (_backend, mut store) = open();
        let user = store.register("Ada", "ada@example.com", "Secret").unwrap();
        store.logout().unwrap();

        assert!(matches!(
            store.login("ada@example.com", "secret"),
            Err(BoardError::InvalidCredentials)
        ));
        assert!(matches!(
            store.login("nobody@example.com", "Secret"),
            Err(BoardError::InvalidCredentials)
        ));
        assert!(!store.is_authenticated());

        let signed_in = store.login("ADA@EXAMPLE.COM", "Secret").unwrap();
        assert_eq!(signed_in, user);
    }

    #[test]
    fn logout_clears_durable_session() {
        let (backend, mut store) = open();
        store.register("Ada", "ada@example.com", "pw").unwrap();
        store.logout().unwrap();

        assert!(store.current_user().is_none());
        assert!(backend.raw("session").is_none());
        // twice is fine
        store.logout().unwrap();
    }

    #[test]
    fn stored_credentials_are_hashed() {
        let (backend, mut store) = open();
        store
            .register("Ada", "ada@example.com", "plain-text-password")
            .unwrap();
        let raw = backend.raw("users").unwrap();
        assert!(!raw.contains("plain-text-password"));
        assert!(raw.contains("$argon2"));
        assert!(!backend.raw("session").unwrap().contains("password"));
    }

    #[test]
    fn failed_write_leaves_store_signed_out() {
        let (backend, mut store) = open();
        backend.fail_writes_to("session");

        assert!(store.register("Ada", "ada@example.com", "pw").is_err());
        assert!(!store.is_authenticated());
        assert_eq!(store.user_count(), 0);
        assert!(backend.raw("users").map_or(true, |raw| !raw.contains("ada@")));
    }

    #[test]
    fn unreadable_session_is_discarded() {
        let backend = MemBackend::new();
        backend.write_entry("session", "{broken").unwrap();

        let store = IdentityStore::open(backend.clone()).unwrap();
        assert!(!store.is_authenticated());
        assert!(backend.raw("session").is_none());
    }

    #[test]
    fn observers_see_session_changes() {
        let (_backend, mut store) = open();
        let recorder = RecordingObserver::new();
        store.subscribe(recorder.clone());

        let user = store.register("Ada", "ada@example.com", "pw").unwrap();
        store.logout().unwrap();

        assert_eq!(
            recorder.events(),
            vec![format!("session:{}", user.id), "session:none".to_string()]
        );
    }

    #[test]
    fn find_user_sees_every_account() {
        let (_backend, mut store) = open();
        let ada = store.register("Ada", "ada@example.com", "pw").unwrap();
        let bob = store.register("Bob", "bob@example.com", "pw").unwrap();

        assert_eq!(store.current_user(), Some(&bob));
        assert_eq!(store.find_user(&ada.id), Some(ada));
        assert_eq!(store.find_user("user_missing"), None);
    }
}
