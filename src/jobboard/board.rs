use crate::config::BoardConfig;
use crate::documents::DocumentStore;
use crate::error::{BoardError, Result};
use crate::identity::IdentityStore;
use crate::model::User;
use crate::observer::BoardObserver;
use crate::registry::Registry;
use crate::store::StorageBackend;
use log::debug;
use std::rc::Rc;

/// One instance of each store over a shared backend.
///
/// Built once per process and handed to whatever presents it. The stores are
/// public so commands can reach them directly.
pub struct Board<B: StorageBackend> {
    pub identity: IdentityStore<B>,
    pub documents: DocumentStore<B>,
    pub registry: Registry<B>,
    pub config: BoardConfig,
}

impl<B: StorageBackend> Board<B> {
    pub fn open(backend: B, config: BoardConfig) -> Result<Self> {
        debug!("opening board at {}", backend.describe());
        Ok(Self {
            identity: IdentityStore::open(backend.clone())?,
            documents: DocumentStore::open_with_policy(backend.clone(), config.upload_policy())?,
            registry: Registry::open(backend)?,
            config,
        })
    }

    /// The signed-in user, or [`BoardError::NotAuthenticated`].
    pub fn require_user(&self) -> Result<User> {
        self.identity
            .current_user()
            .cloned()
            .ok_or(BoardError::NotAuthenticated)
    }

    /// Subscribe one observer to all three stores.
    pub fn subscribe(&mut self, observer: Rc<dyn BoardObserver>) {
        self.identity.subscribe(observer.clone());
        self.documents.subscribe(observer.clone());
        self.registry.subscribe(observer);
    }

    pub fn unsubscribe(&mut self, observer: &Rc<dyn BoardObserver>) {
        self.identity.unsubscribe(observer);
        self.documents.unsubscribe(observer);
        self.registry.unsubscribe(observer);
    }
}

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::NewJob;
    use crate::store::mem_backend::MemBackend;

    /// A board over a fresh memory backend, with helpers to sign in as
    /// different people.
    pub struct BoardFixture {
        pub backend: MemBackend,
        pub board: Board<MemBackend>,
    }

    impl Default for BoardFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl BoardFixture {
        pub fn new() -> Self {
            let backend = MemBackend::new();
            let board = Board::open(backend.clone(), BoardConfig::default()).unwrap();
            Self { backend, board }
        }

        /// Registers (and signs in) `name` with email `<name>@example.com`.
        pub fn register(&mut self, name: &str) -> User {
            self.board
                .identity
                .register(name, &format!("{}@example.com", name.to_lowercase()), "pw")
                .unwrap()
        }

        pub fn sign_in(&mut self, user: &User) {
            self.board.identity.login(&user.email, "pw").unwrap();
        }

        pub fn sample_job(title: &str) -> NewJob {
            NewJob {
                title: title.to_string(),
                company: "Acme".to_string(),
                location: "Berlin".to_string(),
                salary: "€70k".to_string(),
                category: "Technology".to_string(),
                description: "Ship software and review code".to_string(),
                requirements: vec!["Rust".to_string(), "Kindness".to_string()],
            }
        }

        /// Reopens a board over the same backend, as a new process would.
        pub fn reopen(&self) -> Board<MemBackend> {
            Board::open(self.backend.clone(), BoardConfig::default()).unwrap()
        }
    }
}
