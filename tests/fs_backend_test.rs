use jobboard::board::Board;
use jobboard::config::BoardConfig;
use jobboard::documents::MIME_PDF;
use jobboard::model::{ApplicationRequest, NewJob};
use jobboard::store::backend::StorageBackend;
use jobboard::store::fs_backend::FsBackend;
use std::fs;
use tempfile::TempDir;

fn setup() -> (TempDir, FsBackend) {
    let dir = TempDir::new().unwrap();
    let backend = FsBackend::new(dir.path().join("data"));
    (dir, backend)
}

fn job(title: &str) -> NewJob {
    NewJob {
        title: title.to_string(),
        company: "Acme".to_string(),
        location: "Lisbon".to_string(),
        salary: String::new(),
        category: "Technology".to_string(),
        description: "Build things".to_string(),
        requirements: vec!["Rust".to_string()],
    }
}

#[test]
fn test_fs_backend_basic_entry_io() {
    let (_dir, backend) = setup();

    assert_eq!(backend.read_entry("jobs").unwrap(), None);
    backend.write_entry("jobs", "{}").unwrap();
    assert_eq!(backend.read_entry("jobs").unwrap(), Some("{}".to_string()));

    backend.remove_entry("jobs").unwrap();
    assert_eq!(backend.read_entry("jobs").unwrap(), None);
    // removing twice is fine
    backend.remove_entry("jobs").unwrap();
}

#[test]
fn test_fs_backend_atomic_write_artifacts() {
    let (_dir, backend) = setup();
    backend.write_entry("session", "null").unwrap();

    let expected = backend.root().join("session.json");
    assert_eq!(fs::read_to_string(&expected).unwrap(), "null");

    for entry in fs::read_dir(backend.root()).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_str().unwrap().to_string();
        assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
    }
}

#[test]
fn test_fs_backend_rejects_path_like_keys() {
    let (_dir, backend) = setup();
    assert!(backend.write_entry("../escape", "x").is_err());
    assert!(backend.read_entry("").is_err());
}

#[test]
fn test_board_state_survives_reopen_in_order() {
    let (_dir, backend) = setup();

    let mut board = Board::open(backend.clone(), BoardConfig::default()).unwrap();
    let alice = board
        .identity
        .register("Alice", "alice@example.com", "secret")
        .unwrap();
    let titles = ["Zeta", "Alpha", "Mu"];
    for title in titles {
        board.registry.create_job(&alice.id, job(title)).unwrap();
    }
    let first_job = board.registry.list_all()[0].id.clone();

    let bob = board
        .identity
        .register("Bob", "bob@example.com", "hunter2")
        .unwrap();
    let cv = board
        .documents
        .upload(&bob.id, b"%PDF-1.7", "bob.pdf", MIME_PDF, 8)
        .unwrap();
    board
        .registry
        .apply(ApplicationRequest::new(&first_job, &bob, &cv.id))
        .unwrap();
    drop(board);

    let reopened = Board::open(backend.clone(), BoardConfig::default()).unwrap();
    let listed: Vec<String> = reopened
        .registry
        .list_all()
        .into_iter()
        .map(|j| j.title)
        .collect();
    assert_eq!(listed, titles);
    assert_eq!(reopened.require_user().unwrap(), bob);
    assert!(reopened.registry.has_applied(&first_job, &bob.id));
    assert_eq!(
        reopened.documents.get(&cv.id).unwrap().decode_content().unwrap(),
        b"%PDF-1.7"
    );
}

#[test]
fn test_credentials_are_not_stored_in_plain_text() {
    let (_dir, backend) = setup();
    let mut board = Board::open(backend.clone(), BoardConfig::default()).unwrap();
    board
        .identity
        .register("Alice", "alice@example.com", "correct horse battery")
        .unwrap();

    let raw = fs::read_to_string(backend.root().join("users.json")).unwrap();
    assert!(raw.contains("alice@example.com"));
    assert!(!raw.contains("correct horse battery"));
    assert!(raw.contains("$argon2id$"));
}

#[test]
fn test_corrupt_session_is_discarded() {
    let (_dir, backend) = setup();
    backend.write_entry("session", "{not json").unwrap();

    let board = Board::open(backend.clone(), BoardConfig::default()).unwrap();
    assert!(!board.identity.is_authenticated());
}
