//! # Jobboard Architecture
//!
//! Jobboard is a **UI-agnostic, local-first job board library**. Users register,
//! post job listings, keep CV documents and apply to each other's jobs. The
//! command-line binary is one client of the library, not the other way round.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (main.rs + args.rs)                              │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Form validation, session lookup, client-side filtering   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Stores (identity.rs, documents.rs, registry.rs)            │
//! │  - Own the state and its invariants                         │
//! │  - Persist, then swap memory, then notify observers         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - StorageBackend trait: one JSON document per key          │
//! │  - FsBackend (production), MemBackend (testing)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes Rust arguments and returns
//! `Result<CmdResult>`. It never writes to stdout/stderr and never exits the
//! process. Diagnostics go through the `log` facade.
//!
//! ## Authorization
//!
//! The registry takes the acting user's id explicitly. A caller who does not
//! own the thing they are changing gets a no-op (`Ok(None)`) or an empty list,
//! not an error. Commands turn those into warnings for display.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`board`]: The three stores bundled over one backend
//! - [`commands`]: Presentation-side logic for each command
//! - [`identity`]: Accounts and the session
//! - [`documents`]: Uploaded CVs and the upload policy
//! - [`registry`]: Job postings and applications
//! - [`observer`]: Change notification
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: Core data types
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod board;
pub mod commands;
pub mod config;
pub mod documents;
pub mod error;
pub mod identity;
pub mod model;
pub mod observer;
pub mod registry;
pub mod store;
