//! Domain model for the account fixture lab.
//!
//! # Responsibility
//! - Define the canonical `Account` record used by storage, factory and CLI.
//!
//! # Invariants
//! - Identity is storage-assigned; an unsaved account has `id = None`.

pub mod account;
