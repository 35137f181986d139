//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define data access contracts for accounts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `Account::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`, `AlreadyPersisted`)
//!   in addition to DB transport errors.

pub mod account_repo;
