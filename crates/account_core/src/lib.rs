//! Core domain logic for the account fixture lab.
//! Owns the `Account` model, its SQLite persistence, and the fake-data
//! factory used by tests and the CLI.

pub mod config;
pub mod db;
pub mod factory;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig, DatabaseTarget};
pub use factory::AccountFactory;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::account::{Account, AccountId, AccountValidationError};
pub use repo::account_repo::{AccountRepository, RepoError, RepoResult, SqliteAccountRepository};
pub use service::account_service::AccountService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
