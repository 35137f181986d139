//! Account use-case service.
//!
//! # Responsibility
//! - Expose the create/update/delete/find/all verbs for accounts.
//! - Emit metadata-only diagnostic events for each call.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Email and phone values are never logged.

use crate::model::account::{Account, AccountId};
use crate::repo::account_repo::{AccountRepository, RepoResult};
use log::{debug, info, warn};

/// Use-case service wrapper for account CRUD operations.
pub struct AccountService<R: AccountRepository> {
    repo: R,
}

impl<R: AccountRepository> AccountService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Persists a new account and assigns its id.
    pub fn create(&self, account: &mut Account) -> RepoResult<AccountId> {
        match self.repo.create_account(account) {
            Ok(id) => {
                info!("event=account_create module=service status=ok id={id}");
                Ok(id)
            }
            Err(err) => {
                warn!(
                    "event=account_create module=service status=error error_code={}",
                    err.error_code()
                );
                Err(err)
            }
        }
    }

    /// Saves mutated fields of a persisted account.
    ///
    /// Returns the `MissingId` validation error when `account.id` is `None`.
    pub fn update(&self, account: &Account) -> RepoResult<()> {
        let result = self.repo.update_account(account);
        log_outcome("account_update", account.id, &result);
        result
    }

    /// Removes a persisted account.
    pub fn delete(&self, account: &Account) -> RepoResult<()> {
        let result = self.repo.delete_account(account);
        log_outcome("account_delete", account.id, &result);
        result
    }

    /// Looks up one account; `None` when no row matches.
    pub fn find(&self, id: AccountId) -> RepoResult<Option<Account>> {
        debug!("event=account_find module=service status=start id={id}");
        self.repo.find_account(id)
    }

    /// Returns every stored account ordered by id.
    pub fn all(&self) -> RepoResult<Vec<Account>> {
        let accounts = self.repo.list_accounts()?;
        debug!(
            "event=account_list module=service status=ok count={}",
            accounts.len()
        );
        Ok(accounts)
    }

    pub fn count(&self) -> RepoResult<u64> {
        self.repo.count_accounts()
    }
}

fn log_outcome(event: &str, id: Option<AccountId>, result: &RepoResult<()>) {
    let id = id.map_or_else(|| "none".to_string(), |id| id.to_string());
    match result {
        Ok(()) => info!("event={event} module=service status=ok id={id}"),
        Err(err) => warn!(
            "event={event} module=service status=error id={id} error_code={}",
            err.error_code()
        ),
    }
}
