//! Test-data factory for accounts.
//!
//! # Responsibility
//! - Generate schema-valid accounts with fake names, emails and phones.
//! - Replace static fixture files with data generated at test time.
//!
//! # Invariants
//! - Built accounts are unsaved (`id = None`) and pass `validate()`.
//! - A factory seeded with the same value yields the same sequence.

use crate::model::account::{Account, EMAIL_MAX_CHARS, NAME_MAX_CHARS, PHONE_MAX_CHARS};
use crate::repo::account_repo::{AccountRepository, RepoResult};
use chrono::{Duration, NaiveDate, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Upper bound for generated `date_joined` age.
const MAX_MEMBERSHIP_DAYS: i64 = 10 * 365;

/// Builds fake accounts from a private random stream.
pub struct AccountFactory {
    rng: StdRng,
}

impl AccountFactory {
    /// Creates a factory seeded from the OS.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Creates a deterministic factory.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Builds one unsaved account joined within the last ten years.
    pub fn build(&mut self) -> Account {
        let today = Utc::now().date_naive();
        self.build_relative_to(today)
    }

    /// Builds `count` unsaved accounts.
    pub fn build_batch(&mut self, count: usize) -> Vec<Account> {
        let today = Utc::now().date_naive();
        (0..count).map(|_| self.build_relative_to(today)).collect()
    }

    /// Builds one account and persists it through `repo`.
    pub fn create(&mut self, repo: &impl AccountRepository) -> RepoResult<Account> {
        let mut account = self.build();
        repo.create_account(&mut account)?;
        Ok(account)
    }

    /// Builds and persists `count` accounts, stopping at the first failure.
    pub fn create_batch(
        &mut self,
        repo: &impl AccountRepository,
        count: usize,
    ) -> RepoResult<Vec<Account>> {
        let mut accounts = self.build_batch(count);
        for account in &mut accounts {
            repo.create_account(account)?;
        }
        Ok(accounts)
    }

    fn build_relative_to(&mut self, today: NaiveDate) -> Account {
        let name = self.bounded(NAME_MAX_CHARS, |rng| Name().fake_with_rng(rng));
        let email = self.bounded(EMAIL_MAX_CHARS, |rng| SafeEmail().fake_with_rng(rng));
        let phone_number = self.bounded(PHONE_MAX_CHARS, |rng| PhoneNumber().fake_with_rng(rng));
        let days_ago = self.rng.random_range(0..=MAX_MEMBERSHIP_DAYS);

        Account {
            id: None,
            name,
            email,
            phone_number: Some(phone_number),
            disabled: self.rng.random_bool(0.5),
            date_joined: today - Duration::days(days_ago),
        }
    }

    /// Draws from `generate` until the value fits `max_chars`.
    fn bounded(&mut self, max_chars: usize, generate: impl Fn(&mut StdRng) -> String) -> String {
        loop {
            let value = generate(&mut self.rng);
            if !value.trim().is_empty() && value.chars().count() <= max_chars {
                return value;
            }
        }
    }
}

impl Default for AccountFactory {
    fn default() -> Self {
        Self::new()
    }
}
