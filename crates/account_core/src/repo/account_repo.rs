//! Account repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `accounts` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `Account::validate()` before SQL mutations.
//! - `update`/`delete` on an account without `id` fail with `MissingId`.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::account::{Account, AccountId, AccountValidationError, DATE_FORMAT};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ACCOUNT_SELECT_SQL: &str = "SELECT
    id,
    name,
    email,
    phone_number,
    disabled,
    date_joined
FROM accounts";

const ACCOUNT_COLUMNS: [&str; 6] = [
    "id",
    "name",
    "email",
    "phone_number",
    "disabled",
    "date_joined",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for account persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(AccountValidationError),
    Db(DbError),
    /// `create` was called on an account that already has an id.
    AlreadyPersisted(AccountId),
    NotFound(AccountId),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::AlreadyPersisted(id) => write!(f, "account already persisted with id {id}"),
            Self::NotFound(id) => write!(f, "account not found: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "account repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "account repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "account repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted account data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl RepoError {
    /// Stable machine-readable code for log lines; never carries field values.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(AccountValidationError::MissingId { .. }) => "missing_id",
            Self::Validation(_) => "validation_failed",
            Self::Db(_) => "db_error",
            Self::AlreadyPersisted(_) => "already_persisted",
            Self::NotFound(_) => "not_found",
            Self::UninitializedConnection { .. } => "uninitialized_connection",
            Self::MissingRequiredTable(_) | Self::MissingRequiredColumn { .. } => "schema_mismatch",
            Self::InvalidData(_) => "invalid_data",
        }
    }
}

impl From<AccountValidationError> for RepoError {
    fn from(value: AccountValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for account CRUD operations.
pub trait AccountRepository {
    /// Inserts an unsaved account and writes the assigned id back into it.
    fn create_account(&self, account: &mut Account) -> RepoResult<AccountId>;
    /// Persists every field of an existing account.
    fn update_account(&self, account: &Account) -> RepoResult<()>;
    /// Removes the row matching the account id.
    fn delete_account(&self, account: &Account) -> RepoResult<()>;
    fn find_account(&self, id: AccountId) -> RepoResult<Option<Account>>;
    /// Returns every account ordered by id.
    fn list_accounts(&self) -> RepoResult<Vec<Account>>;
    fn count_accounts(&self) -> RepoResult<u64>;
}

/// SQLite-backed account repository.
pub struct SqliteAccountRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAccountRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` for a foreign schema.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_account_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl AccountRepository for SqliteAccountRepository<'_> {
    fn create_account(&self, account: &mut Account) -> RepoResult<AccountId> {
        if let Some(id) = account.id {
            return Err(RepoError::AlreadyPersisted(id));
        }
        account.validate()?;

        self.conn.execute(
            "INSERT INTO accounts (
                name,
                email,
                phone_number,
                disabled,
                date_joined
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                account.name.as_str(),
                account.email.as_str(),
                account.phone_number.as_deref(),
                bool_to_int(account.disabled),
                date_to_db(account.date_joined),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        account.id = Some(id);
        Ok(id)
    }

    fn update_account(&self, account: &Account) -> RepoResult<()> {
        let id = account.require_id("update")?;
        account.validate()?;

        let changed = self.conn.execute(
            "UPDATE accounts
             SET
                name = ?1,
                email = ?2,
                phone_number = ?3,
                disabled = ?4,
                date_joined = ?5
             WHERE id = ?6;",
            params![
                account.name.as_str(),
                account.email.as_str(),
                account.phone_number.as_deref(),
                bool_to_int(account.disabled),
                date_to_db(account.date_joined),
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete_account(&self, account: &Account) -> RepoResult<()> {
        let id = account.require_id("delete")?;

        let changed = self
            .conn
            .execute("DELETE FROM accounts WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn find_account(&self, id: AccountId) -> RepoResult<Option<Account>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ACCOUNT_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_account_row(row)?));
        }

        Ok(None)
    }

    fn list_accounts(&self) -> RepoResult<Vec<Account>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ACCOUNT_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut accounts = Vec::new();

        while let Some(row) = rows.next()? {
            accounts.push(parse_account_row(row)?);
        }

        Ok(accounts)
    }

    fn count_accounts(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM accounts;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative account count {count}")))
    }
}

fn parse_account_row(row: &Row<'_>) -> RepoResult<Account> {
    let id: AccountId = row.get("id")?;

    let date_text: String = row.get("date_joined")?;
    let date_joined = parse_date(&date_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid date `{date_text}` in accounts.date_joined (id {id})"
        ))
    })?;

    let disabled = match row.get::<_, i64>("disabled")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid disabled value `{other}` in accounts.disabled (id {id})"
            )));
        }
    };

    let account = Account {
        id: Some(id),
        name: row.get("name")?,
        email: row.get("email")?,
        phone_number: row.get("phone_number")?,
        disabled,
        date_joined,
    };
    account
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("{err} (id {id})")))?;
    Ok(account)
}

fn ensure_account_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "accounts")? {
        return Err(RepoError::MissingRequiredTable("accounts"));
    }

    for column in ACCOUNT_COLUMNS {
        if !table_has_column(conn, "accounts", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "accounts",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn date_to_db(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

fn bool_to_int(value: bool) -> i64 {
    i64::from(value)
}
