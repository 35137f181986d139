//! Account domain model.
//!
//! # Responsibility
//! - Define the single persisted `Account` record.
//! - Provide the dictionary mapping used by fixtures and CLI output.
//!
//! # Invariants
//! - `id` is assigned by storage and never read from a dictionary.
//! - `name` is non-empty; `name` and `email` fit 64 chars, `phone_number` 32.
//! - `to_dict` followed by `from_dict` restores every non-identifier field.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned row identifier.
pub type AccountId = i64;

pub const NAME_MAX_CHARS: usize = 64;
pub const EMAIL_MAX_CHARS: usize = 64;
pub const PHONE_MAX_CHARS: usize = 32;

/// Text form of `date_joined` in dictionaries and storage.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Validation failures for account state and dictionary input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    /// Operation requires a persisted account but `id` is `None`.
    MissingId { operation: &'static str },
    EmptyName,
    FieldTooLong {
        field: &'static str,
        max_chars: usize,
        actual_chars: usize,
    },
    InvalidEmail(String),
    /// Dictionary input carried an unknown key or a value of the wrong type.
    InvalidField { field: String, reason: String },
}

impl Display for AccountValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingId { operation } => {
                write!(f, "{operation} called with empty id field")
            }
            Self::EmptyName => write!(f, "account name cannot be empty"),
            Self::FieldTooLong {
                field,
                max_chars,
                actual_chars,
            } => write!(
                f,
                "{field} is {actual_chars} chars long; at most {max_chars} allowed"
            ),
            Self::InvalidEmail(email) => write!(f, "invalid email address `{email}`"),
            Self::InvalidField { field, reason } => {
                write!(f, "invalid account field `{field}`: {reason}")
            }
        }
    }
}

impl Error for AccountValidationError {}

/// Customer account persisted in the `accounts` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// `None` until the account has been created in storage.
    pub id: Option<AccountId>,
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub disabled: bool,
    /// Serialized as `YYYY-MM-DD`.
    pub date_joined: NaiveDate,
}

impl Account {
    /// Creates an unsaved, enabled account that joined today (UTC).
    ///
    /// Does not validate; persistence paths call `validate()`.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
            phone_number: None,
            disabled: false,
            date_joined: Utc::now().date_naive(),
        }
    }

    /// Returns whether storage has assigned an id.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Returns the id or the `MissingId` error for `operation`.
    pub fn require_id(&self, operation: &'static str) -> Result<AccountId, AccountValidationError> {
        self.id.ok_or(AccountValidationError::MissingId { operation })
    }

    /// Checks column limits and basic email shape.
    pub fn validate(&self) -> Result<(), AccountValidationError> {
        if self.name.trim().is_empty() {
            return Err(AccountValidationError::EmptyName);
        }
        check_length("name", &self.name, NAME_MAX_CHARS)?;
        check_length("email", &self.email, EMAIL_MAX_CHARS)?;
        if let Some(phone_number) = self.phone_number.as_deref() {
            check_length("phone_number", phone_number, PHONE_MAX_CHARS)?;
        }

        match self.email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
            _ => Err(AccountValidationError::InvalidEmail(self.email.clone())),
        }
    }

    /// Serializes every attribute into a key-value map.
    ///
    /// `id` and `phone_number` map to `null` when unset.
    pub fn to_dict(&self) -> Map<String, Value> {
        let mut dict = Map::new();
        dict.insert("id".to_string(), self.id.map_or(Value::Null, Value::from));
        dict.insert("name".to_string(), Value::from(self.name.as_str()));
        dict.insert("email".to_string(), Value::from(self.email.as_str()));
        dict.insert(
            "phone_number".to_string(),
            self.phone_number
                .as_deref()
                .map_or(Value::Null, Value::from),
        );
        dict.insert("disabled".to_string(), Value::Bool(self.disabled));
        dict.insert(
            "date_joined".to_string(),
            Value::from(self.date_joined.format(DATE_FORMAT).to_string()),
        );
        dict
    }

    /// Assigns every non-identifier attribute present in `dict`.
    ///
    /// # Invariants
    /// - `id` in the dictionary is ignored.
    /// - On error `self` is left untouched.
    ///
    /// # Errors
    /// - `InvalidField` for unknown keys or mistyped values.
    /// - Any `validate()` failure of the resulting state.
    pub fn from_dict(&mut self, dict: &Map<String, Value>) -> Result<(), AccountValidationError> {
        let mut staged = self.clone();
        for (key, value) in dict {
            match key.as_str() {
                "id" => {}
                "name" => staged.name = string_field(key, value)?,
                "email" => staged.email = string_field(key, value)?,
                "phone_number" => {
                    staged.phone_number = match value {
                        Value::Null => None,
                        other => Some(string_field(key, other)?),
                    }
                }
                "disabled" => {
                    staged.disabled = value
                        .as_bool()
                        .ok_or_else(|| invalid_field(key, "expected a boolean"))?
                }
                "date_joined" => {
                    let text = string_field(key, value)?;
                    staged.date_joined = NaiveDate::parse_from_str(&text, DATE_FORMAT)
                        .map_err(|err| invalid_field(key, &format!("expected YYYY-MM-DD: {err}")))?;
                }
                _ => return Err(invalid_field(key, "unknown account field")),
            }
        }

        staged.validate()?;
        *self = staged;
        Ok(())
    }
}

impl TryFrom<&Map<String, Value>> for Account {
    type Error = AccountValidationError;

    /// Builds an unsaved account; `name` and `email` must be present.
    fn try_from(dict: &Map<String, Value>) -> Result<Self, Self::Error> {
        let mut account = Account::new(String::new(), String::new());
        account.from_dict(dict)?;
        Ok(account)
    }
}

impl Display for Account {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "<Account '{}'>", self.name)
    }
}

fn check_length(
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> Result<(), AccountValidationError> {
    let actual_chars = value.chars().count();
    if actual_chars > max_chars {
        return Err(AccountValidationError::FieldTooLong {
            field,
            max_chars,
            actual_chars,
        });
    }
    Ok(())
}

fn string_field(key: &str, value: &Value) -> Result<String, AccountValidationError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| invalid_field(key, "expected a string"))
}

fn invalid_field(key: &str, reason: &str) -> AccountValidationError {
    AccountValidationError::InvalidField {
        field: key.to_string(),
        reason: reason.to_string(),
    }
}
