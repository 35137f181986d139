use account_core::{Account, AccountFactory, AccountValidationError};
use chrono::NaiveDate;
use serde_json::{json, Value};

#[test]
fn account_new_sets_defaults() {
    let account = Account::new("Ada Lovelace", "ada@example.com");

    assert_eq!(account.id, None);
    assert!(!account.is_persisted());
    assert_eq!(account.phone_number, None);
    assert!(!account.disabled);
    account.validate().unwrap();
}

#[test]
fn to_dict_exposes_every_attribute() {
    let mut account = Account::new("Foo", "foo@example.com");
    account.id = Some(12);
    account.phone_number = Some("555-0100".to_string());
    account.disabled = true;
    account.date_joined = NaiveDate::from_ymd_opt(2021, 3, 14).unwrap();

    let dict = account.to_dict();
    assert_eq!(dict.len(), 6);
    assert_eq!(dict["id"], json!(12));
    assert_eq!(dict["name"], json!("Foo"));
    assert_eq!(dict["email"], json!("foo@example.com"));
    assert_eq!(dict["phone_number"], json!("555-0100"));
    assert_eq!(dict["disabled"], json!(true));
    assert_eq!(dict["date_joined"], json!("2021-03-14"));
}

#[test]
fn to_dict_maps_unset_values_to_null() {
    let dict = Account::new("Foo", "foo@example.com").to_dict();
    assert_eq!(dict["id"], Value::Null);
    assert_eq!(dict["phone_number"], Value::Null);
}

#[test]
fn from_dict_restores_generated_accounts() {
    let mut factory = AccountFactory::seeded(2024);
    for original in factory.build_batch(25) {
        let dict = original.to_dict();

        let mut restored = Account::new("placeholder", "placeholder@example.com");
        restored.from_dict(&dict).unwrap();

        assert_eq!(restored.name, original.name);
        assert_eq!(restored.email, original.email);
        assert_eq!(restored.phone_number, original.phone_number);
        assert_eq!(restored.disabled, original.disabled);
        assert_eq!(restored.date_joined, original.date_joined);
    }
}

#[test]
fn from_dict_never_assigns_id() {
    let mut account = Account::new("Foo", "foo@example.com");
    account.id = Some(3);

    let dict = json!({ "id": 99, "name": "Bar" });
    account.from_dict(dict.as_object().unwrap()).unwrap();

    assert_eq!(account.id, Some(3));
    assert_eq!(account.name, "Bar");
}

#[test]
fn from_dict_rejects_bad_input_without_mutation() {
    let mut account = Account::new("Foo", "foo@example.com");
    let before = account.clone();

    let dict = json!({ "name": "Bar", "disabled": "yes" });
    let err = account.from_dict(dict.as_object().unwrap()).unwrap_err();
    assert!(matches!(
        err,
        AccountValidationError::InvalidField { ref field, .. } if field == "disabled"
    ));
    assert_eq!(account, before);

    let dict = json!({ "nickname": "Bar" });
    let err = account.from_dict(dict.as_object().unwrap()).unwrap_err();
    assert!(matches!(err, AccountValidationError::InvalidField { .. }));

    let dict = json!({ "date_joined": "14/03/2021" });
    let err = account.from_dict(dict.as_object().unwrap()).unwrap_err();
    assert!(matches!(err, AccountValidationError::InvalidField { .. }));

    let dict = json!({ "email": "not-an-email" });
    let err = account.from_dict(dict.as_object().unwrap()).unwrap_err();
    assert_eq!(
        err,
        AccountValidationError::InvalidEmail("not-an-email".to_string())
    );
    assert_eq!(account, before);
}

#[test]
fn try_from_dict_requires_name_and_email() {
    let dict = json!({ "name": "Foo", "email": "foo@example.com", "phone_number": null });
    let account = Account::try_from(dict.as_object().unwrap()).unwrap();
    assert_eq!(account.id, None);
    assert_eq!(account.name, "Foo");

    let dict = json!({ "email": "foo@example.com" });
    let err = Account::try_from(dict.as_object().unwrap()).unwrap_err();
    assert_eq!(err, AccountValidationError::EmptyName);
}

#[test]
fn validate_enforces_column_limits() {
    let mut account = Account::new("Foo", "foo@example.com");
    account.phone_number = Some("1".repeat(33));
    assert_eq!(
        account.validate().unwrap_err(),
        AccountValidationError::FieldTooLong {
            field: "phone_number",
            max_chars: 32,
            actual_chars: 33,
        }
    );

    let account = Account::new("   ", "foo@example.com");
    assert_eq!(account.validate().unwrap_err(), AccountValidationError::EmptyName);
}

#[test]
fn serde_uses_plain_field_names_and_iso_dates() {
    let mut account = Account::new("Foo", "foo@example.com");
    account.date_joined = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();

    let value = serde_json::to_value(&account).unwrap();
    assert_eq!(value["date_joined"], "2020-01-02");
    assert_eq!(value["id"], Value::Null);

    let decoded: Account = serde_json::from_value(value).unwrap();
    assert_eq!(decoded, account);
}
