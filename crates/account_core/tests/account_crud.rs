use account_core::db::{open_db, open_db_in_memory, truncate_accounts};
use account_core::db::migrations::latest_version;
use account_core::{
    Account, AccountFactory, AccountRepository, AccountService, AccountValidationError,
    RepoError, SqliteAccountRepository,
};
use rusqlite::Connection;

fn account_service(conn: &Connection) -> AccountService<SqliteAccountRepository<'_>> {
    AccountService::new(SqliteAccountRepository::try_new(conn).unwrap())
}

#[test]
fn create_all_accounts_lists_every_record() {
    let conn = open_db_in_memory().unwrap();
    let service = account_service(&conn);
    let mut factory = AccountFactory::new();

    for mut account in factory.build_batch(10) {
        service.create(&mut account).unwrap();
    }

    assert_eq!(service.all().unwrap().len(), 10);
    assert_eq!(service.count().unwrap(), 10);
}

#[test]
fn create_assigns_id_and_persists_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = account_service(&conn);
    let mut account = AccountFactory::seeded(1).build();

    let id = service.create(&mut account).unwrap();
    assert_eq!(account.id, Some(id));

    let loaded = service.find(id).unwrap().unwrap();
    assert_eq!(loaded, account);
}

#[test]
fn create_rejects_already_persisted_account() {
    let conn = open_db_in_memory().unwrap();
    let service = account_service(&conn);
    let mut account = AccountFactory::seeded(2).build();
    let id = service.create(&mut account).unwrap();

    let err = service.create(&mut account).unwrap_err();
    assert!(matches!(err, RepoError::AlreadyPersisted(existing) if existing == id));
    assert_eq!(service.count().unwrap(), 1);
}

#[test]
fn create_rejects_invalid_account() {
    let conn = open_db_in_memory().unwrap();
    let service = account_service(&conn);
    let mut account = Account::new("", "nobody@example.com");

    let err = service.create(&mut account).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(AccountValidationError::EmptyName)
    ));
    assert_eq!(account.id, None);
}

#[test]
fn update_an_account() {
    let conn = open_db_in_memory().unwrap();
    let service = account_service(&conn);
    let mut account = AccountFactory::seeded(3).build();
    service.create(&mut account).unwrap();

    account.name = "Renamed Person".to_string();
    account.disabled = !account.disabled;
    service.update(&account).unwrap();

    let loaded = service.find(account.id.unwrap()).unwrap().unwrap();
    assert_eq!(loaded.name, "Renamed Person");
    assert_eq!(loaded.disabled, account.disabled);
}

#[test]
fn invalid_id_on_update() {
    let conn = open_db_in_memory().unwrap();
    let service = account_service(&conn);
    let mut account = AccountFactory::seeded(4).build();
    service.create(&mut account).unwrap();

    account.id = None;
    let err = service.update(&account).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(AccountValidationError::MissingId { operation: "update" })
    ));
    assert_eq!(err.to_string(), "update called with empty id field");
}

#[test]
fn update_unknown_id_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = account_service(&conn);
    let mut account = AccountFactory::seeded(5).build();
    account.id = Some(404);

    let err = service.update(&account).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(404)));
}

#[test]
fn delete_an_account() {
    let conn = open_db_in_memory().unwrap();
    let service = account_service(&conn);
    let mut account = AccountFactory::seeded(6).build();
    service.create(&mut account).unwrap();
    assert_eq!(service.all().unwrap().len(), 1);

    service.delete(&account).unwrap();
    assert_eq!(service.all().unwrap().len(), 0);

    let err = service.delete(&account).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[test]
fn delete_unsaved_account_is_validation_error() {
    let conn = open_db_in_memory().unwrap();
    let service = account_service(&conn);
    let account = AccountFactory::seeded(7).build();

    let err = service.delete(&account).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(AccountValidationError::MissingId { operation: "delete" })
    ));
}

#[test]
fn find_missing_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let service = account_service(&conn);
    assert!(service.find(1).unwrap().is_none());
}

#[test]
fn all_is_ordered_by_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAccountRepository::try_new(&conn).unwrap();
    let created = AccountFactory::seeded(8).create_batch(&repo, 5).unwrap();

    let listed = repo.list_accounts().unwrap();
    let created_ids: Vec<_> = created.iter().map(|account| account.id).collect();
    let listed_ids: Vec<_> = listed.iter().map(|account| account.id).collect();
    assert_eq!(listed_ids, created_ids);
    assert!(listed_ids.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn truncate_resets_shared_database_between_scenarios() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_db(dir.path().join("accounts.db")).unwrap();
    let repo = SqliteAccountRepository::try_new(&conn).unwrap();
    let mut factory = AccountFactory::seeded(9);

    factory.create_batch(&repo, 3).unwrap();
    assert_eq!(truncate_accounts(&conn).unwrap(), 3);
    assert_eq!(repo.count_accounts().unwrap(), 0);

    let account = factory.create(&repo).unwrap();
    assert_eq!(repo.list_accounts().unwrap(), vec![account]);
}

#[test]
fn read_rejects_corrupted_rows() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO accounts (name, email, disabled, date_joined)
         VALUES ('Foo', 'foo@example.com', 0, 'yesterday');",
        [],
    )
    .unwrap();
    let repo = SqliteAccountRepository::try_new(&conn).unwrap();

    let err = repo.list_accounts().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn read_reports_rule_breaking_rows_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO accounts (id, name, email, disabled, date_joined)
         VALUES (1, '', 'foo@example.com', 0, '2020-01-01');
         INSERT INTO accounts (id, name, email, disabled, date_joined)
         VALUES (2, 'Foo', 'foo', 0, '2020-01-01');",
    )
    .unwrap();
    let repo = SqliteAccountRepository::try_new(&conn).unwrap();

    let err = repo.find_account(1).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(ref message) if message.contains("(id 1)")));
    assert_eq!(err.error_code(), "invalid_data");

    let err = repo.find_account(2).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));

    let err = repo.list_accounts().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteAccountRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE accounts (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteAccountRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "accounts",
            column: "phone_number"
        })
    ));
}
