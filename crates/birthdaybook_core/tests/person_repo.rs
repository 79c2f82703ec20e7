use birthdaybook_core::db::migrations::latest_version;
use birthdaybook_core::db::{open_db, open_db_in_memory, DbError};
use birthdaybook_core::{NewPerson, Person, PersonRepository, RepoError, SqlitePersonRepository};
use rusqlite::Connection;
use uuid::Uuid;

fn repo() -> SqlitePersonRepository {
    SqlitePersonRepository::try_new(open_db_in_memory().unwrap()).unwrap()
}

fn draft(name: &str, day: u8, month: u8) -> NewPerson {
    NewPerson::new(name, day, month).unwrap()
}

#[test]
fn create_assigns_id_and_round_trips() {
    let repo = repo();

    let created = repo.create_person(&draft("Ada", 10, 12)).unwrap();
    assert!(!created.id.is_nil());
    assert_eq!(created.name, "Ada");

    let loaded = repo.get_person(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn create_assigns_distinct_ids() {
    let repo = repo();
    let first = repo.create_person(&draft("Twin", 1, 5)).unwrap();
    let second = repo.create_person(&draft("Twin", 1, 5)).unwrap();
    assert_ne!(first.id, second.id);
    assert_eq!(repo.list_persons().unwrap().len(), 2);
}

#[test]
fn list_returns_creation_order() {
    let repo = repo();
    let a = repo.create_person(&draft("A", 1, 1)).unwrap();
    let b = repo.create_person(&draft("B", 2, 2)).unwrap();
    let c = repo.create_person(&draft("C", 3, 3)).unwrap();

    let ids = repo
        .list_persons()
        .unwrap()
        .into_iter()
        .map(|person| person.id)
        .collect::<Vec<_>>();
    assert_eq!(ids, [a.id, b.id, c.id]);
}

#[test]
fn update_replaces_all_fields() {
    let repo = repo();
    let created = repo.create_person(&draft("B", 1, 1)).unwrap();

    let changed = Person::with_id(created.id, "B2", 2, 1).unwrap();
    let updated = repo.update_person(&changed).unwrap();
    assert_eq!(updated, changed);
    assert_eq!(repo.get_person(created.id).unwrap(), Some(changed));
}

#[test]
fn update_unknown_id_returns_not_found() {
    let repo = repo();
    let ghost = Person::with_id(Uuid::new_v4(), "ghost", 5, 5).unwrap();

    let err = repo.update_person(&ghost).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == ghost.id));
}

#[test]
fn update_rejects_invalid_record_before_sql() {
    let repo = repo();
    let created = repo.create_person(&draft("B", 1, 1)).unwrap();

    let mut invalid = created.clone();
    invalid.day = 31;
    invalid.month = 2;
    let err = repo.update_person(&invalid).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert_eq!(repo.get_person(created.id).unwrap(), Some(created));
}

#[test]
fn create_rejects_invalid_draft() {
    let repo = repo();
    let invalid = NewPerson {
        name: "   ".to_string(),
        day: 1,
        month: 1,
    };
    assert!(matches!(
        repo.create_person(&invalid),
        Err(RepoError::Validation(_))
    ));
    assert!(repo.list_persons().unwrap().is_empty());
}

#[test]
fn delete_is_idempotent() {
    let repo = repo();
    let created = repo.create_person(&draft("gone", 3, 3)).unwrap();

    repo.delete_person(created.id).unwrap();
    repo.delete_person(created.id).unwrap();
    assert!(repo.get_person(created.id).unwrap().is_none());
}

#[test]
fn list_rejects_corrupted_rows() {
    let repo = repo();
    repo.connection()
        .execute(
            "INSERT INTO persons (uuid, name, day, month) VALUES ('not-a-uuid', 'x', 1, 1);",
            [],
        )
        .unwrap();

    assert!(matches!(
        repo.list_persons(),
        Err(RepoError::InvalidData(message)) if message.contains("persons.uuid")
    ));
}

#[test]
fn schema_checks_reject_range_violations() {
    let repo = repo();
    let result = repo.connection().execute(
        "INSERT INTO persons (uuid, name, day, month) VALUES (?1, 'x', 1, 13);",
        [Uuid::new_v4().to_string()],
    );
    assert!(result.is_err());
}

#[test]
fn try_new_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqlitePersonRepository::try_new(conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn try_new_rejects_missing_table_and_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();
    assert!(matches!(
        SqlitePersonRepository::try_new(conn),
        Err(RepoError::MissingRequiredTable("persons"))
    ));

    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE persons (
            uuid TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            day INTEGER NOT NULL,
            month INTEGER NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();
    assert!(matches!(
        SqlitePersonRepository::try_new(conn),
        Err(RepoError::MissingRequiredColumn {
            table: "persons",
            column: "created_at"
        })
    ));
}

#[test]
fn reopening_file_database_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("birthdaybook.db");

    let created = {
        let repo = SqlitePersonRepository::try_new(open_db(&path).unwrap()).unwrap();
        repo.create_person(&draft("Kept", 9, 9)).unwrap()
    };

    let repo = SqlitePersonRepository::try_new(open_db(&path).unwrap()).unwrap();
    assert_eq!(repo.list_persons().unwrap(), [created]);
}

#[test]
fn opening_newer_schema_version_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}
