//! Person store contract and SQLite implementation.
//!
//! # Responsibility
//! - Define the CRUD contract the roster reconciles against.
//! - Provide a SQLite-backed authoritative store for local hosts and tests.
//!
//! # Invariants
//! - The store, never the caller, assigns `PersonId`s.
//! - Write paths validate before SQL mutations.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - Deleting an absent id succeeds.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::person::{NewPerson, Person, PersonId, PersonValidationError};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const PERSON_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    day,
    month
FROM persons";

const REQUIRED_PERSON_COLUMNS: &[&str] = &[
    "uuid",
    "name",
    "day",
    "month",
    "created_at",
    "updated_at",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Failure reported by a person store call.
#[derive(Debug)]
pub enum RepoError {
    Validation(PersonValidationError),
    Db(DbError),
    NotFound(PersonId),
    InvalidData(String),
    /// Connection was not bootstrapped through `db::open_db*`.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "person not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted person data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is behind required {expected_version}; open it with db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
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

impl From<PersonValidationError> for RepoError {
    fn from(value: PersonValidationError) -> Self {
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

/// CRUD contract of the authoritative person store.
pub trait PersonRepository {
    /// Fetches every person; order carries no meaning.
    fn list_persons(&self) -> RepoResult<Vec<Person>>;
    /// Creates a person and returns the canonical record with its new id.
    fn create_person(&self, draft: &NewPerson) -> RepoResult<Person>;
    /// Replaces all fields of an existing person and returns the stored record.
    fn update_person(&self, person: &Person) -> RepoResult<Person>;
    /// Deletes a person. Absent ids are not an error.
    fn delete_person(&self, id: PersonId) -> RepoResult<()>;
}

/// SQLite-backed person store owning its connection.
pub struct SqlitePersonRepository {
    conn: Connection,
}

impl SqlitePersonRepository {
    /// Wraps a connection after checking that migrations were applied.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `PRAGMA user_version` is behind.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` on schema drift.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        ensure_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Reads one person by id.
    pub fn get_person(&self, id: PersonId) -> RepoResult<Option<Person>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PERSON_SELECT_SQL} WHERE uuid = ?1;"))?;
        let person = stmt
            .query_row([id.to_string()], |row| Ok(read_raw_row(row)))
            .optional()?;

        person.transpose()?.map(parse_person).transpose()
    }
}

impl PersonRepository for SqlitePersonRepository {
    fn list_persons(&self) -> RepoResult<Vec<Person>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PERSON_SELECT_SQL} ORDER BY created_at ASC, rowid ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut persons = Vec::new();

        while let Some(row) = rows.next()? {
            persons.push(parse_person(read_raw_row(row)?)?);
        }

        Ok(persons)
    }

    fn create_person(&self, draft: &NewPerson) -> RepoResult<Person> {
        draft.validate()?;

        let person = draft.clone().into_person(Uuid::new_v4());
        self.conn.execute(
            "INSERT INTO persons (uuid, name, day, month) VALUES (?1, ?2, ?3, ?4);",
            params![
                person.id.to_string(),
                person.name.as_str(),
                person.day,
                person.month,
            ],
        )?;

        Ok(person)
    }

    fn update_person(&self, person: &Person) -> RepoResult<Person> {
        person.validate()?;

        let changed = self.conn.execute(
            "UPDATE persons
             SET
                name = ?1,
                day = ?2,
                month = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?4;",
            params![
                person.name.as_str(),
                person.day,
                person.month,
                person.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(person.id));
        }

        self.get_person(person.id)?
            .ok_or(RepoError::NotFound(person.id))
    }

    fn delete_person(&self, id: PersonId) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM persons WHERE uuid = ?1;", [id.to_string()])?;
        Ok(())
    }
}

struct RawPersonRow {
    uuid: String,
    name: String,
    day: i64,
    month: i64,
}

fn read_raw_row(row: &Row<'_>) -> RepoResult<RawPersonRow> {
    Ok(RawPersonRow {
        uuid: row.get("uuid")?,
        name: row.get("name")?,
        day: row.get("day")?,
        month: row.get("month")?,
    })
}

fn parse_person(raw: RawPersonRow) -> RepoResult<Person> {
    let id = Uuid::parse_str(&raw.uuid).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{}` in persons.uuid", raw.uuid))
    })?;
    let day = u8::try_from(raw.day).map_err(|_| {
        RepoError::InvalidData(format!("invalid day value `{}` in persons.day", raw.day))
    })?;
    let month = u8::try_from(raw.month).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid month value `{}` in persons.month",
            raw.month
        ))
    })?;

    Person::with_id(id, raw.name, day, month)
        .map_err(|err| RepoError::InvalidData(format!("person {id}: {err}")))
}

fn ensure_schema(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'persons'
        );",
        [],
        |row| row.get(0),
    )?;
    if !table_exists {
        return Err(RepoError::MissingRequiredTable("persons"));
    }

    let mut stmt = conn.prepare("PRAGMA table_info(persons);")?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<Result<Vec<_>, _>>()?;

    for &column in REQUIRED_PERSON_COLUMNS {
        if !columns.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: "persons",
                column,
            });
        }
    }

    Ok(())
}
