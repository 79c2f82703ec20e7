//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose roster use cases to Dart via FRB.
//! - Own one roster session per UI instance; no roster state is global.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every roster call returns an envelope with the current ordered items.

use birthdaybook_core::db::open_db;
use birthdaybook_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    NewPerson, Person, PersonId, RosterConfig, RosterEntry, RosterError, RosterService,
    RosterStore, SqlitePersonRepository, SystemClock,
};
use log::info;
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

type SessionService = RosterService<SqlitePersonRepository, SystemClock>;

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One roster row as rendered by the birthday list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonItem {
    pub id: String,
    pub name: String,
    pub day: u8,
    pub month: u8,
    pub remaining_days: u32,
    /// Preformatted countdown, e.g. `1 day until next birthday`.
    pub countdown_label: String,
}

/// Ordered roster envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterResponse {
    pub ok: bool,
    /// Ascending by `remaining_days`. On failure, the last known roster.
    pub items: Vec<PersonItem>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
    /// The UI should call `refresh` before trusting `items` again.
    pub needs_resync: bool,
}

/// Result envelope for add/update/delete calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// Id of the person the action applied to, when known.
    pub person_id: Option<String>,
    pub message: String,
    pub needs_resync: bool,
    /// Roster after the action.
    pub items: Vec<PersonItem>,
}

/// Roster session bound to one SQLite store.
///
/// # FFI contract
/// - Opaque to Dart; the UI holds one handle per birthday list screen.
/// - All methods are sync, DB-backed and never panic.
pub struct BirthdaySession {
    service: Mutex<SessionService>,
}

impl BirthdaySession {
    /// Opens (or creates) the store at `db_path` and loads the roster.
    ///
    /// The leap-day policy comes from `BIRTHDAYBOOK_LEAP_DAY` when set.
    #[flutter_rust_bridge::frb(sync)]
    pub fn open(db_path: String) -> Result<BirthdaySession, String> {
        let trimmed = db_path.trim();
        if trimmed.is_empty() {
            return Err("db_path cannot be empty".to_string());
        }

        let conn = open_db(trimmed).map_err(|err| format!("session DB open failed: {err}"))?;
        let repo = SqlitePersonRepository::try_new(conn)
            .map_err(|err| format!("session repo init failed: {err}"))?;
        let roster = RosterStore::from_config(SystemClock, &RosterConfig::from_env());
        let mut service = RosterService::new(repo, roster);
        service
            .refresh()
            .map_err(|err| format!("session initial load failed: {err}"))?;

        info!(
            "event=session_open module=ffi status=ok count={}",
            service.roster().len()
        );
        Ok(Self {
            service: Mutex::new(service),
        })
    }

    /// Reloads every person from the store.
    #[flutter_rust_bridge::frb(sync)]
    pub fn refresh(&self) -> RosterResponse {
        let mut service = self.lock();
        match service.refresh() {
            Ok(()) => {
                let items = to_items(service.snapshot());
                let message = format!("Loaded {} person(s).", items.len());
                RosterResponse {
                    ok: true,
                    items,
                    message,
                    needs_resync: false,
                }
            }
            Err(err) => RosterResponse {
                ok: false,
                items: to_items(service.snapshot()),
                message: format!("refresh failed: {err}"),
                needs_resync: err.needs_resync(),
            },
        }
    }

    /// Current roster ordered by days until birthday.
    #[flutter_rust_bridge::frb(sync)]
    pub fn list(&self) -> RosterResponse {
        let items = to_items(self.lock().snapshot());
        let message = if items.is_empty() {
            "No people yet.".to_string()
        } else {
            format!("{} person(s).", items.len())
        };
        RosterResponse {
            ok: true,
            items,
            message,
            needs_resync: false,
        }
    }

    /// Adds a person; fields are validated before the store is touched.
    #[flutter_rust_bridge::frb(sync)]
    pub fn add_person(&self, name: String, day: i32, month: i32) -> ActionResponse {
        let mut service = self.lock();
        let result = NewPerson::new(name, calendar_field(day), calendar_field(month))
            .map_err(RosterError::from)
            .and_then(|draft| service.add_person(&draft));
        respond(&mut service, result.map(|person| person.id), "Person added.")
    }

    /// Replaces every field of an existing person.
    #[flutter_rust_bridge::frb(sync)]
    pub fn update_person(&self, id: String, name: String, day: i32, month: i32) -> ActionResponse {
        let mut service = self.lock();
        let person_id = match parse_person_id(&id) {
            Ok(person_id) => person_id,
            Err(message) => return ActionResponse::rejected(&mut service, message),
        };
        let result = Person::with_id(person_id, name, calendar_field(day), calendar_field(month))
            .map_err(RosterError::from)
            .and_then(|person| service.update_person(&person));
        respond(&mut service, result.map(|person| person.id), "Person updated.")
    }

    /// Deletes a person. Deleting an unknown id succeeds.
    #[flutter_rust_bridge::frb(sync)]
    pub fn delete_person(&self, id: String) -> ActionResponse {
        let mut service = self.lock();
        let person_id = match parse_person_id(&id) {
            Ok(person_id) => person_id,
            Err(message) => return ActionResponse::rejected(&mut service, message),
        };
        let result = service.delete_person(person_id).map(|_| person_id);
        respond(&mut service, result, "Person deleted.")
    }

    fn lock(&self) -> MutexGuard<'_, SessionService> {
        // Roster operations are all-or-nothing, so a poisoned guard is still consistent.
        self.service.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ActionResponse {
    fn rejected(service: &mut SessionService, message: String) -> Self {
        Self {
            ok: false,
            person_id: None,
            message,
            needs_resync: false,
            items: to_items(service.snapshot()),
        }
    }
}

fn respond(
    service: &mut SessionService,
    result: Result<PersonId, RosterError>,
    success: &str,
) -> ActionResponse {
    let items = to_items(service.snapshot());
    match result {
        Ok(person_id) => ActionResponse {
            ok: true,
            person_id: Some(person_id.to_string()),
            message: success.to_string(),
            needs_resync: false,
            items,
        },
        Err(err) => ActionResponse {
            ok: false,
            person_id: None,
            message: err.to_string(),
            needs_resync: err.needs_resync(),
            items,
        },
    }
}

/// Narrows UI integers; values outside `u8` become `0`, which core
/// validation rejects with a day/month error.
fn calendar_field(value: i32) -> u8 {
    u8::try_from(value).unwrap_or(0)
}

fn parse_person_id(raw: &str) -> Result<PersonId, String> {
    Uuid::parse_str(raw.trim()).map_err(|_| format!("invalid person id `{}`", raw.trim()))
}

fn to_items(entries: Vec<RosterEntry>) -> Vec<PersonItem> {
    entries.into_iter().map(to_item).collect()
}

fn to_item(entry: RosterEntry) -> PersonItem {
    let days = entry.remaining_days;
    PersonItem {
        id: entry.person.id.to_string(),
        name: entry.person.name,
        day: entry.person.day,
        month: entry.person.month,
        remaining_days: days,
        countdown_label: countdown_label(days),
    }
}

fn countdown_label(days: u32) -> String {
    let plural = if days == 1 { "" } else { "s" };
    format!("{days} day{plural} until next birthday")
}

#[cfg(test)]
mod tests {
    use super::{core_version, countdown_label, init_logging, ping, BirthdaySession};

    fn open_session() -> (tempfile::TempDir, BirthdaySession) {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("birthdaybook.sqlite3");
        let session = BirthdaySession::open(path.to_string_lossy().into_owned())
            .expect("session should open");
        (dir, session)
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "/tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn countdown_label_pluralizes() {
        assert_eq!(countdown_label(0), "0 days until next birthday");
        assert_eq!(countdown_label(1), "1 day until next birthday");
        assert_eq!(countdown_label(12), "12 days until next birthday");
    }

    #[test]
    fn open_rejects_empty_path() {
        assert!(BirthdaySession::open("  ".to_string()).is_err());
    }

    #[test]
    fn add_update_delete_round_trip() {
        let (_dir, session) = open_session();

        let added = session.add_person("Ada".to_string(), 10, 12);
        assert!(added.ok, "{}", added.message);
        let id = added.person_id.clone().expect("add should return id");
        assert_eq!(added.items.len(), 1);

        let updated = session.update_person(id.clone(), "Ada L.".to_string(), 11, 12);
        assert!(updated.ok, "{}", updated.message);
        assert_eq!(updated.items[0].name, "Ada L.");
        assert_eq!(updated.items[0].day, 11);

        let deleted = session.delete_person(id.clone());
        assert!(deleted.ok, "{}", deleted.message);
        assert!(deleted.items.is_empty());

        let again = session.delete_person(id);
        assert!(again.ok, "{}", again.message);
    }

    #[test]
    fn invalid_fields_are_rejected_without_mutation() {
        let (_dir, session) = open_session();

        let blank = session.add_person("   ".to_string(), 1, 1);
        assert!(!blank.ok);
        assert!(blank.message.contains("name"));

        let bad_month = session.add_person("X".to_string(), 1, 300);
        assert!(!bad_month.ok);
        assert!(bad_month.message.contains("month"));

        let bad_id = session.delete_person("not-a-uuid".to_string());
        assert!(!bad_id.ok);
        assert!(session.list().items.is_empty());
    }

    #[test]
    fn reopened_session_loads_existing_people() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("birthdaybook.sqlite3");
        let path = path.to_string_lossy().into_owned();

        let first = BirthdaySession::open(path.clone()).expect("first open");
        assert!(first.add_person("Kept".to_string(), 1, 1).ok);
        drop(first);

        let second = BirthdaySession::open(path).expect("second open");
        let roster = second.refresh();
        assert!(roster.ok, "{}", roster.message);
        assert_eq!(roster.items.len(), 1);
        assert_eq!(roster.items[0].name, "Kept");
    }
}
