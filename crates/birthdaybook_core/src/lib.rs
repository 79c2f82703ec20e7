//! Core domain logic for birthdaybook.
//! This crate is the single source of truth for countdown and roster invariants.

pub mod config;
pub mod countdown;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod repo;
pub mod roster;
pub mod service;

pub use config::RosterConfig;
pub use countdown::clock::{Clock, FixedClock, SystemClock};
pub use countdown::{next_occurrence, remaining_days, LeapDayPolicy};
pub use error::{ExternalOperation, RosterError, RosterResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::person::{NewPerson, Person, PersonId, PersonValidationError};
pub use repo::person_repo::{PersonRepository, RepoError, RepoResult, SqlitePersonRepository};
pub use roster::store::{RosterEntry, RosterObserver, RosterStore};
pub use service::roster_service::RosterService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
