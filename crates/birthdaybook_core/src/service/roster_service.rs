//! Roster use-case service.
//!
//! # Responsibility
//! - Validate drafts locally before any store call.
//! - Run one store call per use case and reconcile its acknowledgment into
//!   the session roster.
//! - Map failures onto `RosterError` without retrying.
//!
//! # Invariants
//! - A failed store call never mutates the roster.
//! - Store acknowledgments are applied in the order calls complete.
//! - Local divergence (`NotFound`, `InvariantViolation`) is reported, not
//!   repaired; callers decide when to `resync`.

use crate::countdown::clock::{Clock, SystemClock};
use crate::error::{ExternalOperation, RosterError, RosterResult};
use crate::model::person::{NewPerson, Person, PersonId};
use crate::repo::person_repo::{PersonRepository, RepoError};
use crate::roster::store::{RosterEntry, RosterObserver, RosterStore};
use log::{error, info};

/// Session facade pairing one store client with one roster.
pub struct RosterService<R: PersonRepository, C: Clock = SystemClock> {
    repo: R,
    roster: RosterStore<C>,
}

impl<R: PersonRepository, C: Clock> RosterService<R, C> {
    /// Creates a service over an empty roster. Call `refresh` to populate it.
    pub fn new(repo: R, roster: RosterStore<C>) -> Self {
        Self { repo, roster }
    }

    /// Fetches every person from the store and reloads the roster.
    pub fn refresh(&mut self) -> RosterResult<()> {
        let persons = self
            .repo
            .list_persons()
            .map_err(|err| external_failure(ExternalOperation::Fetch, err))?;
        self.roster.load(persons);
        Ok(())
    }

    /// Forces a full reload after a reported divergence.
    pub fn resync(&mut self) -> RosterResult<()> {
        info!("event=roster_resync module=service status=start");
        self.refresh()
    }

    /// Creates a person in the store and inserts the acknowledged record.
    ///
    /// # Errors
    /// - `Validation` before the store is called.
    /// - `ExternalOperationFailed` when the store call fails.
    /// - `InvariantViolation` when the store returns an id already on the roster.
    pub fn add_person(&mut self, draft: &NewPerson) -> RosterResult<Person> {
        draft.validate()?;

        let created = self
            .repo
            .create_person(draft)
            .map_err(|err| external_failure(ExternalOperation::Create, err))?;
        self.roster.insert(created.clone())?;

        info!(
            "event=person_create module=service status=ok id={}",
            created.id
        );
        Ok(created)
    }

    /// Replaces a person in the store and on the roster.
    ///
    /// # Errors
    /// - `Validation` before the store is called.
    /// - `ExternalOperationFailed` when the store call fails (including the
    ///   store's own not-found).
    /// - `NotFound` when the store acknowledged an id the roster lacks.
    pub fn update_person(&mut self, person: &Person) -> RosterResult<Person> {
        person.validate()?;

        let updated = self
            .repo
            .update_person(person)
            .map_err(|err| external_failure(ExternalOperation::Update, err))?;
        self.roster.replace(updated.clone())?;

        info!(
            "event=person_update module=service status=ok id={}",
            updated.id
        );
        Ok(updated)
    }

    /// Deletes a person from the store and removes it from the roster.
    ///
    /// Returns whether the roster held the id.
    pub fn delete_person(&mut self, id: PersonId) -> RosterResult<bool> {
        self.repo
            .delete_person(id)
            .map_err(|err| external_failure(ExternalOperation::Delete, err))?;
        let removed = self.roster.remove(id);

        info!("event=person_delete module=service status=ok id={id} removed={removed}");
        Ok(removed)
    }

    /// Current countdown-ordered roster.
    pub fn snapshot(&mut self) -> Vec<RosterEntry> {
        self.roster.snapshot()
    }

    pub fn subscribe(&mut self, observer: impl RosterObserver + 'static) {
        self.roster.subscribe(observer);
    }

    pub fn roster(&self) -> &RosterStore<C> {
        &self.roster
    }

    pub fn roster_mut(&mut self) -> &mut RosterStore<C> {
        &mut self.roster
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }
}

fn external_failure(operation: ExternalOperation, source: RepoError) -> RosterError {
    error!(
        "event=store_{operation} module=service status=error error_code=external_operation_failed error={source}"
    );
    RosterError::ExternalOperationFailed { operation, source }
}
