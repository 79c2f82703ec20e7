//! In-memory roster with countdown ordering.
//!
//! # Responsibility
//! - Hold the session's person records keyed by store-assigned id.
//! - Re-derive countdown order against the clock on every mutation and read.
//! - Notify observers with the new snapshot after each effective change.
//!
//! # Invariants
//! - The ordered id sequence holds exactly the keys of the record map.
//! - Order is ascending by `remaining_days`; ties keep insertion order.
//! - `remaining_days` is never reused across calls; each read recomputes it.
//! - Failed operations leave records, order and observers untouched.

use crate::config::RosterConfig;
use crate::countdown::clock::{Clock, SystemClock};
use crate::countdown::{remaining_days, LeapDayPolicy};
use crate::error::{RosterError, RosterResult};
use crate::model::person::{Person, PersonId};
use log::{debug, info, warn};
use std::collections::HashMap;

/// One snapshot row: a record plus its countdown at read time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub person: Person,
    pub remaining_days: u32,
}

impl RosterEntry {
    pub fn id(&self) -> PersonId {
        self.person.id
    }
}

/// Receives a fresh snapshot after every effective roster change.
pub trait RosterObserver: Send {
    fn on_snapshot(&mut self, snapshot: &[RosterEntry]);
}

impl<F> RosterObserver for F
where
    F: FnMut(&[RosterEntry]) + Send,
{
    fn on_snapshot(&mut self, snapshot: &[RosterEntry]) {
        self(snapshot)
    }
}

struct Slot {
    person: Person,
    /// Insertion rank; tie-breaker for equal countdowns.
    rank: u64,
}

/// Session-owned roster of people ordered by days until their birthday.
///
/// All operations are synchronous and in-memory. Callers that share one
/// store across threads must serialize access themselves.
pub struct RosterStore<C: Clock = SystemClock> {
    slots: HashMap<PersonId, Slot>,
    order: Vec<PersonId>,
    next_rank: u64,
    clock: C,
    policy: LeapDayPolicy,
    observers: Vec<Box<dyn RosterObserver>>,
}

impl Default for RosterStore<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl<C: Clock> RosterStore<C> {
    /// Creates an empty roster using the default leap-day policy.
    pub fn new(clock: C) -> Self {
        Self::with_policy(clock, LeapDayPolicy::default())
    }

    pub fn with_policy(clock: C, policy: LeapDayPolicy) -> Self {
        Self {
            slots: HashMap::new(),
            order: Vec::new(),
            next_rank: 0,
            clock,
            policy,
            observers: Vec::new(),
        }
    }

    pub fn from_config(clock: C, config: &RosterConfig) -> Self {
        Self::with_policy(clock, config.leap_day_policy)
    }

    /// Replaces the whole roster with `records`.
    ///
    /// Input order becomes insertion order. A repeated id keeps its first
    /// position and its last record.
    pub fn load(&mut self, records: impl IntoIterator<Item = Person>) {
        self.slots.clear();
        self.next_rank = 0;

        for person in records {
            if let Some(slot) = self.slots.get_mut(&person.id) {
                slot.person = person;
                continue;
            }
            let rank = self.take_rank();
            self.slots.insert(person.id, Slot { person, rank });
        }

        info!(
            "event=roster_load module=roster status=ok count={}",
            self.slots.len()
        );
        self.publish();
    }

    /// Adds a record acknowledged by the store's create call.
    ///
    /// # Errors
    /// - `InvariantViolation` when the id is already present; the roster is
    ///   left unchanged and should be reloaded.
    pub fn insert(&mut self, person: Person) -> RosterResult<()> {
        if self.slots.contains_key(&person.id) {
            warn!(
                "event=roster_insert module=roster status=error error_code=duplicate_id id={}",
                person.id
            );
            return Err(RosterError::InvariantViolation(person.id));
        }

        let id = person.id;
        let rank = self.take_rank();
        self.slots.insert(id, Slot { person, rank });
        debug!("event=roster_insert module=roster status=ok id={id}");
        self.publish();
        Ok(())
    }

    /// Substitutes the whole record for an id acknowledged by an update.
    ///
    /// The record keeps its insertion rank.
    ///
    /// # Errors
    /// - `NotFound` when the id is absent; the roster is left unchanged.
    pub fn replace(&mut self, person: Person) -> RosterResult<()> {
        let id = person.id;
        let Some(slot) = self.slots.get_mut(&id) else {
            warn!(
                "event=roster_replace module=roster status=error error_code=not_found id={id}"
            );
            return Err(RosterError::NotFound(id));
        };

        slot.person = person;
        debug!("event=roster_replace module=roster status=ok id={id}");
        self.publish();
        Ok(())
    }

    /// Removes `id` if present. Removing an absent id is a no-op.
    ///
    /// Returns `true` when a record was removed.
    pub fn remove(&mut self, id: PersonId) -> bool {
        if self.slots.remove(&id).is_none() {
            debug!("event=roster_remove module=roster status=noop id={id}");
            return false;
        }

        debug!("event=roster_remove module=roster status=ok id={id}");
        self.publish();
        true
    }

    /// Returns the roster ordered by countdown as of now.
    pub fn snapshot(&mut self) -> Vec<RosterEntry> {
        self.derive()
    }

    /// Registers an observer for subsequent changes.
    pub fn subscribe(&mut self, observer: impl RosterObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Switches the leap-day policy and republishes the order.
    pub fn set_policy(&mut self, policy: LeapDayPolicy) {
        if self.policy == policy {
            return;
        }
        self.policy = policy;
        self.publish();
    }

    pub fn policy(&self) -> LeapDayPolicy {
        self.policy
    }

    /// Order as of the most recent mutation or snapshot.
    pub fn ordered_ids(&self) -> &[PersonId] {
        &self.order
    }

    pub fn get(&self, id: PersonId) -> Option<&Person> {
        self.slots.get(&id).map(|slot| &slot.person)
    }

    pub fn contains(&self, id: PersonId) -> bool {
        self.slots.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Mutable clock access. Changes take effect on the next read.
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    fn take_rank(&mut self) -> u64 {
        let rank = self.next_rank;
        self.next_rank += 1;
        rank
    }

    fn derive(&mut self) -> Vec<RosterEntry> {
        let now = self.clock.now();
        let policy = self.policy;

        let mut keyed = self
            .slots
            .values()
            .map(|slot| {
                let days = remaining_days(slot.person.day, slot.person.month, now, policy);
                (days, slot.rank, slot)
            })
            .collect::<Vec<_>>();
        keyed.sort_by_key(|(days, rank, _)| (*days, *rank));

        self.order = keyed.iter().map(|(_, _, slot)| slot.person.id).collect();
        keyed
            .into_iter()
            .map(|(remaining_days, _, slot)| RosterEntry {
                person: slot.person.clone(),
                remaining_days,
            })
            .collect()
    }

    fn publish(&mut self) {
        let snapshot = self.derive();
        for observer in &mut self.observers {
            observer.on_snapshot(&snapshot);
        }
    }
}
