//! Domain model for tracked people and their annual birthdays.
//!
//! # Responsibility
//! - Define canonical data structures used by roster and store layers.
//!
//! # Invariants
//! - Every record is identified by a store-assigned `PersonId`.
//! - Records are replaced whole; fields are never merged.

pub mod person;
