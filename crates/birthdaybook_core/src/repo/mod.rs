//! Repository layer: the authoritative person store contract.
//!
//! # Responsibility
//! - Define the CRUD contract consumed by roster reconciliation.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes must validate records before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod person_repo;
