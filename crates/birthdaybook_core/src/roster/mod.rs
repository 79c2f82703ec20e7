//! Session roster and its reconciliation operations.
//!
//! # Responsibility
//! - Merge store acknowledgments (`load`, `insert`, `replace`, `remove`)
//!   into one locally held, countdown-ordered view.
//!
//! # Invariants
//! - One `RosterStore` per session; it is never shared implicitly.
//! - Acknowledgments are applied in arrival order (last applied wins).

pub mod store;
