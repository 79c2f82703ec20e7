//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls and roster reconciliation into use-case APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod roster_service;
