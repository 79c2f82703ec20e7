//! Flutter bridge crate for birthdaybook.

pub mod api;
