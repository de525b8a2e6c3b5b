//! Shared domain types for RetailRadar.
//!
//! Everything the `server` and `cli` crates pass between each other lives
//! here: newtype IDs, normalized emails, roles, and the order lifecycle
//! enums. The crate does no I/O of its own; sqlx bindings for the types sit
//! behind the `postgres` feature.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
