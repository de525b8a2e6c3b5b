//! RetailRadar server as a library.
//!
//! The binary in `main.rs` wires these modules to a listener; exposing them
//! as a library keeps handlers and services testable and lets the CLI share
//! pieces such as the password hasher.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod policy;
pub mod routes;
pub mod services;
pub mod state;
