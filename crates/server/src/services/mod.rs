//! Business logic sitting between the routes and the repositories.
//!
//! `auth` covers registration, login, and token issuance; `orders` owns
//! order placement and the stock reservation flow.

pub mod auth;
pub mod orders;
