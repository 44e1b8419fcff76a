//! Core of a two-role delivery-order application.
//!
//! The hosted backend (auth, storage, conditional updates) sits behind the
//! traits in [`ports`]; [`adapters`] provides in-memory implementations for
//! tests and local development. [`domain`] holds the data contracts plus the
//! pure pricing and earnings logic, [`commands`] the order lifecycle
//! transitions as [`tower::Service`]s, and [`session`]/[`guard`]/[`routes`]
//! the reactive session cell with role-gated route access.

pub mod adapters;
pub mod commands;
pub mod domain;
pub mod guard;
pub mod ports;
pub mod requests;
pub mod routes;
pub mod session;
