//! Delivery back-office client.
//!
//! The interesting part is [`domains::tracking`]: a driver roster seeded from
//! the REST API and kept current by a server-sent events channel. The rest
//! is the REST plumbing, local session storage and configuration the
//! `fleetwatch` binary needs around it.

pub mod cli;
pub mod domains;
pub mod infra;
pub mod prelude;
