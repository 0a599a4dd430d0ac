//! Service traits over the REST API.
//!
//! Callers depend on the traits; the HTTP adapters are the production
//! implementations and tests substitute in-memory ones.

pub mod auth;
pub mod delivery;

pub use auth::{AuthApi, AuthApiAdapter};
pub use delivery::{DeliveryApi, DeliveryApiAdapter};
