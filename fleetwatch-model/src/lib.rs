//! Core data model definitions shared across fleetwatch crates.
#![allow(missing_docs)]

pub mod auth;
pub mod driver;
pub mod error;
pub mod events;
pub mod form;
pub mod ids;
pub mod location;
pub mod prelude;

pub use auth::{
    PhoneNumber, SendOtpRequest, VerifyOtpRequest, VerifyOtpResponse,
};
pub use driver::{Driver, DriverStatus, StatusTone};
pub use error::{ModelError, Result};
pub use events::{LOCATION_UPDATED, PositionUpdate};
pub use form::DriverForm;
pub use ids::DriverId;
pub use location::Location;
