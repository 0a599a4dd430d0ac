pub use crate::auth::{
    PhoneNumber, SendOtpRequest, VerifyOtpRequest, VerifyOtpResponse,
};
pub use crate::driver::{Driver, DriverStatus, StatusTone};
pub use crate::error::ModelError;
pub use crate::events::{LOCATION_UPDATED, PositionUpdate};
pub use crate::form::DriverForm;
pub use crate::ids::DriverId;
pub use crate::location::Location;
