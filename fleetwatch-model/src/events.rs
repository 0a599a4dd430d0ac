use crate::ids::DriverId;
use crate::location::Location;

/// Push-channel event name carrying a [`PositionUpdate`].
pub const LOCATION_UPDATED: &str = "locationUpdated";

/// A single driver position report delivered over the push channel.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionUpdate {
    #[cfg_attr(feature = "serde", serde(rename = "driverId"))]
    pub driver_id: DriverId,
    pub lat: f64,
    pub lng: f64,
}

impl PositionUpdate {
    pub fn new(driver_id: impl Into<DriverId>, lat: f64, lng: f64) -> Self {
        Self {
            driver_id: driver_id.into(),
            lat,
            lng,
        }
    }

    pub fn location(&self) -> Location {
        Location::new(self.lat, self.lng)
    }

    /// False for reports with non-finite or out-of-range coordinates.
    pub fn is_well_formed(&self) -> bool {
        self.location().is_valid()
    }
}
