//! Driver create/update payloads.
//!
//! Mirrors the driver management form: free-text inputs are parsed here so
//! the HTTP layer only ever sends well-typed bodies.

use crate::driver::DriverStatus;
use crate::error::{ModelError, Result};
use crate::location::Location;

/// Body for `POST /delivery` and `PUT /delivery/:id`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DriverForm {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub phone: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub vehicle: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub status: DriverStatus,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub location: Option<Location>,
}

impl DriverForm {
    /// Build a form from raw text inputs.
    ///
    /// Blank coordinate inputs mean "no location". A non-blank input that
    /// does not parse as a number is rejected, as is a location with only
    /// one coordinate filled in.
    pub fn from_inputs(
        name: &str,
        phone: &str,
        vehicle: &str,
        status: &str,
        lat: &str,
        lng: &str,
    ) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ModelError::EmptyField("name"));
        }

        let status = match status.trim() {
            "" => DriverStatus::default(),
            raw => DriverStatus::from(raw),
        };

        let location = match (parse_axis("lat", lat)?, parse_axis("lng", lng)?)
        {
            (Some(lat), Some(lng)) => Some(Location::validated(lat, lng)?),
            (None, None) => None,
            (None, Some(_)) => return Err(ModelError::EmptyField("lat")),
            (Some(_), None) => return Err(ModelError::EmptyField("lng")),
        };

        Ok(Self {
            name: name.to_owned(),
            phone: phone.trim().to_owned(),
            vehicle: vehicle.trim().to_owned(),
            status,
            location,
        })
    }
}

fn parse_axis(field: &'static str, raw: &str) -> Result<Option<f64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| ModelError::InvalidCoordinate {
            field,
            raw: trimmed.to_owned(),
        })
}
