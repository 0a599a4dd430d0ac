use std::fmt;

use crate::ids::DriverId;
use crate::location::Location;

/// Driver availability as reported by the backend.
///
/// Unrecognized values are kept verbatim in [`DriverStatus::Other`] so they
/// can still be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "String", into = "String")
)]
pub enum DriverStatus {
    #[default]
    Available,
    Busy,
    Off,
    Other(String),
}

/// Visual tone used when rendering a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusTone {
    Success,
    Warning,
    Error,
    Neutral,
}

impl DriverStatus {
    pub fn as_str(&self) -> &str {
        match self {
            DriverStatus::Available => "available",
            DriverStatus::Busy => "busy",
            DriverStatus::Off => "off",
            DriverStatus::Other(raw) => raw,
        }
    }

    pub fn tone(&self) -> StatusTone {
        match self {
            DriverStatus::Available => StatusTone::Success,
            DriverStatus::Busy => StatusTone::Warning,
            DriverStatus::Off => StatusTone::Error,
            DriverStatus::Other(_) => StatusTone::Neutral,
        }
    }
}

impl From<&str> for DriverStatus {
    fn from(value: &str) -> Self {
        match value {
            "available" => DriverStatus::Available,
            "busy" => DriverStatus::Busy,
            "off" => DriverStatus::Off,
            other => DriverStatus::Other(other.to_owned()),
        }
    }
}

impl From<String> for DriverStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "available" | "busy" | "off" => DriverStatus::from(value.as_str()),
            _ => DriverStatus::Other(value),
        }
    }
}

impl From<DriverStatus> for String {
    fn from(value: DriverStatus) -> Self {
        match value {
            DriverStatus::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for DriverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A delivery driver record as returned by `GET /delivery`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Driver {
    #[cfg_attr(feature = "serde", serde(rename = "_id"))]
    pub id: DriverId,
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "null_as_default::deserialize")
    )]
    pub name: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "null_as_default::deserialize")
    )]
    pub status: DriverStatus,
    #[cfg_attr(
        feature = "serde",
        serde(
            default,
            deserialize_with = "crate::location::lenient::deserialize",
            skip_serializing_if = "Option::is_none"
        )
    )]
    pub location: Option<Location>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub vehicle: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub phone: Option<String>,
}

impl Driver {
    pub fn new(
        id: impl Into<DriverId>,
        name: impl Into<String>,
        status: DriverStatus,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status,
            location: None,
            vehicle: None,
            phone: None,
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_vehicle(mut self, vehicle: impl Into<String>) -> Self {
        self.vehicle = Some(vehicle.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

/// An explicit `null` reads the same as a missing field.
#[cfg(feature = "serde")]
mod null_as_default {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }
}
