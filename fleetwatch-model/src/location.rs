use crate::error::{ModelError, Result};

/// A WGS84 coordinate pair as the backend reports it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Build a location, rejecting non-finite or out-of-range coordinates.
    pub fn validated(lat: f64, lng: f64) -> Result<Self> {
        check_axis("lat", lat, 90.0)?;
        check_axis("lng", lng, 180.0)?;
        Ok(Self { lat, lng })
    }

    pub fn is_valid(&self) -> bool {
        Self::validated(self.lat, self.lng).is_ok()
    }
}

fn check_axis(field: &'static str, value: f64, bound: f64) -> Result<()> {
    if value.is_finite() && (-bound..=bound).contains(&value) {
        Ok(())
    } else {
        Err(ModelError::OutOfRange { field, value })
    }
}

/// Reads a `location` object leniently: a missing object, a `null`, or an
/// object lacking either coordinate all mean "no location yet".
#[cfg(feature = "serde")]
pub(crate) mod lenient {
    use super::Location;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    struct RawLocation {
        #[serde(default)]
        lat: Option<f64>,
        #[serde(default)]
        lng: Option<f64>,
    }

    pub fn deserialize<'de, D>(
        deserializer: D,
    ) -> Result<Option<Location>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<RawLocation>::deserialize(deserializer)?;
        Ok(raw.and_then(|raw| match (raw.lat, raw.lng) {
            (Some(lat), Some(lng)) => Some(Location { lat, lng }),
            _ => None,
        }))
    }
}
