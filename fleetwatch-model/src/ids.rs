use std::borrow::Borrow;
use std::fmt;

/// Opaque driver identity assigned by the delivery backend (`_id` on the wire).
///
/// No format is assumed; two ids are the same driver iff the strings match.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct DriverId(String);

impl DriverId {
    pub fn new(raw: impl Into<String>) -> Self {
        DriverId(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<&str> for DriverId {
    fn from(value: &str) -> Self {
        DriverId(value.to_owned())
    }
}

impl From<String> for DriverId {
    fn from(value: String) -> Self {
        DriverId(value)
    }
}

impl AsRef<str> for DriverId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for DriverId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DriverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
