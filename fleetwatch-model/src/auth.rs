//! Request and response bodies for the phone/OTP login flow.

use std::fmt;

use crate::error::{ModelError, Result};

/// A phone number normalized to `+<digits>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Accepts digits with an optional leading `+`; spaces and dashes are
    /// ignored.
    pub fn parse(raw: &str) -> Result<Self> {
        let compact: String = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-'))
            .collect();
        let digits = compact.strip_prefix('+').unwrap_or(&compact);

        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(ModelError::InvalidPhone(raw.to_owned()));
        }
        Ok(PhoneNumber(format!("+{digits}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SendOtpRequest {
    pub phone: PhoneNumber,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VerifyOtpRequest {
    pub phone: PhoneNumber,
    pub code: String,
}

#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VerifyOtpResponse {
    pub token: String,
}

impl fmt::Debug for VerifyOtpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifyOtpResponse")
            .field("token", &"<redacted>")
            .finish()
    }
}
