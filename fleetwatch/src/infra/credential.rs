use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Bearer token for the delivery backend.
///
/// Passed explicitly to whatever issues requests or opens the push channel;
/// there is no process-wide token slot. The token is wiped on drop and never
/// shows up in `Debug` output.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Credential {
    token: String,
}

impl Credential {
    /// Returns `None` for a blank token, which the backend treats the same
    /// as no token at all.
    pub fn from_token(token: impl Into<String>) -> Option<Self> {
        let mut token = token.into();
        let trimmed = token.trim();
        if trimmed.is_empty() {
            token.zeroize();
            return None;
        }
        let token = if trimmed.len() == token.len() {
            token
        } else {
            let owned = trimmed.to_owned();
            token.zeroize();
            owned
        };
        Some(Self { token })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .finish()
    }
}
