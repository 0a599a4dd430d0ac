use std::fmt::{self, Display};

/// Errors produced by model constructors and validation routines.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    InvalidCoordinate { field: &'static str, raw: String },
    OutOfRange { field: &'static str, value: f64 },
    InvalidPhone(String),
    EmptyField(&'static str),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::InvalidCoordinate { field, raw } => {
                write!(f, "{field} must be a number, got '{raw}'")
            }
            ModelError::OutOfRange { field, value } => {
                write!(f, "{field} out of range: {value}")
            }
            ModelError::InvalidPhone(raw) => {
                write!(f, "invalid phone number: '{raw}'")
            }
            ModelError::EmptyField(field) => write!(f, "{field} is required"),
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
