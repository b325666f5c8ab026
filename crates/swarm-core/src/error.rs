use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Validation failed: {message} {location}")]
    Validation {
        message: String,
        field: Option<String>,
        location: ErrorLocation,
    },

    #[error("Malformed trace header: {header} {location}")]
    MalformedTraceHeader {
        header: String,
        location: ErrorLocation,
    },
}

impl CoreError {
    #[track_caller]
    pub fn validation<S: Into<String>>(message: S, field: Option<&str>) -> Self {
        Self::Validation {
            message: message.into(),
            field: field.map(str::to_string),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
