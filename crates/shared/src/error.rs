use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure classes the dashboard reports; all of them are handled the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Transport,
    HttpStatus,
    MalformedBody,
    Validation,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all required fields")]
    MissingFields(Vec<&'static str>),
}

impl ValidationError {
    pub fn missing_fields(&self) -> &[&'static str] {
        match self {
            ValidationError::MissingFields(fields) => fields,
        }
    }
}
