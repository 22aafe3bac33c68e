use thiserror::Error;

/// A record failed its shape check, either on insert or when read back
/// from storage. Carries the first offending field; validation stops at
/// the first failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid value for field '{field}': {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}
