//! Error types for the range slicer.
//!
//! Every error here is recoverable. The controller logs it and keeps the last
//! valid state; nothing is surfaced to the user as a crash.

/// The observed data domain cannot back a range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// The lower end of the domain lies above the upper end.
    #[error("Inverted domain: minimum {min} is greater than maximum {max}")]
    Inverted { min: f64, max: f64 },

    /// One of the domain ends is NaN or infinite.
    #[error("Domain bounds must be finite, got [{min}, {max}]")]
    NonFinite { min: f64, max: f64 },
}

/// Text or persisted state could not be parsed.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Text typed into a bound field is not a finite number.
    #[error("'{input}' is not a valid number")]
    InvalidNumber { input: String },

    /// A persisted settings value is not valid JSON of the expected shape.
    #[error("Malformed persisted state for '{key}': {source}")]
    PersistedState {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ParseError {
    /// Create an invalid-number error.
    pub fn invalid_number(input: impl Into<String>) -> Self {
        Self::InvalidNumber {
            input: input.into(),
        }
    }

    /// Create a persisted-state error.
    pub fn persisted_state(key: impl Into<String>, source: serde_json::Error) -> Self {
        Self::PersistedState {
            key: key.into(),
            source,
        }
    }
}
