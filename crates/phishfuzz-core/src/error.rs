// crates/phishfuzz-core/src/error.rs

use thiserror::Error;

/// Error types for fuzzy registry construction and risk inference.
#[derive(Debug, Error)]
pub enum FuzzyError {
    /// A rule or lookup referenced a variable that was never defined.
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    /// A rule or lookup referenced a term the variable does not define.
    #[error("Unknown term: {variable}.{term}")]
    UnknownTerm { variable: String, term: String },

    /// The feature record handed to the engine lacks a required key.
    #[error("Missing feature key: {0}")]
    MissingFeatureKey(String),

    /// A feature value is outside what its key accepts (e.g. a flag of 3).
    #[error("Invalid feature value for {key}: {value} ({reason})")]
    InvalidFeatureValue {
        key: String,
        value: f64,
        reason: String,
    },

    /// Every rule evaluated to zero, so the aggregate risk set is empty.
    #[error("No rule fired: aggregate risk set is zero everywhere")]
    NoRuleFired,

    /// Universe bounds or step are unusable.
    #[error("Invalid universe: {0}")]
    InvalidUniverse(String),

    /// Triangle breakpoints are not ordered a <= b <= c.
    #[error("Invalid membership function for {term}: {reason}")]
    InvalidMembership { term: String, reason: String },

    /// A variable name was registered twice.
    #[error("Duplicate variable: {0}")]
    DuplicateVariable(String),

    /// A term name was registered twice on the same variable.
    #[error("Duplicate term: {variable}.{term}")]
    DuplicateTerm { variable: String, term: String },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl FuzzyError {
    /// Whether the caller can recover by changing the input (substituting a
    /// sentinel, rejecting the record, or picking a fallback score).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MissingFeatureKey(_)
                | Self::InvalidFeatureValue { .. }
                | Self::NoRuleFired
                | Self::Serialization(_)
        )
    }

    /// Whether this is a registry/rule-base mismatch that should have been
    /// caught when the engine was built.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnknownVariable(_)
                | Self::UnknownTerm { .. }
                | Self::InvalidUniverse(_)
                | Self::InvalidMembership { .. }
                | Self::DuplicateVariable(_)
                | Self::DuplicateTerm { .. }
        )
    }
}

impl From<serde_json::Error> for FuzzyError {
    fn from(e: serde_json::Error) -> Self {
        FuzzyError::Serialization(e.to_string())
    }
}
