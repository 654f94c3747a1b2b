//! Error types for warrant evaluation
//!
//! Propagation policy:
//! - `InvalidInput` and `Configuration` abort the whole evaluation.
//! - `AmbiguousClassification` aborts too (no major street, no analysis).
//! - `InsufficientData` is scoped to one warrant; the engine turns it into a
//!   "not evaluated" result and keeps going with the other eight.

use crate::warrants::WarrantId;
use thiserror::Error;

/// Errors raised by the warrant engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WarrantError {
    /// Malformed or unsupported table lookup, wrong intersection topology,
    /// or a bad engine setting.
    #[error("Configuration error: {message}")]
    Configuration {
        /// What is wrong with the configuration.
        message: String,
    },

    /// Street volumes tie and the tie-break policy could not separate them.
    #[error("Ambiguous classification: '{first}' and '{second}' both carry {volume} vehicles")]
    AmbiguousClassification {
        first: String,
        second: String,
        volume: u64,
    },

    /// A warrant-specific input is missing.
    #[error("Insufficient data for {}: {field}", .warrant.map(|w| w.name()).unwrap_or("analysis"))]
    InsufficientData {
        warrant: Option<WarrantId>,
        field: String,
    },

    /// Negative counts, impossible hours, non-positive speeds and the like.
    #[error("Invalid input in '{field}': {message}")]
    InvalidInput {
        field: String,
        message: String,
    },
}

impl WarrantError {
    pub fn configuration(message: impl Into<String>) -> Self {
        WarrantError::Configuration {
            message: message.into(),
        }
    }

    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        WarrantError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn insufficient(warrant: WarrantId, field: impl Into<String>) -> Self {
        WarrantError::InsufficientData {
            warrant: Some(warrant),
            field: field.into(),
        }
    }

    /// Whether this error is scoped to a single warrant
    pub fn is_warrant_scoped(&self) -> bool {
        matches!(self, WarrantError::InsufficientData { .. })
    }
}

pub type EngineResult<T> = std::result::Result<T, WarrantError>;
