//! Structured errors for quantity operations
//!
//! Every failure is raised at the point of violation and surfaces directly
//! to the caller. Registration overwrites are not errors; they are reported
//! as warnings by the registry instead.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::DimensionSignature;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const DIMENSION_MISMATCH: &str = "DIMENSION_MISMATCH";
    pub const DIV_ZERO: &str = "DIV_ZERO";
    pub const CONSISTENCY: &str = "CONSISTENCY";
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const NON_FINITE: &str = "NON_FINITE";
}

/// What kind of registry entry a failed lookup was looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupKind {
    Unit,
    Dimension,
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupKind::Unit => write!(f, "Unit"),
            LookupKind::Dimension => write!(f, "Dimension"),
        }
    }
}

/// Error type for registry and quantity operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuantityError {
    #[error("{kind} \"{name}\" is not defined")]
    NotFound { kind: LookupKind, name: String },

    #[error("Dimension mismatch: cannot {operation} {left} and {right}")]
    DimensionMismatch {
        operation: &'static str,
        left: String,
        right: String,
    },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Inconsistent definition: {0}")]
    Consistency(String),

    #[error("Parse error: {0}")]
    Parse(String),

    /// A value overflowed to infinity or became NaN
    #[error("Result is not a finite number: {0}")]
    NonFinite(String),
}

impl QuantityError {
    pub fn unit_not_found(symbol: impl Into<String>) -> Self {
        Self::NotFound { kind: LookupKind::Unit, name: symbol.into() }
    }

    pub fn dimension_not_found(name: impl Into<String>) -> Self {
        Self::NotFound { kind: LookupKind::Dimension, name: name.into() }
    }

    /// Build a mismatch error naming both signatures.
    /// An empty signature is spelled out as `dimensionless`.
    pub fn dimension_mismatch(
        operation: &'static str,
        left: &DimensionSignature,
        right: &DimensionSignature,
    ) -> Self {
        Self::DimensionMismatch {
            operation,
            left: describe(left),
            right: describe(right),
        }
    }

    /// Machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            QuantityError::NotFound { .. } => codes::NOT_FOUND,
            QuantityError::DimensionMismatch { .. } => codes::DIMENSION_MISMATCH,
            QuantityError::DivisionByZero => codes::DIV_ZERO,
            QuantityError::Consistency(_) => codes::CONSISTENCY,
            QuantityError::Parse(_) => codes::PARSE_ERROR,
            QuantityError::NonFinite(_) => codes::NON_FINITE,
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            QuantityError::NotFound { kind: LookupKind::Unit, name } => Some(format!(
                "Register a dimension that defines '{}' or check spelling",
                name
            )),
            QuantityError::NotFound { kind: LookupKind::Dimension, .. } => {
                Some("Use list_dimensions to see registered dimensions".to_string())
            }
            QuantityError::DimensionMismatch { .. } => {
                Some("Both operands must have the same dimension".to_string())
            }
            QuantityError::DivisionByZero => Some("Ensure divisor is not zero".to_string()),
            QuantityError::Consistency(_) => {
                Some("Base units must have factor 1 and offset 0".to_string())
            }
            QuantityError::Parse(_) => {
                Some("Expected a number followed by a unit, e.g. \"5 km\"".to_string())
            }
            QuantityError::NonFinite(_) => {
                Some("Operands are out of range for 64-bit floating point".to_string())
            }
        }
    }
}

fn describe(sig: &DimensionSignature) -> String {
    if sig.is_dimensionless() {
        "dimensionless".to_string()
    } else {
        sig.to_display_string()
    }
}

/// Serializable error for tool consumers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl From<&QuantityError> for ErrorReport {
    fn from(err: &QuantityError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
            suggestion: err.suggestion(),
        }
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}
