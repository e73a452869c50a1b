//! Quantia Core - Fundamental types
//!
//! This crate provides the core types used throughout Quantia:
//! - `DimensionSignature`: exponent vectors over interned base dimensions
//! - `QuantityError`: the error taxonomy shared by every layer
//! - `ErrorReport`: serializable form of an error for tool consumers

mod error;
mod signature;

pub use error::{codes, ErrorReport, LookupKind, QuantityError};
pub use signature::{signatures_equal, DimensionId, DimensionSignature};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{DimensionId, DimensionSignature, LookupKind, QuantityError};
    pub use crate::error::codes;
}
