//! Quantia Units - Dimensional quantities over a runtime unit registry
//!
//! Every unit belongs to exactly one registered dimension and converts to
//! that dimension's base unit through an affine map. Quantities carry a
//! dimension signature, so multiplication and division derive new
//! composite units while addition, subtraction and comparison demand
//! matching signatures.
//!
//! Standard dimensions (registration order):
//! - Length (m, km, ft, mi, au, ly, pc, etc.)
//! - Mass (kg, g, lb, oz, t, etc.)
//! - Time (s, min, h, d, yr, etc.)
//! - ElectricCurrent (A, mA, kA, µA)
//! - Temperature (K, degC, degF, degR)
//! - AmountOfSubstance (mol, mmol, kmol, µmol)
//! - LuminousIntensity (cd, mcd, kcd)

mod parse;
mod quantity;
mod registry;
mod unit;
mod units;

pub use parse::{parse_conversion, parse_quantity};
pub use quantity::{Quantity, QuantityTransport, DISPLAY_PRECISION, EQUALITY_TOLERANCE};
pub use registry::{RegistrationWarning, UnitRegistry};
pub use unit::{DimensionDefinition, UnitDefinition, UnitScale};
pub use units::{global, register_standard_units, standard_dimensions};

pub use quantia_core::{DimensionId, DimensionSignature, ErrorReport, QuantityError};
