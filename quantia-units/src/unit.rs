//! Unit and dimension definitions with affine conversion factors

use std::collections::BTreeMap;

use quantia_core::{DimensionId, DimensionSignature};
use serde::{Deserialize, Serialize, Serializer};

/// Affine map from a unit to its dimension's base unit:
/// `value_in_base = value * factor + offset`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitScale {
    pub factor: f64,
    /// Nonzero only for non-proportional units like Celsius and Fahrenheit
    #[serde(default)]
    pub offset: f64,
}

impl UnitScale {
    /// The scale of a base unit, and of every synthesized composite symbol
    pub const IDENTITY: UnitScale = UnitScale { factor: 1.0, offset: 0.0 };

    /// Proportional conversion (no offset)
    pub fn new(factor: f64) -> Self {
        UnitScale { factor, offset: 0.0 }
    }

    /// Conversion with offset (for temperature scales)
    pub fn with_offset(factor: f64, offset: f64) -> Self {
        UnitScale { factor, offset }
    }

    /// Exactly factor 1 and offset 0
    pub fn is_identity(&self) -> bool {
        self.factor == 1.0 && self.offset == 0.0
    }

    pub fn to_base(&self, value: f64) -> f64 {
        value * self.factor + self.offset
    }

    pub fn from_base(&self, value_in_base: f64) -> f64 {
        (value_in_base - self.offset) / self.factor
    }
}

/// A registered unit: its symbol, conversion and owning dimension
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitDefinition {
    pub symbol: String,
    pub factor: f64,
    pub offset: f64,
    #[serde(serialize_with = "serialize_dimension_name")]
    pub dimension: DimensionId,
}

impl UnitDefinition {
    pub fn new(symbol: impl Into<String>, scale: UnitScale, dimension: DimensionId) -> Self {
        UnitDefinition {
            symbol: symbol.into(),
            factor: scale.factor,
            offset: scale.offset,
            dimension,
        }
    }

    pub fn scale(&self) -> UnitScale {
        UnitScale::with_offset(self.factor, self.offset)
    }

    pub fn dimension_name(&self) -> &str {
        self.dimension.name()
    }

    /// `{dimension: 1}`, the signature a quantity in this unit carries
    pub fn signature(&self) -> DimensionSignature {
        DimensionSignature::simple(self.dimension.clone())
    }

    pub fn is_base(&self) -> bool {
        self.scale().is_identity()
    }

    pub fn to_base(&self, value: f64) -> f64 {
        self.scale().to_base(value)
    }

    pub fn from_base(&self, value_in_base: f64) -> f64 {
        self.scale().from_base(value_in_base)
    }
}

fn serialize_dimension_name<S: Serializer>(dim: &DimensionId, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(dim.name())
}

/// A dimension together with the units registered under it.
///
/// Deserializable so extra dimensions can be loaded from configuration:
///
/// ```json
/// {"name": "Angle", "baseUnitSymbol": "rad",
///  "units": {"deg": {"factor": 0.017453292519943295}}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionDefinition {
    pub name: String,
    pub base_unit_symbol: String,
    #[serde(default)]
    pub units: BTreeMap<String, UnitScale>,
}

impl DimensionDefinition {
    pub fn new(name: impl Into<String>, base_unit_symbol: impl Into<String>) -> Self {
        DimensionDefinition {
            name: name.into(),
            base_unit_symbol: base_unit_symbol.into(),
            units: BTreeMap::new(),
        }
    }

    /// Builder: add a proportional unit
    pub fn with_unit(self, symbol: impl Into<String>, factor: f64) -> Self {
        self.with_scale(symbol, UnitScale::new(factor))
    }

    /// Builder: add an affine unit
    pub fn with_affine_unit(self, symbol: impl Into<String>, factor: f64, offset: f64) -> Self {
        self.with_scale(symbol, UnitScale::with_offset(factor, offset))
    }

    pub fn with_scale(mut self, symbol: impl Into<String>, scale: UnitScale) -> Self {
        self.units.insert(symbol.into(), scale);
        self
    }
}
