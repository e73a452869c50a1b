//! Unit registry: dimension definitions and unit symbols
//!
//! The registry is an ordinary value. Build one per test, or share the
//! process-wide instance from [`crate::global`]. Registration is
//! last-write-wins: redefining a dimension or reusing a unit symbol succeeds
//! and is reported as a [`RegistrationWarning`].

use std::collections::HashMap;
use std::fmt;

use quantia_core::{DimensionId, DimensionSignature, QuantityError};
use serde::Serialize;
use tracing::{debug, warn};

use crate::unit::{DimensionDefinition, UnitDefinition, UnitScale};

/// A non-fatal overwrite that happened during registration
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegistrationWarning {
    DimensionRedefined { name: String },
    UnitRedefined { symbol: String, previous_dimension: String, dimension: String },
}

impl fmt::Display for RegistrationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationWarning::DimensionRedefined { name } => {
                write!(f, "Dimension \"{}\" is already defined. Overwriting.", name)
            }
            RegistrationWarning::UnitRedefined { symbol, .. } => {
                write!(f, "Unit symbol \"{}\" is already defined. Overwriting.", symbol)
            }
        }
    }
}

struct RegisteredDimension {
    id: DimensionId,
    definition: DimensionDefinition,
}

/// Registry of dimensions and the units defined under them
#[derive(Default)]
pub struct UnitRegistry {
    /// Registration order; index is the dimension ordinal
    dimensions: Vec<RegisteredDimension>,
    by_name: HashMap<String, usize>,
    units: HashMap<String, UnitDefinition>,
}

impl UnitRegistry {
    /// An empty registry. See [`UnitRegistry::standard`] for the seeded one.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dimension and its units.
    ///
    /// The base unit is registered with factor 1 and offset 0 unless it is
    /// already present, in which case it must already be an identity unit of
    /// this dimension. Validation happens before anything is written, so a
    /// `Consistency` error leaves the registry untouched.
    pub fn define_dimension(
        &mut self,
        definition: DimensionDefinition,
    ) -> Result<Vec<RegistrationWarning>, QuantityError> {
        self.check_base_unit(&definition)?;

        let existing = self.by_name.get(&definition.name).copied();
        let index = existing.unwrap_or(self.dimensions.len());
        let ordinal = u16::try_from(index).map_err(|_| {
            QuantityError::Consistency(format!(
                "cannot register dimension \"{}\": too many dimensions",
                definition.name
            ))
        })?;
        let id = DimensionId::new(ordinal, definition.name.as_str());

        let mut warnings = Vec::new();
        if existing.is_some() {
            warn!(dimension = %definition.name, "dimension already defined, overwriting");
            warnings.push(RegistrationWarning::DimensionRedefined { name: definition.name.clone() });
        }

        for (symbol, scale) in &definition.units {
            if let Some(previous) = self.units.get(symbol) {
                warn!(unit = %symbol, previous = %previous.dimension, "unit symbol already defined, overwriting");
                warnings.push(RegistrationWarning::UnitRedefined {
                    symbol: symbol.clone(),
                    previous_dimension: previous.dimension_name().to_string(),
                    dimension: definition.name.clone(),
                });
            }
            self.units
                .insert(symbol.clone(), UnitDefinition::new(symbol.clone(), *scale, id.clone()));
        }

        if !self.units.contains_key(&definition.base_unit_symbol) {
            let base = UnitDefinition::new(definition.base_unit_symbol.clone(), UnitScale::IDENTITY, id.clone());
            self.units.insert(definition.base_unit_symbol.clone(), base);
        }

        debug!(
            dimension = %definition.name,
            base = %definition.base_unit_symbol,
            units = definition.units.len(),
            "registered dimension"
        );

        let entry = RegisteredDimension { id, definition };
        match existing {
            Some(i) => self.dimensions[i] = entry,
            None => {
                self.by_name.insert(entry.definition.name.clone(), index);
                self.dimensions.push(entry);
            }
        }

        Ok(warnings)
    }

    fn check_base_unit(&self, definition: &DimensionDefinition) -> Result<(), QuantityError> {
        let base = &definition.base_unit_symbol;

        if let Some(scale) = definition.units.get(base) {
            if !scale.is_identity() {
                return Err(non_identity_base(definition));
            }
            return Ok(());
        }

        if let Some(registered) = self.units.get(base) {
            if !registered.is_base() {
                return Err(non_identity_base(definition));
            }
            if registered.dimension_name() != definition.name {
                return Err(QuantityError::Consistency(format!(
                    "Base unit \"{}\" is registered to dimension \"{}\" but defined as base for \"{}\".",
                    base,
                    registered.dimension_name(),
                    definition.name
                )));
            }
        }

        Ok(())
    }

    pub fn get_unit_definition(&self, symbol: &str) -> Result<&UnitDefinition, QuantityError> {
        self.unit(symbol).ok_or_else(|| QuantityError::unit_not_found(symbol))
    }

    /// Unit lookup that treats absence as an ordinary outcome
    pub fn unit(&self, symbol: &str) -> Option<&UnitDefinition> {
        self.units.get(symbol)
    }

    pub fn get_dimension_definition(&self, name: &str) -> Result<&DimensionDefinition, QuantityError> {
        self.by_name
            .get(name)
            .map(|&i| &self.dimensions[i].definition)
            .ok_or_else(|| QuantityError::dimension_not_found(name))
    }

    /// All dimensions in registration order
    pub fn list_dimensions(&self) -> impl ExactSizeIterator<Item = &DimensionDefinition> + '_ {
        self.dimensions.iter().map(|d| &d.definition)
    }

    /// All registered units, in no particular order
    pub fn units(&self) -> impl Iterator<Item = &UnitDefinition> + '_ {
        self.units.values()
    }

    /// Whether `symbol` names a registered unit
    pub fn exists(&self, symbol: &str) -> bool {
        self.units.contains_key(symbol)
    }

    /// The interned id of a registered dimension
    pub fn dimension_id(&self, name: &str) -> Option<&DimensionId> {
        self.by_name.get(name).map(|&i| &self.dimensions[i].id)
    }

    /// Base unit symbol of `dimension`, if this registry interned it
    pub fn base_unit_symbol(&self, dimension: &DimensionId) -> Option<&str> {
        self.dimensions
            .get(usize::from(dimension.ordinal()))
            .filter(|d| d.id == *dimension)
            .map(|d| d.definition.base_unit_symbol.as_str())
    }

    /// Synthesize a unit symbol for `signature` from base unit symbols.
    ///
    /// `{}` gives `dimensionless`, `{Length: 1}` gives `m`, and otherwise
    /// positive exponents form the numerator and negative ones the
    /// denominator, ordered by registration: `m/s`, `m^2`, `m.kg/s^2`, `1/s`.
    pub fn derive_composite_unit_symbol(&self, signature: &DimensionSignature) -> String {
        if signature.is_dimensionless() {
            return "dimensionless".to_string();
        }

        if let Some(dimension) = signature.as_simple() {
            if let Some(base) = self.base_unit_symbol(dimension) {
                return base.to_string();
            }
        }

        let mut numerator = Vec::new();
        let mut denominator = Vec::new();
        for (dimension, exp) in signature.terms() {
            let Some(base) = self.base_unit_symbol(dimension) else {
                debug!(dimension = %dimension, "no base unit for dimension, leaving it out of the symbol");
                continue;
            };
            let part = if exp.abs() == 1 {
                base.to_string()
            } else {
                format!("{}^{}", base, exp.abs())
            };
            if exp > 0 {
                numerator.push(part);
            } else {
                denominator.push(part);
            }
        }

        let num = numerator.join(".");
        let den = denominator.join(".");
        match (numerator.is_empty(), denominator.is_empty()) {
            (true, false) => format!("1/{}", den),
            (true, true) => "1".to_string(),
            (false, true) => num,
            (false, false) => format!("{}/{}", num, den),
        }
    }
}

fn non_identity_base(definition: &DimensionDefinition) -> QuantityError {
    QuantityError::Consistency(format!(
        "Base unit \"{}\" for dimension \"{}\" must have a conversion factor of 1 and offset of 0.",
        definition.base_unit_symbol, definition.name
    ))
}
