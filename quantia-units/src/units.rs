//! Standard unit definitions - the seven SI base dimensions

use std::sync::LazyLock;

use parking_lot::RwLock;
use quantia_core::QuantityError;

use crate::registry::UnitRegistry;
use crate::unit::DimensionDefinition;

/// Process-wide registry, seeded with the standard dimensions on first use
static GLOBAL: LazyLock<RwLock<UnitRegistry>> = LazyLock::new(|| RwLock::new(UnitRegistry::standard()));

/// Shared registry for callers that want global access.
///
/// Take the write lock to register extra dimensions (typically at startup)
/// and the read lock for everything else.
pub fn global() -> &'static RwLock<UnitRegistry> {
    &GLOBAL
}

impl UnitRegistry {
    /// A new registry holding the standard dimensions
    pub fn standard() -> Self {
        let mut registry = UnitRegistry::new();
        register_standard_units(&mut registry).expect("standard unit table is self-consistent");
        registry
    }
}

/// Register the seven standard dimensions and their units
pub fn register_standard_units(registry: &mut UnitRegistry) -> Result<(), QuantityError> {
    for definition in standard_dimensions() {
        registry.define_dimension(definition)?;
    }
    Ok(())
}

/// The standard dimension set, in registration order
pub fn standard_dimensions() -> Vec<DimensionDefinition> {
    vec![
        length(),
        mass(),
        time(),
        electric_current(),
        temperature(),
        amount_of_substance(),
        luminous_intensity(),
    ]
}

fn length() -> DimensionDefinition {
    DimensionDefinition::new("Length", "m")
        .with_unit("m", 1.0)
        .with_unit("km", 1000.0)
        .with_unit("cm", 0.01)
        .with_unit("mm", 0.001)
        .with_unit("µm", 1e-6)
        .with_unit("nm", 1e-9)
        .with_unit("pm", 1e-12)
        // Imperial/US
        .with_unit("ft", 0.3048)
        .with_unit("in", 0.0254)
        .with_unit("yd", 0.9144)
        .with_unit("mi", 1609.344)
        .with_unit("nmi", 1852.0)
        // Astronomical
        .with_unit("au", 1.495978707e11)
        .with_unit("ly", 9.4607304725808e15)
        .with_unit("pc", 3.08567758149137e16)
}

fn mass() -> DimensionDefinition {
    DimensionDefinition::new("Mass", "kg")
        .with_unit("kg", 1.0)
        .with_unit("g", 0.001)
        .with_unit("mg", 1e-6)
        .with_unit("µg", 1e-9)
        .with_unit("t", 1000.0)
        .with_unit("lb", 0.45359237)
        .with_unit("oz", 0.028349523125)
        .with_unit("st", 6.35029318)
        .with_unit("ton", 907.18474) // US short ton
        .with_unit("lton", 1016.0469088) // Imperial long ton
}

fn time() -> DimensionDefinition {
    DimensionDefinition::new("Time", "s")
        .with_unit("s", 1.0)
        .with_unit("ms", 0.001)
        .with_unit("µs", 1e-6)
        .with_unit("ns", 1e-9)
        .with_unit("min", 60.0)
        .with_unit("h", 3600.0)
        .with_unit("d", 86400.0)
        .with_unit("wk", 604800.0)
        .with_unit("yr", 31557600.0) // Julian year
}

fn electric_current() -> DimensionDefinition {
    DimensionDefinition::new("ElectricCurrent", "A")
        .with_unit("A", 1.0)
        .with_unit("mA", 1e-3)
        .with_unit("kA", 1e3)
        .with_unit("µA", 1e-6)
}

fn temperature() -> DimensionDefinition {
    DimensionDefinition::new("Temperature", "K")
        .with_unit("K", 1.0)
        .with_affine_unit("degC", 1.0, 273.15)
        // 0 degF is 255.3722... K
        .with_affine_unit("degF", 5.0 / 9.0, 255.37222222222222)
        .with_unit("degR", 5.0 / 9.0)
}

fn amount_of_substance() -> DimensionDefinition {
    DimensionDefinition::new("AmountOfSubstance", "mol")
        .with_unit("mol", 1.0)
        .with_unit("mmol", 1e-3)
        .with_unit("kmol", 1e3)
        .with_unit("µmol", 1e-6)
}

fn luminous_intensity() -> DimensionDefinition {
    DimensionDefinition::new("LuminousIntensity", "cd")
        .with_unit("cd", 1.0)
        .with_unit("mcd", 1e-3)
        .with_unit("kcd", 1e3)
}
