//! Quantity type - a value with an associated unit and dimension signature

use std::cmp::Ordering;
use std::fmt;

use quantia_core::{DimensionSignature, QuantityError};
use serde::{Deserialize, Serialize};

use crate::registry::UnitRegistry;
use crate::unit::{UnitDefinition, UnitScale};

/// Absolute tolerance on base-unit values used by [`Quantity::equals`]
pub const EQUALITY_TOLERANCE: f64 = 1e-9;

/// Significant digits used by [`Quantity::to_display_string`]
pub const DISPLAY_PRECISION: usize = 6;

/// A physical quantity: a value in a unit, with its dimension signature.
///
/// Immutable: every operation returns a new quantity.
#[derive(Debug, Clone, Serialize)]
#[serde(into = "QuantityTransport")]
pub struct Quantity {
    value: f64,
    unit_symbol: String,
    /// Conversion of `unit_symbol` at construction time
    scale: UnitScale,
    signature: DimensionSignature,
    value_in_base_units: f64,
}

/// Plain serialized form of a quantity: `{"value": 5.0, "unit": "km"}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantityTransport {
    pub value: f64,
    pub unit: String,
}

impl From<Quantity> for QuantityTransport {
    fn from(q: Quantity) -> Self {
        QuantityTransport { value: q.value, unit: q.unit_symbol }
    }
}

impl Quantity {
    /// Create a quantity of a registered unit
    pub fn new(value: f64, unit_symbol: &str, registry: &UnitRegistry) -> Result<Self, QuantityError> {
        let unit = registry.get_unit_definition(unit_symbol)?;
        Ok(Self::from_definition(value, unit))
    }

    /// Create a quantity from an already resolved unit definition
    pub fn from_definition(value: f64, unit: &UnitDefinition) -> Self {
        let scale = unit.scale();
        Quantity {
            value,
            unit_symbol: unit.symbol.clone(),
            scale,
            signature: unit.signature(),
            value_in_base_units: scale.to_base(value),
        }
    }

    /// Rebuild a quantity from its transport form
    pub fn from_transport(transport: &QuantityTransport, registry: &UnitRegistry) -> Result<Self, QuantityError> {
        Self::new(transport.value, &transport.unit, registry)
    }

    /// Label a base-unit value with a unit synthesized from `signature`.
    ///
    /// A synthesized symbol that names a registered unit takes that unit's
    /// conversion. Any other symbol is built only from base units, so its
    /// factor is 1 and the value is the base value itself.
    pub(crate) fn from_base_units(
        value_in_base_units: f64,
        signature: DimensionSignature,
        registry: &UnitRegistry,
    ) -> Self {
        let unit_symbol = registry.derive_composite_unit_symbol(&signature);
        let scale = registry.unit(&unit_symbol).map_or(UnitScale::IDENTITY, UnitDefinition::scale);

        Quantity {
            value: scale.from_base(value_in_base_units),
            unit_symbol,
            scale,
            signature,
            value_in_base_units,
        }
    }

    /// Same unit as `self`, holding a different base value
    fn with_base_value(&self, value_in_base_units: f64) -> Self {
        Quantity {
            value: self.scale.from_base(value_in_base_units),
            unit_symbol: self.unit_symbol.clone(),
            scale: self.scale,
            signature: self.signature.clone(),
            value_in_base_units,
        }
    }

    /// The numeric value in this quantity's own unit
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit_symbol(&self) -> &str {
        &self.unit_symbol
    }

    pub fn signature(&self) -> &DimensionSignature {
        &self.signature
    }

    /// The canonical value used for all comparisons and arithmetic
    pub fn value_in_base_units(&self) -> f64 {
        self.value_in_base_units
    }

    pub fn is_dimensionless(&self) -> bool {
        self.signature.is_dimensionless()
    }

    fn require_same_dimension(&self, other: &Quantity, operation: &'static str) -> Result<(), QuantityError> {
        if self.signature != other.signature {
            return Err(QuantityError::dimension_mismatch(operation, &self.signature, &other.signature));
        }
        Ok(())
    }

    /// Add a quantity of the same dimension. The result keeps `self`'s unit.
    pub fn add(&self, other: &Quantity) -> Result<Quantity, QuantityError> {
        self.require_same_dimension(other, "add")?;
        Ok(self.with_base_value(self.value_in_base_units + other.value_in_base_units))
    }

    /// Subtract a quantity of the same dimension. The result keeps `self`'s unit.
    pub fn subtract(&self, other: &Quantity) -> Result<Quantity, QuantityError> {
        self.require_same_dimension(other, "subtract")?;
        Ok(self.with_base_value(self.value_in_base_units - other.value_in_base_units))
    }

    /// Multiply quantities; the unit of the result is synthesized
    pub fn multiply(&self, other: &Quantity, registry: &UnitRegistry) -> Quantity {
        let signature = self.signature.combine(&other.signature);
        Self::from_base_units(self.value_in_base_units * other.value_in_base_units, signature, registry)
    }

    /// Divide quantities; the unit of the result is synthesized.
    ///
    /// Fails when the divisor is zero in base units, so `0 degC` (273.15 K)
    /// is a valid divisor.
    pub fn divide(&self, other: &Quantity, registry: &UnitRegistry) -> Result<Quantity, QuantityError> {
        if other.value_in_base_units == 0.0 {
            return Err(QuantityError::DivisionByZero);
        }
        let signature = self.signature.divide(&other.signature);
        Ok(Self::from_base_units(
            self.value_in_base_units / other.value_in_base_units,
            signature,
            registry,
        ))
    }

    /// Convert to a registered unit of the same single dimension
    pub fn convert_to(&self, target_symbol: &str, registry: &UnitRegistry) -> Result<Quantity, QuantityError> {
        let target = registry.get_unit_definition(target_symbol)?;
        let target_signature = target.signature();
        if self.signature != target_signature {
            return Err(QuantityError::dimension_mismatch("convert", &self.signature, &target_signature));
        }
        Ok(Self::from_definition(target.from_base(self.value_in_base_units), target))
    }

    /// Equal within [`EQUALITY_TOLERANCE`] in base units; false across dimensions
    pub fn equals(&self, other: &Quantity) -> bool {
        self.signature == other.signature
            && (self.value_in_base_units - other.value_in_base_units).abs() < EQUALITY_TOLERANCE
    }

    pub fn is_less_than(&self, other: &Quantity) -> Result<bool, QuantityError> {
        self.require_same_dimension(other, "compare")?;
        Ok(self.value_in_base_units < other.value_in_base_units)
    }

    pub fn is_greater_than(&self, other: &Quantity) -> Result<bool, QuantityError> {
        self.require_same_dimension(other, "compare")?;
        Ok(self.value_in_base_units > other.value_in_base_units)
    }

    /// Value to 6 significant digits followed by the unit symbol
    pub fn to_display_string(&self) -> String {
        format!("{} {}", to_precision(self.value, DISPLAY_PRECISION), self.unit_symbol)
    }

    pub fn to_transport(&self) -> QuantityTransport {
        QuantityTransport { value: self.value, unit: self.unit_symbol.clone() }
    }
}

/// Format `value` with `digits` significant digits.
///
/// Fixed notation unless the decimal exponent is below -6 or at least
/// `digits`, then `d.ddddde+X`. Ties round away from zero.
fn to_precision(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let digits = digits.clamp(1, 17);
    if value == 0.0 {
        return format!("{:.*}", digits - 1, 0.0);
    }

    let magnitude = value.abs();
    let mut exp = decimal_exponent(magnitude);
    let mut mantissa = scale_by_pow10(magnitude, digits as i32 - 1 - exp).round() as u64;
    if mantissa >= 10u64.pow(digits as u32) {
        mantissa /= 10;
        exp += 1;
    }
    let mantissa = mantissa.to_string();
    let sign = if value < 0.0 { "-" } else { "" };

    if exp < -6 || exp >= digits as i32 {
        let (lead, rest) = mantissa.split_at(1);
        let exp_sign = if exp < 0 { '-' } else { '+' };
        if rest.is_empty() {
            format!("{}{}e{}{}", sign, lead, exp_sign, exp.abs())
        } else {
            format!("{}{}.{}e{}{}", sign, lead, rest, exp_sign, exp.abs())
        }
    } else if exp >= 0 {
        let (int, frac) = mantissa.split_at(exp as usize + 1);
        if frac.is_empty() {
            format!("{}{}", sign, int)
        } else {
            format!("{}{}.{}", sign, int, frac)
        }
    } else {
        let zeros = "0".repeat((-exp - 1) as usize);
        format!("{}0.{}{}", sign, zeros, mantissa)
    }
}

/// Exponent of the leading decimal digit of a finite nonzero magnitude
fn decimal_exponent(magnitude: f64) -> i32 {
    format!("{:e}", magnitude)
        .split_once('e')
        .and_then(|(_, exp)| exp.parse().ok())
        .unwrap_or_else(|| magnitude.log10().floor() as i32)
}

/// `magnitude * 10^power`, dividing for negative powers so exact ties stay exact
fn scale_by_pow10(magnitude: f64, power: i32) -> f64 {
    // Split so neither factor overflows for subnormal or huge magnitudes
    let (a, b) = (power / 2, power - power / 2);
    if power >= 0 {
        magnitude * 10f64.powi(a) * 10f64.powi(b)
    } else {
        magnitude / 10f64.powi(-a) / 10f64.powi(-b)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

/// `None` across dimensions.
///
/// Values within [`EQUALITY_TOLERANCE`] compare `Equal`, agreeing with
/// `PartialEq`. [`Quantity::is_less_than`] and [`Quantity::is_greater_than`]
/// compare strictly, so they can report an order that `partial_cmp` treats
/// as equal.
impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.signature != other.signature {
            None
        } else if self.equals(other) {
            Some(Ordering::Equal)
        } else {
            self.value_in_base_units.partial_cmp(&other.value_in_base_units)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::DimensionDefinition;
    use quantia_core::LookupKind;

    fn registry() -> UnitRegistry {
        UnitRegistry::standard()
    }

    fn q(registry: &UnitRegistry, value: f64, unit: &str) -> Quantity {
        Quantity::new(value, unit, registry).unwrap()
    }

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() < tolerance,
            "expected {} within {}, got {}",
            expected,
            tolerance,
            actual
        );
    }

    #[test]
    fn test_quantity_creation() {
        let r = registry();
        let km = q(&r, 5.0, "km");
        assert_eq!(km.value(), 5.0);
        assert_eq!(km.unit_symbol(), "km");
        assert_eq!(km.value_in_base_units(), 5000.0);
        assert_eq!(km.signature(), &DimensionSignature::simple(r.dimension_id("Length").unwrap().clone()));
    }

    #[test]
    fn test_unregistered_unit() {
        let r = registry();
        let err = Quantity::new(1.0, "parsecsquared", &r).unwrap_err();
        assert_eq!(err, QuantityError::NotFound { kind: LookupKind::Unit, name: "parsecsquared".into() });
    }

    #[test]
    fn test_add_keeps_left_unit() {
        let r = registry();
        let sum = q(&r, 5.0, "m").add(&q(&r, 100.0, "cm")).unwrap();
        assert_eq!(sum.value(), 6.0);
        assert_eq!(sum.unit_symbol(), "m");

        let sum = q(&r, 10.0, "m").add(&q(&r, 200.0, "cm")).unwrap();
        assert_eq!(sum.value(), 12.0);

        let sum = q(&r, 1.0, "km").add(&q(&r, 500.0, "m")).unwrap();
        assert_close(sum.value(), 1.5, 1e-12);
        assert_eq!(sum.unit_symbol(), "km");
    }

    #[test]
    fn test_subtract() {
        let r = registry();
        let diff = q(&r, 5.0, "kg").subtract(&q(&r, 500.0, "g")).unwrap();
        assert_eq!(diff.value(), 4.5);
        assert_eq!(diff.unit_symbol(), "kg");
    }

    #[test]
    fn test_add_dimension_mismatch() {
        let r = registry();
        let err = q(&r, 1.0, "m").add(&q(&r, 1.0, "s")).unwrap_err();
        match err {
            QuantityError::DimensionMismatch { operation, left, right } => {
                assert_eq!(operation, "add");
                assert_eq!(left, "Length");
                assert_eq!(right, "Time");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(q(&r, 1.0, "m").subtract(&q(&r, 1.0, "kg")).is_err());
    }

    #[test]
    fn test_divide_synthesizes_unit() {
        let r = registry();
        let speed = q(&r, 5.0, "m").divide(&q(&r, 2.0, "s"), &r).unwrap();
        assert_eq!(speed.value(), 2.5);
        assert_eq!(speed.unit_symbol(), "m/s");
        assert_eq!(speed.signature().exponent_of("Length"), 1);
        assert_eq!(speed.signature().exponent_of("Time"), -1);

        let sprint = q(&r, 100.0, "m").divide(&q(&r, 9.58, "s"), &r).unwrap();
        assert_close(sprint.value(), 100.0 / 9.58, 1e-12);
    }

    #[test]
    fn test_divide_uses_base_values() {
        let r = registry();
        let speed = q(&r, 1.0, "km").divide(&q(&r, 1.0, "h"), &r).unwrap();
        assert_close(speed.value(), 1000.0 / 3600.0, 1e-12);
        assert_eq!(speed.unit_symbol(), "m/s");
    }

    #[test]
    fn test_multiply_synthesizes_unit() {
        let r = registry();
        let area = q(&r, 2.0, "m").multiply(&q(&r, 3.0, "m"), &r);
        assert_eq!(area.value(), 6.0);
        assert_eq!(area.unit_symbol(), "m^2");

        let mixed = q(&r, 10.0, "m").multiply(&q(&r, 2.0, "s"), &r);
        assert_eq!(mixed.value_in_base_units(), 20.0);
        assert_eq!(mixed.unit_symbol(), "m.s");
    }

    #[test]
    fn test_multiply_back_to_simple_unit() {
        let r = registry();
        let speed = q(&r, 5.0, "m").divide(&q(&r, 2.0, "s"), &r).unwrap();
        let distance = speed.multiply(&q(&r, 1.0, "min"), &r);
        assert_eq!(distance.value(), 150.0);
        assert_eq!(distance.unit_symbol(), "m");
        assert_eq!(distance, q(&r, 150.0, "m"));
    }

    #[test]
    fn test_divide_to_dimensionless() {
        let r = registry();
        let ratio = q(&r, 1.0, "km").divide(&q(&r, 500.0, "m"), &r).unwrap();
        assert!(ratio.is_dimensionless());
        assert_eq!(ratio.value(), 2.0);
        assert_eq!(ratio.unit_symbol(), "dimensionless");
    }

    #[test]
    fn test_inverse_unit() {
        let r = registry();
        let one = q(&r, 2.0, "m").divide(&q(&r, 2.0, "m"), &r).unwrap();
        let frequency = one.divide(&q(&r, 4.0, "s"), &r).unwrap();
        assert_eq!(frequency.unit_symbol(), "1/s");
        assert_eq!(frequency.value(), 0.25);
    }

    #[test]
    fn test_derived_symbol_that_is_registered() {
        let mut r = registry();
        r.define_dimension(DimensionDefinition::new("Area", "m^2").with_unit("ha", 10_000.0))
            .unwrap();
        let area = q(&r, 2.0, "m").multiply(&q(&r, 3.0, "m"), &r);
        assert_eq!(area.unit_symbol(), "m^2");
        assert_eq!(area.value(), 6.0);
        // The computed signature survives even though "m^2" now belongs to Area
        assert_eq!(area.signature().exponent_of("Length"), 2);
        assert_eq!(area.signature().exponent_of("Area"), 0);
    }

    #[test]
    fn test_division_by_zero() {
        let r = registry();
        let err = q(&r, 10.0, "m").divide(&q(&r, 0.0, "s"), &r).unwrap_err();
        assert_eq!(err, QuantityError::DivisionByZero);
        assert_eq!(err.to_string(), "Division by zero");
    }

    #[test]
    fn test_divide_by_zero_celsius_is_allowed() {
        let r = registry();
        let result = q(&r, 273.15, "K").divide(&q(&r, 0.0, "degC"), &r).unwrap();
        assert_close(result.value(), 1.0, 1e-12);
        assert!(result.is_dimensionless());
    }

    #[test]
    fn test_convert_to() {
        let r = registry();
        let km = q(&r, 5000.0, "m").convert_to("km", &r).unwrap();
        assert_eq!(km.value(), 5.0);
        assert_eq!(km.unit_symbol(), "km");
    }

    #[test]
    fn test_temperature_conversions() {
        let r = registry();
        let c = q(&r, 0.0, "K").convert_to("degC", &r).unwrap();
        assert_eq!(c.value(), -273.15);
        assert_eq!(c.unit_symbol(), "degC");

        let k = q(&r, 0.0, "degC").convert_to("K", &r).unwrap();
        assert_eq!(k.value(), 273.15);

        let c = q(&r, 32.0, "degF").convert_to("degC", &r).unwrap();
        assert!(c.value().abs() < 1e-9, "Expected 0 C, got {}", c.value());

        let f = q(&r, 100.0, "degC").convert_to("degF", &r).unwrap();
        assert_close(f.value(), 212.0, 1e-9);

        let k = q(&r, -459.67, "degF").convert_to("K", &r).unwrap();
        assert_close(k.value(), 0.0, 1e-3);

        let k = q(&r, 491.67, "degR").convert_to("K", &r).unwrap();
        assert_close(k.value(), 273.15, 1e-3);
    }

    #[test]
    fn test_convert_across_dimensions_rejected() {
        let r = registry();
        let err = q(&r, 1.0, "m").convert_to("kg", &r).unwrap_err();
        assert!(matches!(err, QuantityError::DimensionMismatch { operation: "convert", .. }));

        let err = q(&r, 1.0, "m").convert_to("furlong", &r).unwrap_err();
        assert!(matches!(err, QuantityError::NotFound { .. }));
    }

    #[test]
    fn test_convert_composite_rejected() {
        let r = registry();
        let speed = q(&r, 5.0, "m").divide(&q(&r, 2.0, "s"), &r).unwrap();
        let err = speed.convert_to("m", &r).unwrap_err();
        assert!(matches!(err, QuantityError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_composite_add_keeps_composite_unit() {
        let r = registry();
        let a = q(&r, 5.0, "m").divide(&q(&r, 2.0, "s"), &r).unwrap();
        let b = q(&r, 1.0, "m").divide(&q(&r, 1.0, "s"), &r).unwrap();
        let sum = a.add(&b).unwrap();
        assert_eq!(sum.value(), 3.5);
        assert_eq!(sum.unit_symbol(), "m/s");
    }

    #[test]
    fn test_equality() {
        let r = registry();
        assert!(q(&r, 1.0, "km").equals(&q(&r, 1000.0, "m")));
        assert!(!q(&r, 1.0, "km").equals(&q(&r, 999.0, "m")));
        assert_eq!(q(&r, 1.0, "km"), q(&r, 1000.0, "m"));
        // Different dimensions compare unequal instead of failing
        assert!(!q(&r, 1.0, "m").equals(&q(&r, 1.0, "s")));
    }

    #[test]
    fn test_ordering() {
        let r = registry();
        let b = q(&r, 1000.0, "m");
        let c = q(&r, 999.0, "m");
        assert!(c.is_less_than(&b).unwrap());
        assert!(!b.is_less_than(&c).unwrap());
        assert!(b.is_greater_than(&c).unwrap());
        assert!(!c.is_greater_than(&b).unwrap());
        assert!(q(&r, 1.0, "km") > c);
        assert_eq!(q(&r, 1.0, "km").partial_cmp(&b), Some(Ordering::Equal));
    }

    #[test]
    fn test_ordering_dimension_mismatch() {
        let r = registry();
        let l = q(&r, 1.0, "m");
        let t = q(&r, 1.0, "s");
        assert!(matches!(l.is_less_than(&t), Err(QuantityError::DimensionMismatch { .. })));
        assert!(matches!(l.is_greater_than(&t), Err(QuantityError::DimensionMismatch { .. })));
        assert_eq!(l.partial_cmp(&t), None);
    }

    #[test]
    fn test_display() {
        let r = registry();
        assert_eq!(q(&r, 12.3456789, "m").to_display_string(), "12.3457 m");
        assert_eq!(q(&r, 6.0, "m").to_string(), "6.00000 m");
        assert_eq!(q(&r, -273.15, "degC").to_string(), "-273.150 degC");
        assert_eq!(q(&r, 0.0, "s").to_string(), "0.00000 s");
    }

    #[test]
    fn test_to_precision_exponential() {
        assert_eq!(to_precision(1234567.0, 6), "1.23457e+6");
        assert_eq!(to_precision(0.000000123, 6), "1.23000e-7");
        assert_eq!(to_precision(0.00012345, 6), "0.000123450");
        assert_eq!(to_precision(999999.5, 6), "1.00000e+6");
        assert_eq!(to_precision(f64::NAN, 6), "NaN");
        assert_eq!(to_precision(f64::NEG_INFINITY, 6), "-Infinity");
    }

    #[test]
    fn test_to_precision_ties_round_up() {
        assert_eq!(to_precision(100000.5, 6), "100001");
        assert_eq!(to_precision(1234565.0, 6), "1.23457e+6");
        assert_eq!(to_precision(12.25, 3), "12.3");
        assert_eq!(to_precision(-12.25, 3), "-12.3");
        assert_eq!(to_precision(0.125, 2), "0.13");
    }

    #[test]
    fn test_to_precision_extremes() {
        assert_eq!(to_precision(1e300, 6), "1.00000e+300");
        assert_eq!(to_precision(5e-324, 1), "5e-324");
        assert_eq!(to_precision(7.0, 1), "7");
    }

    #[test]
    fn test_affine_add_sums_base_values() {
        let r = registry();
        let sum = q(&r, 0.0, "degC").add(&q(&r, 0.0, "degC")).unwrap();
        assert_eq!(sum.unit_symbol(), "degC");
        assert_close(sum.value(), 273.15, 1e-9);
        assert_close(sum.value_in_base_units(), 546.3, 1e-9);
        assert_eq!(sum.to_display_string(), "273.150 degC");
    }

    #[test]
    fn test_force_and_energy_symbols() {
        let r = registry();
        let force = q(&r, 10.0, "kg")
            .multiply(&q(&r, 2.0, "m"), &r)
            .divide(&q(&r, 1.0, "s"), &r)
            .unwrap()
            .divide(&q(&r, 1.0, "s"), &r)
            .unwrap();
        assert_eq!(force.value(), 20.0);
        assert_eq!(force.unit_symbol(), "m.kg/s^2");
        assert_eq!(force.signature().exponent_of("Mass"), 1);
        assert_eq!(force.signature().exponent_of("Time"), -2);

        let energy = q(&r, 10.0, "kg")
            .multiply(&q(&r, 1.0, "m"), &r)
            .divide(&q(&r, 1.0, "s"), &r)
            .unwrap()
            .divide(&q(&r, 1.0, "s"), &r)
            .unwrap()
            .multiply(&q(&r, 1.0, "m"), &r);
        assert_eq!(energy.value(), 10.0);
        assert_eq!(energy.unit_symbol(), "m^2.kg/s^2");
    }

    #[test]
    fn test_partial_cmp_uses_tolerance() {
        let r = registry();
        let a = q(&r, 1.0 + 1e-10, "m");
        let b = q(&r, 1.0, "m");
        assert_eq!(a.partial_cmp(&b), Some(Ordering::Equal));
        assert!(a <= b);
        assert!(a.is_greater_than(&b).unwrap());
    }

    #[test]
    fn test_transport_round_trip() {
        let r = registry();
        let original = q(&r, 12.3456789, "m");
        let transport = original.to_transport();
        assert_eq!(transport, QuantityTransport { value: 12.3456789, unit: "m".to_string() });

        let rebuilt = Quantity::from_transport(&transport, &r).unwrap();
        assert_eq!(rebuilt, original);
    }

    #[test]
    fn test_serialize_as_transport() {
        let r = registry();
        let json = serde_json::to_value(q(&r, 32.0, "degF")).unwrap();
        assert_eq!(json, serde_json::json!({"value": 32.0, "unit": "degF"}));

        let transport: QuantityTransport = serde_json::from_value(json).unwrap();
        let rebuilt = Quantity::from_transport(&transport, &r).unwrap();
        assert_close(rebuilt.value_in_base_units(), 273.15, 1e-9);
    }
}
