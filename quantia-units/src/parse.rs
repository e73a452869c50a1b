//! Quantity string parsing - "5 km", "100kg", "32 degF", "km->mi"

use quantia_core::QuantityError;

use crate::quantity::Quantity;
use crate::registry::UnitRegistry;

/// Parse a quantity string like "5 m", "100kg" or "-3.2e3 mm"
pub fn parse_quantity(s: &str, registry: &UnitRegistry) -> Result<Quantity, QuantityError> {
    let (number, unit) = split_quantity(s)?;
    let value: f64 = number
        .parse()
        .map_err(|_| QuantityError::Parse(format!("invalid number: {}", number)))?;
    Quantity::new(value, unit, registry)
}

/// Split "12.5 km" into ("12.5", "km")
fn split_quantity(s: &str) -> Result<(&str, &str), QuantityError> {
    let s = s.trim();
    let mut end = 0;
    let mut prev: Option<char> = None;

    for (i, c) in s.char_indices() {
        let rest = &s[i + c.len_utf8()..];
        let in_number = match c {
            '0'..='9' | '.' => true,
            '+' | '-' => matches!(prev, None | Some('e') | Some('E')),
            // Exponent marker only when digits follow, so "5em" keeps its unit
            'e' | 'E' => prev.is_some_and(|p| p.is_ascii_digit() || p == '.') && starts_exponent(rest),
            _ => false,
        };
        if !in_number {
            break;
        }
        end = i + c.len_utf8();
        prev = Some(c);
    }

    let number = &s[..end];
    let unit = s[end..].trim();

    if !number.chars().any(|c| c.is_ascii_digit()) {
        return Err(QuantityError::Parse(format!("no number found in: {}", s)));
    }
    if unit.is_empty() {
        return Err(QuantityError::Parse(format!("no unit found in: {}", s)));
    }

    Ok((number, unit))
}

fn starts_exponent(rest: &str) -> bool {
    let digits = rest.strip_prefix(['+', '-']).unwrap_or(rest);
    digits.starts_with(|c: char| c.is_ascii_digit())
}

/// Parse a conversion specification like "kg->lb" or "degC to degF"
pub fn parse_conversion(s: &str) -> Result<(&str, &str), QuantityError> {
    const SEPARATORS: [&str; 4] = ["->", "→", " to ", " in "];

    let invalid = || {
        QuantityError::Parse(format!("invalid conversion format: {}, expected 'unit1->unit2'", s))
    };

    let (from, to) = SEPARATORS
        .iter()
        .find_map(|sep| s.split_once(sep))
        .ok_or_else(invalid)?;

    let (from, to) = (from.trim(), to.trim());
    if from.is_empty() || to.is_empty() || to.contains("->") {
        return Err(invalid());
    }

    Ok((from, to))
}
