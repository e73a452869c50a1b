//! Dimension signature algebra
//!
//! A signature is the exponent vector of a physical quantity over the base
//! dimensions of a registry, e.g. speed is `Length^1 Time^-1`. Dimensions are
//! interned to [`DimensionId`]s and kept sorted by registration ordinal, so
//! equality is an ordered comparison and no term ever has exponent zero.

use std::fmt;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};
use smallvec::SmallVec;

/// An interned base dimension.
///
/// Ordered by the ordinal the registry assigned at first registration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DimensionId {
    ordinal: u16,
    name: Arc<str>,
}

impl DimensionId {
    pub fn new(ordinal: u16, name: impl Into<Arc<str>>) -> Self {
        DimensionId { ordinal, name: name.into() }
    }

    pub fn ordinal(&self) -> u16 {
        self.ordinal
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for DimensionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

type Terms = SmallVec<[(DimensionId, i32); 4]>;

/// Exponents of a quantity over base dimensions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DimensionSignature {
    /// Sorted by dimension, exponents never zero
    terms: Terms,
}

impl DimensionSignature {
    /// The empty signature of a pure number
    pub fn dimensionless() -> Self {
        Self::default()
    }

    /// `{dimension: 1}`, the signature of every simple registered unit
    pub fn simple(dimension: DimensionId) -> Self {
        let mut terms = Terms::new();
        terms.push((dimension, 1));
        DimensionSignature { terms }
    }

    /// Build from arbitrary terms: duplicates are summed, zeros dropped.
    pub fn from_terms<I>(terms: I) -> Self
    where
        I: IntoIterator<Item = (DimensionId, i32)>,
    {
        let mut raw: Terms = terms.into_iter().collect();
        raw.sort_by(|a, b| a.0.cmp(&b.0));

        let mut merged = Terms::new();
        for (dim, exp) in raw {
            if let Some((last, total)) = merged.last_mut() {
                if *last == dim {
                    *total += exp;
                    continue;
                }
            }
            merged.push((dim, exp));
        }
        merged.retain(|(_, exp)| *exp != 0);
        DimensionSignature { terms: merged }
    }

    pub fn is_dimensionless(&self) -> bool {
        self.terms.is_empty()
    }

    /// Number of dimensions with a nonzero exponent
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Exponent of `dimension`, zero when absent
    pub fn exponent(&self, dimension: &DimensionId) -> i32 {
        self.terms
            .iter()
            .find(|(dim, _)| dim == dimension)
            .map_or(0, |(_, exp)| *exp)
    }

    /// Exponent looked up by dimension name, zero when absent
    pub fn exponent_of(&self, name: &str) -> i32 {
        self.terms
            .iter()
            .find(|(dim, _)| dim.name() == name)
            .map_or(0, |(_, exp)| *exp)
    }

    pub fn terms(&self) -> impl Iterator<Item = (&DimensionId, i32)> + '_ {
        self.terms.iter().map(|(dim, exp)| (dim, *exp))
    }

    /// The single dimension of a `{dimension: 1}` signature
    pub fn as_simple(&self) -> Option<&DimensionId> {
        match self.terms.as_slice() {
            [(dim, 1)] => Some(dim),
            _ => None,
        }
    }

    /// Multiply quantities: add exponents
    pub fn combine(&self, other: &DimensionSignature) -> DimensionSignature {
        self.merge(other, 1)
    }

    /// Divide quantities: subtract exponents
    pub fn divide(&self, other: &DimensionSignature) -> DimensionSignature {
        self.merge(other, -1)
    }

    /// Raise to integer power (multiply exponents)
    pub fn power(&self, exp: i32) -> DimensionSignature {
        if exp == 0 {
            return Self::dimensionless();
        }
        DimensionSignature {
            terms: self.terms.iter().map(|(dim, e)| (dim.clone(), e * exp)).collect(),
        }
    }

    /// Invert (negate exponents)
    pub fn invert(&self) -> DimensionSignature {
        self.power(-1)
    }

    /// `Length.Time^-1` style rendering; empty for a dimensionless signature
    pub fn to_display_string(&self) -> String {
        self.to_string()
    }

    // Walks both sorted term lists once.
    fn merge(&self, other: &DimensionSignature, sign: i32) -> DimensionSignature {
        let (lhs, rhs) = (&self.terms, &other.terms);
        let (mut i, mut j) = (0, 0);
        let mut terms = Terms::new();

        loop {
            let (dim, exp) = match (lhs.get(i), rhs.get(j)) {
                (Some((a, ea)), Some((b, eb))) if a == b => {
                    i += 1;
                    j += 1;
                    (a.clone(), ea + sign * eb)
                }
                (Some((a, ea)), Some((b, _))) if a < b => {
                    i += 1;
                    (a.clone(), *ea)
                }
                (_, Some((b, eb))) => {
                    j += 1;
                    (b.clone(), sign * eb)
                }
                (Some((a, ea)), None) => {
                    i += 1;
                    (a.clone(), *ea)
                }
                (None, None) => break,
            };
            if exp != 0 {
                terms.push((dim, exp));
            }
        }

        DimensionSignature { terms }
    }
}

/// True iff both signatures have the same dimensions with the same exponents
pub fn signatures_equal(a: &DimensionSignature, b: &DimensionSignature) -> bool {
    a == b
}

impl fmt::Display for DimensionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (dim, exp)) in self.terms.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            if *exp == 1 {
                write!(f, "{}", dim)?;
            } else {
                write!(f, "{}^{}", dim, exp)?;
            }
        }
        Ok(())
    }
}

/// Serialized as a `{name: exponent}` map
impl Serialize for DimensionSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.terms.len()))?;
        for (dim, exp) in &self.terms {
            map.serialize_entry(dim.name(), exp)?;
        }
        map.end()
    }
}
