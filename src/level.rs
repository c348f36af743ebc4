//! Storage level lattice for inferred field types.
//!
//! Levels are totally ordered from the narrowest (`Boolean`) to the most
//! general (`String`). A column only ever moves up the lattice while values are
//! observed. Each level also carries the legacy ordinal code used by the
//! survey tooling (`String = 0` through `Boolean = 5`); combining two levels by
//! taking the smaller code is the same as taking the wider level.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldLevel {
    Boolean,
    Byte,
    Short,
    Int,
    Double,
    String,
}

impl FieldLevel {
    /// Every level in promotion order.
    pub const ALL: [FieldLevel; 6] = [
        FieldLevel::Boolean,
        FieldLevel::Byte,
        FieldLevel::Short,
        FieldLevel::Int,
        FieldLevel::Double,
        FieldLevel::String,
    ];

    /// Legacy ordinal code. Keep this assignment: [`FieldLevel::merge`] relies on it.
    pub const fn code(self) -> u8 {
        match self {
            FieldLevel::String => 0,
            FieldLevel::Double => 1,
            FieldLevel::Int => 2,
            FieldLevel::Short => 3,
            FieldLevel::Byte => 4,
            FieldLevel::Boolean => 5,
        }
    }

    /// Combines two per-wave levels into one that represents both.
    pub fn merge(self, other: FieldLevel) -> FieldLevel {
        if self.code() <= other.code() {
            self
        } else {
            other
        }
    }

    /// Returns true when `value` (already trimmed and non-empty) is representable
    /// at this level. Integer levels reserve their minimum value for "no data".
    pub fn accepts(self, value: &str) -> bool {
        match self {
            FieldLevel::Boolean | FieldLevel::Byte => parse_byte(value).is_some(),
            FieldLevel::Short => parse_short(value).is_some(),
            FieldLevel::Int => parse_int(value).is_some(),
            FieldLevel::Double => parse_double(value).is_some(),
            FieldLevel::String => true,
        }
    }

    /// First level at or above `self` that accepts `value`.
    pub fn classify(self, value: &str) -> Option<FieldLevel> {
        FieldLevel::ALL
            .into_iter()
            .filter(|level| *level >= self && *level != FieldLevel::Boolean)
            .find(|level| level.accepts(value))
    }

    pub fn java_type(self) -> &'static str {
        match self {
            FieldLevel::Boolean => "boolean",
            FieldLevel::Byte => "byte",
            FieldLevel::Short => "short",
            FieldLevel::Int => "int",
            FieldLevel::Double => "double",
            FieldLevel::String => "String",
        }
    }
}

impl fmt::Display for FieldLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.java_type())
    }
}

pub fn parse_byte(value: &str) -> Option<i8> {
    value.parse::<i8>().ok().filter(|v| *v != i8::MIN)
}

pub fn parse_short(value: &str) -> Option<i16> {
    value.parse::<i16>().ok().filter(|v| *v != i16::MIN)
}

pub fn parse_int(value: &str) -> Option<i32> {
    value.parse::<i32>().ok().filter(|v| *v != i32::MIN)
}

/// Accepts only what Java's `Double.parseDouble` also reads back. Rust takes
/// `inf` and `infinity` in any case, Java only `Infinity`.
pub fn parse_double(value: &str) -> Option<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| !v.is_nan())
        .filter(|v| v.is_finite() || java_infinity(value))
}

fn java_infinity(value: &str) -> bool {
    let unsigned = value
        .strip_prefix('+')
        .or_else(|| value.strip_prefix('-'))
        .unwrap_or(value);
    unsigned == "Infinity" || unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_by_code_matches_wider_level() {
        for a in FieldLevel::ALL {
            for b in FieldLevel::ALL {
                assert_eq!(a.merge(b), a.max(b), "{a} vs {b}");
                assert_eq!(a.merge(b), b.merge(a));
            }
        }
    }

    #[test]
    fn legacy_codes_count_down_the_lattice() {
        let codes: Vec<u8> = FieldLevel::ALL.into_iter().map(FieldLevel::code).collect();
        assert_eq!(codes, vec![5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn minimum_values_are_reserved() {
        assert!(!FieldLevel::Byte.accepts("-128"));
        assert!(FieldLevel::Byte.accepts("-127"));
        assert!(!FieldLevel::Short.accepts("-32768"));
        assert!(!FieldLevel::Int.accepts("-2147483648"));
        assert!(!FieldLevel::Double.accepts("NaN"));
    }

    #[test]
    fn infinity_needs_the_java_spelling() {
        assert_eq!(FieldLevel::Int.classify("inf"), Some(FieldLevel::String));
        assert_eq!(FieldLevel::Int.classify("INFINITY"), Some(FieldLevel::String));
        assert_eq!(FieldLevel::Int.classify("+inf"), Some(FieldLevel::String));
        assert_eq!(FieldLevel::Int.classify("-Infinity"), Some(FieldLevel::Double));
        assert_eq!(FieldLevel::Int.classify("Infinity"), Some(FieldLevel::Double));
        assert_eq!(FieldLevel::Int.classify("1e999"), Some(FieldLevel::Double));
    }

    #[test]
    fn classify_walks_up_the_lattice() {
        assert_eq!(FieldLevel::Boolean.classify("7"), Some(FieldLevel::Byte));
        assert_eq!(FieldLevel::Byte.classify("300"), Some(FieldLevel::Short));
        assert_eq!(FieldLevel::Byte.classify("70000"), Some(FieldLevel::Int));
        assert_eq!(FieldLevel::Short.classify("1.5"), Some(FieldLevel::Double));
        assert_eq!(FieldLevel::Int.classify("abc"), Some(FieldLevel::String));
        assert_eq!(FieldLevel::Double.classify("3"), Some(FieldLevel::Double));
        assert_eq!(FieldLevel::Byte.classify("-128"), Some(FieldLevel::Short));
    }
}
