//! Linear distance units.
//!
//! Inches are the pivot unit: every other unit is described by how many of it
//! fit in one inch, so a conversion is a divide followed by a multiply.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A linear distance unit used for path data, model space, spacing and density.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum DistanceUnit {
    #[default]
    Inches,
    Feet,
    Yards,
    Millimeters,
    Centimeters,
    Meters,
}

impl DistanceUnit {
    /// Every unit, in display order.
    pub const ALL: [DistanceUnit; 6] = [
        DistanceUnit::Inches,
        DistanceUnit::Feet,
        DistanceUnit::Yards,
        DistanceUnit::Millimeters,
        DistanceUnit::Centimeters,
        DistanceUnit::Meters,
    ];

    /// Plural display name ("Inches").
    pub const fn name(self) -> &'static str {
        match self {
            DistanceUnit::Inches => "Inches",
            DistanceUnit::Feet => "Feet",
            DistanceUnit::Yards => "Yards",
            DistanceUnit::Millimeters => "Millimeters",
            DistanceUnit::Centimeters => "Centimeters",
            DistanceUnit::Meters => "Meters",
        }
    }

    /// Singular name, used for "points per <unit>" labels.
    pub const fn singular(self) -> &'static str {
        match self {
            DistanceUnit::Inches => "Inch",
            DistanceUnit::Feet => "Foot",
            DistanceUnit::Yards => "Yard",
            DistanceUnit::Millimeters => "Millimeter",
            DistanceUnit::Centimeters => "Centimeter",
            DistanceUnit::Meters => "Meter",
        }
    }

    pub const fn abbrev(self) -> &'static str {
        match self {
            DistanceUnit::Inches => "in",
            DistanceUnit::Feet => "ft",
            DistanceUnit::Yards => "yd",
            DistanceUnit::Millimeters => "mm",
            DistanceUnit::Centimeters => "cm",
            DistanceUnit::Meters => "m",
        }
    }

    /// Number of this unit per inch.
    pub const fn scale_factor(self) -> f64 {
        match self {
            DistanceUnit::Inches => 1.0,
            DistanceUnit::Feet => 1.0 / 12.0,
            DistanceUnit::Yards => 1.0 / 36.0,
            DistanceUnit::Millimeters => 25.4,
            DistanceUnit::Centimeters => 2.54,
            DistanceUnit::Meters => 0.0254,
        }
    }

    /// Position of this unit in [`DistanceUnit::ALL`].
    pub fn index(self) -> usize {
        DistanceUnit::ALL
            .iter()
            .position(|u| *u == self)
            .unwrap_or_default()
    }

    pub fn from_index(index: usize) -> Option<DistanceUnit> {
        DistanceUnit::ALL.get(index).copied()
    }

    /// Convert `value` from this unit into `to`.
    #[inline]
    pub fn to(self, to: DistanceUnit, value: f64) -> f64 {
        convert(self, to, value)
    }

    /// Convert `value` from `from` into this unit.
    #[inline]
    pub fn from(self, from: DistanceUnit, value: f64) -> f64 {
        convert(from, self, value)
    }
}

/// Convert a distance between units.
///
/// Converting a unit to itself returns `value` unchanged, bit for bit.
#[inline]
pub fn convert(from: DistanceUnit, to: DistanceUnit, value: f64) -> f64 {
    if from == to {
        return value;
    }
    value / from.scale_factor() * to.scale_factor()
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a unit name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown distance unit: {0}")]
pub struct UnknownUnit(pub String);

impl FromStr for DistanceUnit {
    type Err = UnknownUnit;

    /// Accepts the plural name, the singular name or the abbreviation, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        DistanceUnit::ALL
            .into_iter()
            .find(|u| {
                s.eq_ignore_ascii_case(u.name())
                    || s.eq_ignore_ascii_case(u.singular())
                    || s.eq_ignore_ascii_case(u.abbrev())
            })
            .ok_or_else(|| UnknownUnit(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn identity_conversion_is_exact() {
        for unit in DistanceUnit::ALL {
            for v in [0.0, 1.0, 0.1, 123.456, 1e9] {
                assert_eq!(convert(unit, unit, v), v);
            }
        }
    }

    #[test]
    fn known_ratios() {
        assert!(close(convert(DistanceUnit::Feet, DistanceUnit::Inches, 1.0), 12.0));
        assert!(close(convert(DistanceUnit::Yards, DistanceUnit::Feet, 1.0), 3.0));
        assert!(close(convert(DistanceUnit::Inches, DistanceUnit::Millimeters, 1.0), 25.4));
        assert!(close(convert(DistanceUnit::Meters, DistanceUnit::Centimeters, 1.0), 100.0));
        assert!(close(DistanceUnit::Millimeters.to(DistanceUnit::Meters, 1000.0), 1.0));
        assert!(close(DistanceUnit::Inches.from(DistanceUnit::Feet, 2.0), 24.0));
    }

    #[test]
    fn round_trip_every_pair() {
        for a in DistanceUnit::ALL {
            for b in DistanceUnit::ALL {
                for v in [0.0, 0.5, 1.0, 17.25, 1000.0, 98765.4321] {
                    let there = convert(a, b, v);
                    assert!(there.is_finite());
                    assert!(close(convert(b, a, there), v), "{a} -> {b} -> {a} for {v}");
                }
            }
        }
    }

    #[test]
    fn conversion_is_transitive() {
        for a in DistanceUnit::ALL {
            for b in DistanceUnit::ALL {
                for c in DistanceUnit::ALL {
                    let direct = convert(a, c, 42.0);
                    let hop = convert(b, c, convert(a, b, 42.0));
                    assert!(close(direct, hop), "{a} -> {b} -> {c}");
                }
            }
        }
    }

    #[test]
    fn parse_names() {
        assert_eq!("Inches".parse::<DistanceUnit>(), Ok(DistanceUnit::Inches));
        assert_eq!("foot".parse::<DistanceUnit>(), Ok(DistanceUnit::Feet));
        assert_eq!("MM".parse::<DistanceUnit>(), Ok(DistanceUnit::Millimeters));
        assert_eq!(" m ".parse::<DistanceUnit>(), Ok(DistanceUnit::Meters));
        assert!("furlong".parse::<DistanceUnit>().is_err());
    }

    #[test]
    fn index_round_trip() {
        for unit in DistanceUnit::ALL {
            assert_eq!(DistanceUnit::from_index(unit.index()), Some(unit));
        }
        assert_eq!(DistanceUnit::from_index(6), None);
    }
}
