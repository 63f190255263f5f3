//! Default fixture settings and their bounds.

use crate::units::DistanceUnit;

/// Upper bound on the number of points a single fixture can produce.
pub const MAX_POINTS: usize = 4096;

pub const PATH_UNITS: DistanceUnit = DistanceUnit::Inches;
pub const MODEL_UNITS: DistanceUnit = DistanceUnit::Inches;

pub const NUM_POINTS: u32 = 10;
pub const NUM_POINTS_MIN: u32 = 1;
pub const NUM_POINTS_MAX: u32 = MAX_POINTS as u32;

pub const SPACING: f64 = 1.0;
pub const SPACING_MIN: f64 = 0.1;
pub const SPACING_MAX: f64 = 1000.0;
pub const SPACING_UNITS: DistanceUnit = DistanceUnit::Inches;

/// Points per density unit.
pub const DENSITY: f64 = 60.0;
pub const DENSITY_MIN: f64 = 0.1;
pub const DENSITY_MAX: f64 = 1000.0;
pub const DENSITY_UNITS: DistanceUnit = DistanceUnit::Meters;

pub const PAD_MIN: f64 = 0.0;
pub const PAD_MAX: f64 = 10000.0;
