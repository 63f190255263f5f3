//! Point placement modes.
//!
//! Each mode decides two things: the spacing between points (or `None` when
//! points map straight onto coordinates) and how many points a chain gets.
//! Both are answered from the same numbers so the count never disagrees with
//! what the resampler walks.

use enum_dispatch::enum_dispatch;

use crate::fixture::defaults::MAX_POINTS;
use crate::units::DistanceUnit;

#[enum_dispatch]
pub trait Placement {
    /// Arc-length spacing in model units, or `None` for direct mapping.
    fn spacing(&self, active_length: f64, model_units: DistanceUnit) -> Option<f64>;

    /// Number of points placed on a non-empty chain of `coordinates` vertices.
    fn count(&self, active_length: f64, model_units: DistanceUnit, coordinates: usize) -> usize;
}

/// One point per flattened coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Direct;

/// A fixed number of points spread evenly over the active length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumPoints {
    pub points: u32,
}

/// Points at a fixed distance, measured in `units`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spacing {
    pub distance: f64,
    pub units: DistanceUnit,
}

/// Points per unit of length, measured in `units`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Density {
    pub points_per_unit: f64,
    pub units: DistanceUnit,
}

impl NumPoints {
    fn clamped(&self) -> usize {
        (self.points as usize).clamp(1, MAX_POINTS)
    }
}

/// `floor(active / spacing)`, capped at [`MAX_POINTS`]. A spacing that is not
/// a positive finite number places nothing.
fn spacing_count(active_length: f64, spacing: f64) -> usize {
    if spacing > 0.0 && spacing.is_finite() {
        ((active_length / spacing).floor() as usize).min(MAX_POINTS)
    } else {
        0
    }
}

impl Placement for Direct {
    fn spacing(&self, _: f64, _: DistanceUnit) -> Option<f64> {
        None
    }

    fn count(&self, _: f64, _: DistanceUnit, coordinates: usize) -> usize {
        coordinates
    }
}

impl Placement for NumPoints {
    fn spacing(&self, active_length: f64, _: DistanceUnit) -> Option<f64> {
        let n = self.clamped();
        Some(if n > 1 {
            active_length / (n - 1) as f64
        } else {
            0.0
        })
    }

    fn count(&self, _: f64, _: DistanceUnit, _: usize) -> usize {
        self.clamped()
    }
}

impl Placement for Spacing {
    fn spacing(&self, _: f64, model_units: DistanceUnit) -> Option<f64> {
        Some(self.units.to(model_units, self.distance))
    }

    fn count(&self, active_length: f64, model_units: DistanceUnit, _: usize) -> usize {
        spacing_count(active_length, self.units.to(model_units, self.distance))
    }
}

impl Density {
    fn distance(&self, model_units: DistanceUnit) -> f64 {
        if self.points_per_unit > 0.0 {
            self.units.to(model_units, 1.0 / self.points_per_unit)
        } else {
            0.0
        }
    }
}

impl Placement for Density {
    fn spacing(&self, _: f64, model_units: DistanceUnit) -> Option<f64> {
        Some(self.distance(model_units))
    }

    fn count(&self, active_length: f64, model_units: DistanceUnit, _: usize) -> usize {
        spacing_count(active_length, self.distance(model_units))
    }
}

#[enum_dispatch(Placement)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointMode {
    Direct(Direct),
    NumPoints(NumPoints),
    Spacing(Spacing),
    Density(Density),
}

impl Default for PointMode {
    fn default() -> Self {
        PointMode::Direct(Direct)
    }
}

/// A point mode together with padding and traversal direction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlacementPolicy {
    pub mode: PointMode,
    /// Arc length skipped at the start of the traversal, in model units.
    pub pad_start: f64,
    /// Arc length skipped at the end of the traversal, in model units.
    pub pad_end: f64,
    pub reverse: bool,
}

impl PlacementPolicy {
    pub fn new(mode: impl Into<PointMode>) -> Self {
        Self {
            mode: mode.into(),
            ..Self::default()
        }
    }

    pub fn with_padding(mut self, pad_start: f64, pad_end: f64) -> Self {
        self.pad_start = pad_start;
        self.pad_end = pad_end;
        self
    }

    pub fn reversed(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// Negative or NaN padding counts as none.
    pub fn pad_start(&self) -> f64 {
        self.pad_start.max(0.0)
    }

    pub fn pad_end(&self) -> f64 {
        self.pad_end.max(0.0)
    }

    /// Path length left for placement once both pads are removed.
    pub fn active_length(&self, total_length: f64) -> f64 {
        (total_length - self.pad_start() - self.pad_end()).max(0.0)
    }
}
