//! User-facing fixture configuration.
//!
//! Setters validate against the bounds in [`defaults`](super::defaults) and
//! reject bad input with a [`SettingError`]; nothing is clamped silently.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::errors::SettingError;
use crate::fixture::defaults as d;
use crate::fixture::policy::{Density, Direct, NumPoints, PlacementPolicy, PointMode, Spacing};
use crate::group::ParamValue;
use crate::types::finite;
use crate::units::DistanceUnit;

/// Which point mode a fixture uses; the numbers live on [`FixtureSettings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointModeKind {
    Direct,
    Density,
    #[default]
    Spacing,
    NumPoints,
}

impl PointModeKind {
    pub const ALL: [PointModeKind; 4] = [
        PointModeKind::Direct,
        PointModeKind::Density,
        PointModeKind::Spacing,
        PointModeKind::NumPoints,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            PointModeKind::Direct => "Direct",
            PointModeKind::Density => "Density",
            PointModeKind::Spacing => "Spacing",
            PointModeKind::NumPoints => "NumPoints",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<PointModeKind> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for PointModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when a point mode label is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown point mode: {0}")]
pub struct UnknownPointMode(pub String);

impl FromStr for PointModeKind {
    type Err = UnknownPointMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPointMode(s.to_string()))
    }
}

/// A fixture parameter addressable by name, used for group sync and metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixtureParam {
    PathUnits,
    ModelUnits,
    PointMode,
    NumPoints,
    Spacing,
    SpacingUnits,
    Density,
    DensityUnits,
    Reverse,
    PadStart,
    PadEnd,
}

impl FixtureParam {
    /// Export order.
    pub const ALL: [FixtureParam; 11] = [
        FixtureParam::PathUnits,
        FixtureParam::ModelUnits,
        FixtureParam::PointMode,
        FixtureParam::NumPoints,
        FixtureParam::Spacing,
        FixtureParam::SpacingUnits,
        FixtureParam::Density,
        FixtureParam::DensityUnits,
        FixtureParam::Reverse,
        FixtureParam::PadStart,
        FixtureParam::PadEnd,
    ];

    /// Parameters an import keeps in step across its fixtures.
    pub const SYNCED: [FixtureParam; 8] = [
        FixtureParam::PathUnits,
        FixtureParam::ModelUnits,
        FixtureParam::PointMode,
        FixtureParam::Spacing,
        FixtureParam::NumPoints,
        FixtureParam::Reverse,
        FixtureParam::PadStart,
        FixtureParam::PadEnd,
    ];

    /// Metadata key.
    pub const fn key(self) -> &'static str {
        match self {
            FixtureParam::PathUnits => "pathUnits",
            FixtureParam::ModelUnits => "modelUnits",
            FixtureParam::PointMode => "pointMode",
            FixtureParam::NumPoints => "numPoints",
            FixtureParam::Spacing => "spacing",
            FixtureParam::SpacingUnits => "spacingUnits",
            FixtureParam::Density => "density",
            FixtureParam::DensityUnits => "densityUnits",
            FixtureParam::Reverse => "reversePath",
            FixtureParam::PadStart => "padStart",
            FixtureParam::PadEnd => "padEnd",
        }
    }
}

impl fmt::Display for FixtureParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

fn bounded(name: &'static str, value: f64, min: f64, max: f64) -> Result<f64, SettingError> {
    let value = finite(value).map_err(|source| SettingError::Numeric { name, source })?;
    if value < min || value > max {
        return Err(SettingError::OutOfRange {
            name,
            value,
            min,
            max,
        });
    }
    Ok(value)
}

fn unit_index(param: FixtureParam, index: usize) -> Result<DistanceUnit, SettingError> {
    DistanceUnit::from_index(index).ok_or(SettingError::OutOfRange {
        name: param.key(),
        value: index as f64,
        min: 0.0,
        max: (DistanceUnit::ALL.len() - 1) as f64,
    })
}

/// Validated configuration of one path fixture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixtureSettings {
    path_units: DistanceUnit,
    model_units: DistanceUnit,
    point_mode: PointModeKind,
    num_points: u32,
    spacing: f64,
    spacing_units: DistanceUnit,
    density: f64,
    density_units: DistanceUnit,
    reverse: bool,
    pad_start: f64,
    pad_end: f64,
}

impl Default for FixtureSettings {
    fn default() -> Self {
        Self {
            path_units: d::PATH_UNITS,
            model_units: d::MODEL_UNITS,
            point_mode: PointModeKind::default(),
            num_points: d::NUM_POINTS,
            spacing: d::SPACING,
            spacing_units: d::SPACING_UNITS,
            density: d::DENSITY,
            density_units: d::DENSITY_UNITS,
            reverse: false,
            pad_start: 0.0,
            pad_end: 0.0,
        }
    }
}

impl FixtureSettings {
    pub fn path_units(&self) -> DistanceUnit {
        self.path_units
    }

    pub fn model_units(&self) -> DistanceUnit {
        self.model_units
    }

    pub fn point_mode(&self) -> PointModeKind {
        self.point_mode
    }

    pub fn num_points(&self) -> u32 {
        self.num_points
    }

    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    pub fn spacing_units(&self) -> DistanceUnit {
        self.spacing_units
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    pub fn density_units(&self) -> DistanceUnit {
        self.density_units
    }

    pub fn reverse(&self) -> bool {
        self.reverse
    }

    pub fn pad_start(&self) -> f64 {
        self.pad_start
    }

    pub fn pad_end(&self) -> f64 {
        self.pad_end
    }

    pub fn set_path_units(&mut self, units: DistanceUnit) {
        self.path_units = units;
    }

    pub fn set_model_units(&mut self, units: DistanceUnit) {
        self.model_units = units;
    }

    pub fn set_point_mode(&mut self, mode: PointModeKind) {
        self.point_mode = mode;
    }

    pub fn set_num_points(&mut self, n: u32) -> Result<(), SettingError> {
        if !(d::NUM_POINTS_MIN..=d::NUM_POINTS_MAX).contains(&n) {
            return Err(SettingError::OutOfRange {
                name: FixtureParam::NumPoints.key(),
                value: f64::from(n),
                min: f64::from(d::NUM_POINTS_MIN),
                max: f64::from(d::NUM_POINTS_MAX),
            });
        }
        self.num_points = n;
        Ok(())
    }

    pub fn set_spacing(&mut self, spacing: f64) -> Result<(), SettingError> {
        self.spacing = bounded(
            FixtureParam::Spacing.key(),
            spacing,
            d::SPACING_MIN,
            d::SPACING_MAX,
        )?;
        Ok(())
    }

    pub fn set_spacing_units(&mut self, units: DistanceUnit) {
        self.spacing_units = units;
    }

    pub fn set_density(&mut self, density: f64) -> Result<(), SettingError> {
        self.density = bounded(
            FixtureParam::Density.key(),
            density,
            d::DENSITY_MIN,
            d::DENSITY_MAX,
        )?;
        Ok(())
    }

    pub fn set_density_units(&mut self, units: DistanceUnit) {
        self.density_units = units;
    }

    pub fn set_reverse(&mut self, reverse: bool) {
        self.reverse = reverse;
    }

    pub fn set_pad_start(&mut self, pad: f64) -> Result<(), SettingError> {
        self.pad_start = bounded(FixtureParam::PadStart.key(), pad, d::PAD_MIN, d::PAD_MAX)?;
        Ok(())
    }

    pub fn set_pad_end(&mut self, pad: f64) -> Result<(), SettingError> {
        self.pad_end = bounded(FixtureParam::PadEnd.key(), pad, d::PAD_MIN, d::PAD_MAX)?;
        Ok(())
    }

    /// Current value of `param`.
    pub fn param(&self, param: FixtureParam) -> ParamValue {
        match param {
            FixtureParam::PathUnits => ParamValue::Enum(self.path_units.index()),
            FixtureParam::ModelUnits => ParamValue::Enum(self.model_units.index()),
            FixtureParam::PointMode => ParamValue::Enum(self.point_mode.index()),
            FixtureParam::NumPoints => ParamValue::Int(i64::from(self.num_points)),
            FixtureParam::Spacing => ParamValue::Continuous(self.spacing),
            FixtureParam::SpacingUnits => ParamValue::Enum(self.spacing_units.index()),
            FixtureParam::Density => ParamValue::Continuous(self.density),
            FixtureParam::DensityUnits => ParamValue::Enum(self.density_units.index()),
            FixtureParam::Reverse => ParamValue::Bool(self.reverse),
            FixtureParam::PadStart => ParamValue::Continuous(self.pad_start),
            FixtureParam::PadEnd => ParamValue::Continuous(self.pad_end),
        }
    }

    /// Set `param` from a tagged value. The value must be of the parameter's kind.
    pub fn set_param(&mut self, param: FixtureParam, value: ParamValue) -> Result<(), SettingError> {
        use FixtureParam as P;
        use ParamValue as V;

        match (param, value) {
            (P::PathUnits, V::Enum(i)) => self.path_units = unit_index(param, i)?,
            (P::ModelUnits, V::Enum(i)) => self.model_units = unit_index(param, i)?,
            (P::SpacingUnits, V::Enum(i)) => self.spacing_units = unit_index(param, i)?,
            (P::DensityUnits, V::Enum(i)) => self.density_units = unit_index(param, i)?,
            (P::PointMode, V::Enum(i)) => {
                self.point_mode = PointModeKind::from_index(i).ok_or(SettingError::OutOfRange {
                    name: param.key(),
                    value: i as f64,
                    min: 0.0,
                    max: (PointModeKind::ALL.len() - 1) as f64,
                })?;
            }
            (P::NumPoints, V::Int(n)) => {
                let n = u32::try_from(n).map_err(|_| SettingError::OutOfRange {
                    name: param.key(),
                    value: n as f64,
                    min: f64::from(d::NUM_POINTS_MIN),
                    max: f64::from(d::NUM_POINTS_MAX),
                })?;
                self.set_num_points(n)?;
            }
            (P::Spacing, V::Continuous(v)) => self.set_spacing(v)?,
            (P::Density, V::Continuous(v)) => self.set_density(v)?,
            (P::PadStart, V::Continuous(v)) => self.set_pad_start(v)?,
            (P::PadEnd, V::Continuous(v)) => self.set_pad_end(v)?,
            (P::Reverse, V::Bool(b)) => self.reverse = b,
            _ => {
                return Err(SettingError::WrongKind {
                    name: param.key(),
                    expected: self.param(param).kind(),
                });
            }
        }
        Ok(())
    }

    /// The placement policy these settings describe, with spacing and
    /// density still in their own units.
    pub fn policy(&self) -> PlacementPolicy {
        let mode = match self.point_mode {
            PointModeKind::Direct => PointMode::from(Direct),
            PointModeKind::NumPoints => PointMode::from(NumPoints {
                points: self.num_points,
            }),
            PointModeKind::Spacing => PointMode::from(Spacing {
                distance: self.spacing,
                units: self.spacing_units,
            }),
            PointModeKind::Density => PointMode::from(Density {
                points_per_unit: self.density,
                units: self.density_units,
            }),
        };
        PlacementPolicy::new(mode)
            .with_padding(self.pad_start, self.pad_end)
            .reversed(self.reverse)
    }
}
