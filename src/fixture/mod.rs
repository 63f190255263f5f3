//! Path fixtures: path data plus settings, turned into placed points.
//!
//! A [`PathFixture`] keeps its flattened [`CoordinateChain`] cached. The chain
//! is rebuilt from the original path data (never rescaled) whenever the path
//! data, path units, model units or curve sampling change; every other
//! setting only changes the placement policy.

pub mod defaults;
mod flatten;
mod policy;
mod resample;
mod settings;

pub use flatten::{Coordinate, CoordinateChain, CurveSampling, flatten};
pub use policy::{Density, Direct, NumPoints, Placement, PlacementPolicy, PointMode, Spacing};
pub use resample::{Resampled, point_count, resample};
pub use settings::{FixtureParam, FixtureSettings, PointModeKind, UnknownPointMode};

use glam::{DAffine3, DVec3};

use crate::errors::{ParseWarning, PlacementWarning, SettingError};
use crate::group::ParamValue;
use crate::log;
use crate::parse::{ParsedPath, parse_path_data};

/// Everything a fixture produces for export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixtureGeometry {
    pub points: Vec<DVec3>,
    pub count: usize,
    /// Full flattened length, in model units.
    pub total_length: f64,
    /// Length left after padding, in model units.
    pub active_length: f64,
    pub warnings: Vec<PlacementWarning>,
}

/// A fixture whose points follow one SVG path.
#[derive(Debug, Clone)]
pub struct PathFixture {
    label: String,
    path_data: String,
    parsed: ParsedPath,
    settings: FixtureSettings,
    sampling: CurveSampling,
    chain: CoordinateChain,
}

impl PathFixture {
    pub fn new(label: impl Into<String>, path_data: impl Into<String>) -> Self {
        Self::with_settings(label, path_data, FixtureSettings::default())
    }

    pub fn with_settings(
        label: impl Into<String>,
        path_data: impl Into<String>,
        settings: FixtureSettings,
    ) -> Self {
        let mut fixture = Self {
            label: label.into(),
            path_data: path_data.into(),
            parsed: ParsedPath::default(),
            settings,
            sampling: CurveSampling::default(),
            chain: CoordinateChain::default(),
        };
        fixture.reparse();
        fixture
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn path_data(&self) -> &str {
        &self.path_data
    }

    pub fn parsed(&self) -> &ParsedPath {
        &self.parsed
    }

    pub fn warnings(&self) -> &[ParseWarning] {
        &self.parsed.warnings
    }

    /// Parse warnings rendered against the path data, titled with the label.
    pub fn reports(&self) -> Vec<miette::Report> {
        self.parsed.reports(&self.label, &self.path_data)
    }

    pub fn settings(&self) -> &FixtureSettings {
        &self.settings
    }

    pub fn curve_sampling(&self) -> CurveSampling {
        self.sampling
    }

    pub fn coordinates(&self) -> &CoordinateChain {
        &self.chain
    }

    pub fn set_path_data(&mut self, path_data: impl Into<String>) {
        self.path_data = path_data.into();
        self.reparse();
    }

    pub fn set_curve_sampling(&mut self, sampling: CurveSampling) {
        if self.sampling != sampling {
            self.sampling = sampling;
            self.rebuild();
        }
    }

    /// Edit the settings as one transaction: if `edit` fails, nothing changes.
    pub fn update_settings<F>(&mut self, edit: F) -> Result<(), SettingError>
    where
        F: FnOnce(&mut FixtureSettings) -> Result<(), SettingError>,
    {
        let mut next = self.settings;
        edit(&mut next)?;
        let units_changed = next.path_units() != self.settings.path_units()
            || next.model_units() != self.settings.model_units();
        self.settings = next;
        if units_changed {
            self.rebuild();
        }
        Ok(())
    }

    pub fn param(&self, param: FixtureParam) -> ParamValue {
        self.settings.param(param)
    }

    pub fn set_param(&mut self, param: FixtureParam, value: ParamValue) -> Result<(), SettingError> {
        self.update_settings(|s| s.set_param(param, value))
    }

    pub fn policy(&self) -> PlacementPolicy {
        self.settings.policy()
    }

    /// Number of points [`compute_points`](Self::compute_points) will produce.
    pub fn size(&self) -> usize {
        point_count(&self.chain, &self.policy(), self.settings.model_units())
    }

    pub fn total_length(&self) -> f64 {
        self.chain.total_length()
    }

    pub fn active_length(&self) -> f64 {
        self.policy().active_length(self.total_length())
    }

    /// Place the fixture's points in model space, mapped through `transform`.
    pub fn compute_points(&self, transform: &DAffine3) -> FixtureGeometry {
        let Resampled { points, warnings } = resample(
            &self.chain,
            &self.policy(),
            self.settings.model_units(),
            transform,
        );
        FixtureGeometry {
            count: points.len(),
            points,
            total_length: self.total_length(),
            active_length: self.active_length(),
            warnings,
        }
    }

    /// Export metadata: every setting under its key, then the summary
    /// (`length` is the active length).
    pub fn metadata(&self) -> Vec<(&'static str, String)> {
        let s = &self.settings;
        let mut out: Vec<(&'static str, String)> = FixtureParam::ALL
            .into_iter()
            .map(|param| {
                let value = match param {
                    FixtureParam::PathUnits => s.path_units().to_string(),
                    FixtureParam::ModelUnits => s.model_units().to_string(),
                    FixtureParam::PointMode => s.point_mode().to_string(),
                    FixtureParam::NumPoints => s.num_points().to_string(),
                    FixtureParam::Spacing => s.spacing().to_string(),
                    FixtureParam::SpacingUnits => s.spacing_units().to_string(),
                    FixtureParam::Density => s.density().to_string(),
                    FixtureParam::DensityUnits => s.density_units().to_string(),
                    FixtureParam::Reverse => s.reverse().to_string(),
                    FixtureParam::PadStart => s.pad_start().to_string(),
                    FixtureParam::PadEnd => s.pad_end().to_string(),
                };
                (param.key(), value)
            })
            .collect();
        out.push(("length", self.active_length().to_string()));
        out.push(("numPoints", self.size().to_string()));
        out
    }

    fn reparse(&mut self) {
        self.parsed = parse_path_data(&self.path_data);
        if !self.parsed.warnings.is_empty() {
            log::warn!(
                label = %self.label,
                warnings = self.parsed.warnings.len(),
                "path data has problems"
            );
        }
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.chain = flatten(
            &self.parsed.path,
            self.settings.path_units(),
            self.settings.model_units(),
            self.sampling,
        );
    }
}
