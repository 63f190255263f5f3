//! Flatten a parsed path into a chain of measured coordinates.

use glam::{DVec2, dvec2};

use crate::geometry::{cubic_point, quadratic_point};
use crate::log;
use crate::path::{Path, PathCommand};
use crate::types::div_or_zero;
use crate::units::DistanceUnit;

/// A flattened path vertex in model units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub position: DVec2,
    pub dist_from_previous: f64,
    /// Path length up to and including this vertex.
    pub dist_from_start: f64,
    /// `dist_from_start / total_length`, or 0 for a zero-length chain.
    pub normalized: f64,
}

/// Ordered coordinates of a flattened path along with its total length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinateChain {
    coords: Vec<Coordinate>,
    total_length: f64,
}

impl CoordinateChain {
    /// Measure a polyline. Distances and normalized positions are computed
    /// in a single pass after the positions are collected.
    pub fn from_positions(positions: impl IntoIterator<Item = DVec2>) -> Self {
        let mut coords: Vec<Coordinate> = Vec::new();
        let mut running = 0.0;
        for position in positions {
            let dist_from_previous = coords
                .last()
                .map_or(0.0, |prev| prev.position.distance(position));
            running += dist_from_previous;
            coords.push(Coordinate {
                position,
                dist_from_previous,
                dist_from_start: running,
                normalized: 0.0,
            });
        }

        let total_length = running;
        for coord in &mut coords {
            coord.normalized = div_or_zero(coord.dist_from_start, total_length);
        }
        Self {
            coords,
            total_length,
        }
    }

    /// The same polyline traversed from its last vertex, re-measured from the new start.
    pub fn reversed(&self) -> Self {
        Self::from_positions(self.coords.iter().rev().map(|c| c.position))
    }

    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coords
    }

    pub fn positions(&self) -> impl Iterator<Item = DVec2> + '_ {
        self.coords.iter().map(|c| c.position)
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    pub fn last(&self) -> Option<&Coordinate> {
        self.coords.last()
    }
}

/// How curve interiors contribute coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurveSampling {
    /// Only the endpoint of each curve becomes a coordinate.
    #[default]
    EndpointsOnly,
    /// Split each curve into `segments` equal parameter steps; the interior
    /// sample points become coordinates too. 0 and 1 behave like `EndpointsOnly`.
    Subdivide { segments: u32 },
}

impl CurveSampling {
    fn interior_params(self) -> impl Iterator<Item = f64> {
        let segments = match self {
            CurveSampling::EndpointsOnly => 1,
            CurveSampling::Subdivide { segments } => segments.max(1),
        };
        (1..segments).map(move |k| f64::from(k) / f64::from(segments))
    }
}

/// Flatten `path` into model-unit coordinates.
///
/// `MoveTo` and `LineTo` endpoints become coordinates; curves contribute their
/// endpoint plus whatever `sampling` adds; `ClosePath` contributes nothing.
/// Sub-paths are joined into one continuous chain.
pub fn flatten(
    path: &Path,
    path_units: DistanceUnit,
    model_units: DistanceUnit,
    sampling: CurveSampling,
) -> CoordinateChain {
    let to_model = |p: DVec2| dvec2(path_units.to(model_units, p.x), path_units.to(model_units, p.y));

    let mut positions = Vec::with_capacity(path.len());
    for (start, command) in path.segments() {
        match *command {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => positions.push(to_model(p)),
            PathCommand::CubicCurveTo { ctrl1, ctrl2, to } => {
                positions.extend(
                    sampling
                        .interior_params()
                        .map(|t| to_model(cubic_point(start, ctrl1, ctrl2, to, t))),
                );
                positions.push(to_model(to));
            }
            PathCommand::QuadraticCurveTo { ctrl, to } => {
                positions.extend(
                    sampling
                        .interior_params()
                        .map(|t| to_model(quadratic_point(start, ctrl, to, t))),
                );
                positions.push(to_model(to));
            }
            PathCommand::ClosePath => {}
        }
    }

    let chain = CoordinateChain::from_positions(positions);
    log::debug!(
        coordinates = chain.len(),
        total_length = chain.total_length(),
        "flattened path"
    );
    chain
}
