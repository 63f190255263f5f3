//! Place points along a coordinate chain.

use std::borrow::Cow;

use glam::{DAffine3, DVec2, DVec3};

use crate::errors::PlacementWarning;
use crate::fixture::flatten::{Coordinate, CoordinateChain};
use crate::fixture::policy::{Placement, PlacementPolicy};
use crate::log;
use crate::types::div_or_zero;
use crate::units::DistanceUnit;

/// Points produced by [`resample`], plus anything that went wrong placing them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resampled {
    pub points: Vec<DVec3>,
    pub warnings: Vec<PlacementWarning>,
}

/// The chain in the direction the policy walks it.
fn traversal<'a>(chain: &'a CoordinateChain, policy: &PlacementPolicy) -> Cow<'a, CoordinateChain> {
    if policy.reverse {
        Cow::Owned(chain.reversed())
    } else {
        Cow::Borrowed(chain)
    }
}

fn count_on(chain: &CoordinateChain, policy: &PlacementPolicy, model_units: DistanceUnit) -> usize {
    if chain.is_empty() {
        return 0;
    }
    let active = policy.active_length(chain.total_length());
    policy.mode.count(active, model_units, chain.len())
}

/// How many points [`resample`] produces for this chain and policy, without
/// placing any.
pub fn point_count(
    chain: &CoordinateChain,
    policy: &PlacementPolicy,
    model_units: DistanceUnit,
) -> usize {
    count_on(&traversal(chain, policy), policy, model_units)
}

/// Place points on `chain` according to `policy` and map each one through
/// `transform` (as `(x, y, 0)`).
pub fn resample(
    chain: &CoordinateChain,
    policy: &PlacementPolicy,
    model_units: DistanceUnit,
    transform: &DAffine3,
) -> Resampled {
    let chain = traversal(chain, policy);
    let count = count_on(&chain, policy, model_units);
    let mut out = Resampled {
        points: Vec::with_capacity(count),
        warnings: Vec::new(),
    };
    if count == 0 {
        return out;
    }

    let place = |p: DVec2| transform.transform_point3(p.extend(0.0));
    let active = policy.active_length(chain.total_length());
    match policy.mode.spacing(active, model_units) {
        None => out
            .points
            .extend(chain.positions().take(count).map(place)),
        Some(spacing) => {
            let total = chain.total_length();
            let n_spacing = div_or_zero(spacing, total);
            let n_pad_start = div_or_zero(policy.pad_start(), total).clamp(0.0, 1.0);
            let coords = chain.coordinates();
            let mut cursor = 0;
            for index in 0..count {
                let target = (n_pad_start + index as f64 * n_spacing).clamp(0.0, 1.0);
                let position = match locate(coords, &mut cursor, target) {
                    Some(p) => p,
                    None => {
                        log::warn!(index, target, "point overran the path");
                        out.warnings.push(PlacementWarning::Overrun {
                            index,
                            position: target,
                        });
                        chain.last().map_or(DVec2::ZERO, |c| c.position)
                    }
                };
                out.points.push(place(position));
            }
        }
    }

    log::debug!(points = out.points.len(), "resampled path");
    out
}

/// Find the position at normalized `target`, advancing `cursor` but never
/// rewinding it. `None` when the chain ends before `target`.
fn locate(coords: &[Coordinate], cursor: &mut usize, target: f64) -> Option<DVec2> {
    loop {
        let coord = coords.get(*cursor)?;
        if coord.normalized == target {
            return Some(coord.position);
        }
        let next = coords.get(*cursor + 1)?;
        if next.normalized < target {
            *cursor += 1;
            continue;
        }
        if next.normalized == target {
            return Some(next.position);
        }
        let t = (target - coord.normalized) / (next.normalized - coord.normalized);
        return Some(coord.position.lerp(next.position, t));
    }
}
