//! Curve math: SVG elliptical arcs and Bézier evaluation.
//!
//! Arcs use the endpoint-to-center conversion from the SVG implementation
//! notes (appendix B.2.4) and are approximated by cubic Béziers no wider than
//! 90 degrees each.

use std::f64::consts::{FRAC_PI_2, TAU};

use glam::{DMat2, DVec2};

use crate::path::PathCommand;

/// An SVG `A` command with absolute endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipticalArc {
    pub from: DVec2,
    /// Radii as written; signs are ignored.
    pub radii: DVec2,
    /// Rotation of the ellipse x-axis, in degrees.
    pub x_axis_rotation: f64,
    pub large_arc: bool,
    pub sweep: bool,
    pub to: DVec2,
}

/// Center form of an arc: the ellipse it lies on and the angular range it covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcCenter {
    pub center: DVec2,
    /// Radii after out-of-range correction.
    pub radii: DVec2,
    /// Rotation of the ellipse x-axis, in radians.
    pub rotation: f64,
    /// Angle of `from` on the unit-circle-mapped ellipse, in radians.
    pub start_angle: f64,
    /// Signed angular extent; positive when sweeping toward increasing angles.
    pub sweep_angle: f64,
}

impl ArcCenter {
    /// Point on the ellipse at parametric angle `theta`.
    pub fn point_at(&self, theta: f64) -> DVec2 {
        let (sin, cos) = theta.sin_cos();
        self.center + DMat2::from_angle(self.rotation) * DVec2::new(self.radii.x * cos, self.radii.y * sin)
    }

    /// Derivative of [`ArcCenter::point_at`] with respect to `theta`.
    pub fn tangent_at(&self, theta: f64) -> DVec2 {
        let (sin, cos) = theta.sin_cos();
        DMat2::from_angle(self.rotation) * DVec2::new(-self.radii.x * sin, self.radii.y * cos)
    }
}

/// What an arc turns into once degenerate inputs are handled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArcParameterization {
    /// Start and end coincide; the arc draws nothing.
    Omit,
    /// A zero radius makes the arc a straight line to the endpoint.
    LineTo,
    Center(ArcCenter),
}

impl EllipticalArc {
    /// Convert endpoint parameterization to center parameterization.
    pub fn center_parameterization(&self) -> ArcParameterization {
        if self.from == self.to {
            return ArcParameterization::Omit;
        }
        let mut rx = self.radii.x.abs();
        let mut ry = self.radii.y.abs();
        if rx == 0.0 || ry == 0.0 {
            return ArcParameterization::LineTo;
        }

        let rotation = (self.x_axis_rotation % 360.0).to_radians();
        let rot = DMat2::from_angle(rotation);

        // Step 1: midpoint vector in the ellipse's own frame
        let p1 = rot.transpose() * ((self.from - self.to) / 2.0);
        let (x1, y1) = (p1.x, p1.y);

        // Correct radii that are too small to span the endpoints
        let radii_check = (x1 * x1) / (rx * rx) + (y1 * y1) / (ry * ry);
        if radii_check > 1.0 {
            let scale = radii_check.sqrt();
            rx *= scale;
            ry *= scale;
        }
        let (prx, pry) = (rx * rx, ry * ry);
        let (px1, py1) = (x1 * x1, y1 * y1);

        // Step 2: center in the ellipse frame
        let sign = if self.large_arc == self.sweep { -1.0 } else { 1.0 };
        let denom = prx * py1 + pry * px1;
        let sq = if denom == 0.0 {
            0.0
        } else {
            ((prx * pry - prx * py1 - pry * px1) / denom).max(0.0)
        };
        let coef = sign * sq.sqrt();
        let c1 = DVec2::new(coef * (rx * y1 / ry), coef * -(ry * x1 / rx));

        // Step 3: back to user space
        let center = rot * c1 + (self.from + self.to) / 2.0;

        // Step 4: angles on the unit circle
        let u = DVec2::new((x1 - c1.x) / rx, (y1 - c1.y) / ry);
        let v = DVec2::new((-x1 - c1.x) / rx, (-y1 - c1.y) / ry);
        let start_angle = u.y.atan2(u.x);
        let mut sweep_angle = v.y.atan2(v.x) - start_angle;
        if !self.sweep && sweep_angle > 0.0 {
            sweep_angle -= TAU;
        } else if self.sweep && sweep_angle < 0.0 {
            sweep_angle += TAU;
        }

        ArcParameterization::Center(ArcCenter {
            center,
            radii: DVec2::new(rx, ry),
            rotation,
            start_angle,
            sweep_angle,
        })
    }

    /// Approximate the arc with path commands.
    ///
    /// Returns no commands for a zero-length arc, a single `LineTo` for a
    /// zero radius, and otherwise one `CubicCurveTo` per segment of at most
    /// 90 degrees. The last segment ends exactly on `to`.
    pub fn to_path_commands(&self) -> Vec<PathCommand> {
        let arc = match self.center_parameterization() {
            ArcParameterization::Omit => return Vec::new(),
            ArcParameterization::LineTo => return vec![PathCommand::LineTo(self.to)],
            ArcParameterization::Center(arc) => arc,
        };

        let n_segs = ((arc.sweep_angle.abs() / FRAC_PI_2).ceil() as usize).max(1);
        let delta = arc.sweep_angle / n_segs as f64;
        let t = (delta / 2.0).tan();
        let alpha = delta.sin() * ((4.0 + 3.0 * t * t).sqrt() - 1.0) / 3.0;

        let mut commands = Vec::with_capacity(n_segs);
        let mut theta1 = arc.start_angle;
        for i in 0..n_segs {
            let theta2 = theta1 + delta;
            let to = if i + 1 == n_segs {
                self.to
            } else {
                arc.point_at(theta2)
            };
            commands.push(PathCommand::CubicCurveTo {
                ctrl1: arc.point_at(theta1) + alpha * arc.tangent_at(theta1),
                ctrl2: arc.point_at(theta2) - alpha * arc.tangent_at(theta2),
                to,
            });
            theta1 = theta2;
        }
        commands
    }
}

/// Point on a cubic Bézier at parameter `t`.
pub fn cubic_point(p0: DVec2, p1: DVec2, p2: DVec2, p3: DVec2, t: f64) -> DVec2 {
    let mt = 1.0 - t;
    p0 * (mt * mt * mt) + p1 * (3.0 * mt * mt * t) + p2 * (3.0 * mt * t * t) + p3 * (t * t * t)
}

/// Point on a quadratic Bézier at parameter `t`.
pub fn quadratic_point(p0: DVec2, p1: DVec2, p2: DVec2, t: f64) -> DVec2 {
    let mt = 1.0 - t;
    p0 * (mt * mt) + p1 * (2.0 * mt * t) + p2 * (t * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;
    use std::f64::consts::PI;

    fn arc(from: DVec2, r: DVec2, rot: f64, large: bool, sweep: bool, to: DVec2) -> EllipticalArc {
        EllipticalArc {
            from,
            radii: r,
            x_axis_rotation: rot,
            large_arc: large,
            sweep,
            to,
        }
    }

    fn cubics(commands: &[PathCommand]) -> Vec<(DVec2, DVec2, DVec2)> {
        commands
            .iter()
            .map(|c| match *c {
                PathCommand::CubicCurveTo { ctrl1, ctrl2, to } => (ctrl1, ctrl2, to),
                other => panic!("expected cubic, got {other:?}"),
            })
            .collect()
    }

    #[test]
    fn semicircle_endpoints() {
        let a = arc(dvec2(0.0, 0.0), dvec2(5.0, 5.0), 0.0, false, true, dvec2(10.0, 0.0));
        let ArcParameterization::Center(center) = a.center_parameterization() else {
            panic!("expected a center parameterization");
        };
        assert!((center.center - dvec2(5.0, 0.0)).length() < 1e-9);
        assert!((center.start_angle.abs() - PI).abs() < 1e-9);
        assert!((center.sweep_angle - PI).abs() < 1e-9);

        let segs = cubics(&a.to_path_commands());
        assert_eq!(segs.len(), 2);
        assert!((segs[0].2 - dvec2(5.0, -5.0)).length() < 1e-9);
        assert_eq!(segs[1].2, dvec2(10.0, 0.0));
    }

    #[test]
    fn segments_stay_on_circle() {
        let a = arc(dvec2(0.0, 0.0), dvec2(5.0, 5.0), 0.0, false, true, dvec2(10.0, 0.0));
        let mut start = a.from;
        for (c1, c2, to) in cubics(&a.to_path_commands()) {
            let mid = cubic_point(start, c1, c2, to, 0.5);
            let r = (mid - dvec2(5.0, 0.0)).length();
            assert!((r - 5.0).abs() < 5.0 * 5e-3, "midpoint radius {r}");
            start = to;
        }
    }

    #[test]
    fn identical_endpoints_draw_nothing() {
        let a = arc(dvec2(3.0, 4.0), dvec2(5.0, 5.0), 0.0, true, true, dvec2(3.0, 4.0));
        assert_eq!(a.center_parameterization(), ArcParameterization::Omit);
        assert!(a.to_path_commands().is_empty());
    }

    #[test]
    fn zero_radius_is_a_line() {
        let a = arc(dvec2(0.0, 0.0), dvec2(0.0, 5.0), 0.0, false, true, dvec2(10.0, 0.0));
        assert_eq!(a.to_path_commands(), vec![PathCommand::LineTo(dvec2(10.0, 0.0))]);
    }

    #[test]
    fn small_radii_are_scaled_up() {
        let a = arc(dvec2(0.0, 0.0), dvec2(1.0, 1.0), 0.0, false, true, dvec2(10.0, 0.0));
        let ArcParameterization::Center(center) = a.center_parameterization() else {
            panic!("expected a center parameterization");
        };
        assert!((center.radii - dvec2(5.0, 5.0)).length() < 1e-9);
        assert!((center.center - dvec2(5.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn large_arc_flag_picks_the_long_way() {
        let from = dvec2(0.0, 0.0);
        let to = dvec2(10.0, 0.0);
        let sweep_of = |large| match arc(from, dvec2(10.0, 10.0), 0.0, large, true, to)
            .center_parameterization()
        {
            ArcParameterization::Center(c) => c.sweep_angle,
            other => panic!("unexpected {other:?}"),
        };
        let small = sweep_of(false);
        let large = sweep_of(true);
        assert!(small > 0.0 && small < PI);
        assert!(large > PI);
        assert!((small + large - TAU).abs() < 1e-9);
    }

    #[test]
    fn sweep_flag_sets_direction() {
        let a = arc(dvec2(0.0, 0.0), dvec2(5.0, 5.0), 0.0, false, false, dvec2(10.0, 0.0));
        let segs = cubics(&a.to_path_commands());
        // Counter-sweep goes through the other half of the circle
        assert!((segs[0].2 - dvec2(5.0, 5.0)).length() < 1e-9);
    }

    #[test]
    fn rotated_ellipse_endpoints_lie_on_ellipse() {
        let a = arc(dvec2(0.0, 0.0), dvec2(10.0, 5.0), 90.0, false, true, dvec2(0.0, 20.0));
        let ArcParameterization::Center(center) = a.center_parameterization() else {
            panic!("expected a center parameterization");
        };
        assert!((center.center - dvec2(0.0, 10.0)).length() < 1e-9);
        let back = DMat2::from_angle(center.rotation).transpose();
        for (_, _, to) in cubics(&a.to_path_commands()) {
            let local = back * (to - center.center);
            let e = (local.x / 10.0).powi(2) + (local.y / 5.0).powi(2);
            assert!((e - 1.0).abs() < 1e-9, "{to} is off the ellipse ({e})");
        }
    }

    #[test]
    fn bezier_evaluation_hits_endpoints() {
        let (p0, p1, p2, p3) = (dvec2(0.0, 0.0), dvec2(1.0, 2.0), dvec2(3.0, 2.0), dvec2(4.0, 0.0));
        assert_eq!(cubic_point(p0, p1, p2, p3, 0.0), p0);
        assert_eq!(cubic_point(p0, p1, p2, p3, 1.0), p3);
        assert_eq!(cubic_point(p0, p1, p2, p3, 0.5), dvec2(2.0, 1.5));
        assert_eq!(quadratic_point(p0, dvec2(2.0, 4.0), p3, 0.5), dvec2(2.0, 2.0));
    }
}
