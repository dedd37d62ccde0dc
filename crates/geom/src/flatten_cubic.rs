//! Adaptive subdivision of cubic bézier curves.
//!
//! The curve is recursively split in halves with de Casteljau's algorithm. A sub-curve
//! stops being split when it is flat enough (both control points are within the distance
//! tolerance of the chord) and, if an angle tolerance is set, when the turns at both ends
//! of the control polygon are small. Only the points at which the subdivision stops are
//! emitted, in curve order. The end points of the curve are never emitted.

use crate::{point, CubicBezierSegment, Point, Scalar};

/// Parameters for the adaptive flattening of cubic bézier curves.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub struct FlatteningOptions {
    /// Maximum distance between the curve and its approximation, in path units before
    /// scaling.
    ///
    /// Default value: `FlatteningOptions::DEFAULT_DISTANCE_TOLERANCE`.
    pub distance_tolerance: f32,

    /// Maximum turn, in radians, at the ends of a flat sub-curve.
    ///
    /// Values below `angle_epsilon` disable the angle test.
    ///
    /// Default value: `0.0`.
    pub angle_tolerance: f32,

    /// Turn angle, in radians, above which a sub-curve is treated as a cusp and replaced
    /// by the control point next to it.
    ///
    /// Zero disables cusp handling.
    ///
    /// Default value: `0.0`.
    pub cusp_limit: f32,

    /// Maximum subdivision depth.
    ///
    /// Default value: `FlatteningOptions::DEFAULT_RECURSION_LIMIT`.
    pub recursion_limit: u32,

    /// Deviation under which a control point is considered to lie on the chord.
    ///
    /// Default value: `FlatteningOptions::DEFAULT_EPSILON`.
    pub epsilon: f32,

    /// Default value: `FlatteningOptions::DEFAULT_ANGLE_EPSILON`.
    pub angle_epsilon: f32,
}

impl FlatteningOptions {
    pub const DEFAULT_DISTANCE_TOLERANCE: f32 = 1.0;
    pub const DEFAULT_RECURSION_LIMIT: u32 = 8;
    pub const DEFAULT_EPSILON: f32 = 1.19209290e-7;
    pub const DEFAULT_ANGLE_EPSILON: f32 = 0.01;

    pub const DEFAULT: Self = FlatteningOptions {
        distance_tolerance: Self::DEFAULT_DISTANCE_TOLERANCE,
        angle_tolerance: 0.0,
        cusp_limit: 0.0,
        recursion_limit: Self::DEFAULT_RECURSION_LIMIT,
        epsilon: Self::DEFAULT_EPSILON,
        angle_epsilon: Self::DEFAULT_ANGLE_EPSILON,
    };

    #[inline]
    pub fn tolerance(tolerance: f32) -> Self {
        Self::DEFAULT.with_distance_tolerance(tolerance)
    }

    #[inline]
    pub const fn with_distance_tolerance(mut self, tolerance: f32) -> Self {
        self.distance_tolerance = tolerance;
        self
    }

    #[inline]
    pub const fn with_angle_tolerance(mut self, angle: f32) -> Self {
        self.angle_tolerance = angle;
        self
    }

    #[inline]
    pub const fn with_cusp_limit(mut self, angle: f32) -> Self {
        self.cusp_limit = angle;
        self
    }

    #[inline]
    pub const fn with_recursion_limit(mut self, limit: u32) -> Self {
        self.recursion_limit = limit;
        self
    }
}

impl Default for FlatteningOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

struct AdaptiveFlattener<S> {
    distance_tolerance_sq: S,
    angle_tolerance: S,
    cusp_limit: S,
    epsilon: S,
    angle_epsilon: S,
    recursion_limit: u32,
}

pub(crate) fn flatten_cubic_adaptive<S: Scalar, F>(
    curve: &CubicBezierSegment<S>,
    options: &FlatteningOptions,
    scale: S,
    callback: &mut F,
) where
    F: FnMut(Point<S>),
{
    let distance = S::value(options.distance_tolerance) / scale;
    let flattener = AdaptiveFlattener {
        distance_tolerance_sq: distance * distance,
        angle_tolerance: S::value(options.angle_tolerance),
        cusp_limit: S::value(options.cusp_limit),
        epsilon: S::value(options.epsilon),
        angle_epsilon: S::value(options.angle_epsilon),
        recursion_limit: options.recursion_limit,
    };

    flattener.subdivide(curve.from, curve.ctrl1, curve.ctrl2, curve.to, 0, callback);
}

/// Absolute difference of two angles, folded into [0, π].
fn angle_between<S: Scalar>(a: S, b: S) -> S {
    let da = (a - b).abs();
    if da >= S::PI() {
        S::TWO * S::PI() - da
    } else {
        da
    }
}

fn direction<S: Scalar>(from: Point<S>, to: Point<S>) -> S {
    (to.y - from.y).atan2(to.x - from.x)
}

impl<S: Scalar> AdaptiveFlattener<S> {
    fn subdivide<F>(&self, p1: Point<S>, p2: Point<S>, p3: Point<S>, p4: Point<S>, level: u32, callback: &mut F)
    where
        F: FnMut(Point<S>),
    {
        if level >= self.recursion_limit {
            return;
        }

        let p12 = p1.lerp(p2, S::HALF);
        let p23 = p2.lerp(p3, S::HALF);
        let p34 = p3.lerp(p4, S::HALF);
        let p123 = p12.lerp(p23, S::HALF);
        let p234 = p23.lerp(p34, S::HALF);
        let p1234 = p123.lerp(p234, S::HALF);

        let chord = p4 - p1;
        let chord_sq = chord.square_length();
        let d2 = ((p2.x - p4.x) * chord.y - (p2.y - p4.y) * chord.x).abs();
        let d3 = ((p3.x - p4.x) * chord.y - (p3.y - p4.y) * chord.x).abs();

        let eps = self.epsilon;
        let tolerance = self.distance_tolerance_sq;
        let angle_test = self.angle_tolerance >= self.angle_epsilon;

        match (d2 > eps, d3 > eps) {
            (true, true) => {
                if (d2 + d3) * (d2 + d3) <= tolerance * chord_sq {
                    if !angle_test {
                        callback(p1234);
                        return;
                    }

                    let a23 = direction(p2, p3);
                    let da1 = angle_between(a23, direction(p1, p2));
                    let da2 = angle_between(direction(p3, p4), a23);

                    if da1 + da2 < self.angle_tolerance {
                        callback(p1234);
                        return;
                    }

                    if self.cusp_limit != S::ZERO {
                        if da1 > self.cusp_limit {
                            callback(p2);
                            return;
                        }
                        if da2 > self.cusp_limit {
                            callback(p3);
                            return;
                        }
                    }
                }
            }
            (true, false) => {
                if d2 * d2 <= tolerance * chord_sq {
                    if !angle_test {
                        callback(p1234);
                        return;
                    }

                    let da = angle_between(direction(p2, p3), direction(p1, p2));
                    if da < self.angle_tolerance {
                        callback(p2);
                        callback(p3);
                        return;
                    }

                    if self.cusp_limit != S::ZERO && da > self.cusp_limit {
                        callback(p2);
                        return;
                    }
                }
            }
            (false, true) => {
                if d3 * d3 <= tolerance * chord_sq {
                    if !angle_test {
                        callback(p1234);
                        return;
                    }

                    let da = angle_between(direction(p3, p4), direction(p2, p3));
                    if da < self.angle_tolerance {
                        callback(p2);
                        callback(p3);
                        return;
                    }

                    if self.cusp_limit != S::ZERO && da > self.cusp_limit {
                        callback(p3);
                        return;
                    }
                }
            }
            (false, false) => {
                // All four points are collinear, or the chord is degenerate.
                let mid = point((p1.x + p4.x) * S::HALF, (p1.y + p4.y) * S::HALF);
                if (p1234 - mid).square_length() <= tolerance {
                    return;
                }
            }
        }

        self.subdivide(p1, p12, p123, p1234, level + 1, callback);
        self.subdivide(p1234, p234, p34, p4, level + 1, callback);
    }
}

#[cfg(test)]
fn collect(curve: &CubicBezierSegment<f64>, options: &FlatteningOptions, scale: f64) -> Vec<Point<f64>> {
    let mut points = Vec::new();
    flatten_cubic_adaptive(curve, options, scale, &mut |p| points.push(p));
    points
}

#[test]
fn straight_line_has_no_interior_points() {
    let line = CubicBezierSegment {
        from: point(0.0, 0.0),
        ctrl1: point(1.0, 1.0),
        ctrl2: point(2.0, 2.0),
        to: point(3.0, 3.0),
    };
    assert!(collect(&line, &FlatteningOptions::DEFAULT, 1.0).is_empty());
    assert!(collect(&line, &FlatteningOptions::tolerance(0.001), 100.0).is_empty());
}

#[test]
fn flat_curve_emits_midpoint() {
    let curve = CubicBezierSegment {
        from: point(0.0, 0.0),
        ctrl1: point(1.0, 0.01),
        ctrl2: point(2.0, 0.01),
        to: point(3.0, 0.0),
    };
    let points = collect(&curve, &FlatteningOptions::DEFAULT, 1.0);
    assert_eq!(points.len(), 1);
    assert!((points[0] - curve.sample(0.5)).length() < 1e-9);
}

#[test]
fn points_stay_close_to_the_curve() {
    // Quarter of a circle of radius 100.
    let k = 100.0 * 0.5522847498;
    let curve = CubicBezierSegment {
        from: point(100.0, 0.0),
        ctrl1: point(100.0, k),
        ctrl2: point(k, 100.0),
        to: point(0.0, 100.0),
    };

    let coarse = collect(&curve, &FlatteningOptions::tolerance(1.0), 1.0);
    let fine = collect(&curve, &FlatteningOptions::tolerance(0.1), 1.0);
    let scaled = collect(&curve, &FlatteningOptions::tolerance(1.0), 10.0);

    assert!(!coarse.is_empty());
    assert!(fine.len() > coarse.len());
    assert!(scaled.len() > coarse.len());

    for p in fine.iter() {
        let r = p.to_vector().length();
        assert!((r - 100.0).abs() < 0.1, "{:?} is {} away from the center", p, r);
    }

    // The points are produced in curve order.
    for pair in fine.windows(2) {
        let a0 = pair[0].y.atan2(pair[0].x);
        let a1 = pair[1].y.atan2(pair[1].x);
        assert!(a1 > a0);
    }
}

#[test]
fn recursion_limit_bounds_the_output() {
    let curve = CubicBezierSegment {
        from: point(0.0, 0.0),
        ctrl1: point(0.0, 1000.0),
        ctrl2: point(1000.0, 1000.0),
        to: point(1000.0, 0.0),
    };

    let options = FlatteningOptions::tolerance(0.0001).with_recursion_limit(3);
    // Nothing gets flat enough within three levels and the leaves are dropped.
    assert!(collect(&curve, &options, 1.0).is_empty());

    assert!(collect(&curve, &FlatteningOptions::DEFAULT.with_recursion_limit(0), 1.0).is_empty());
}

#[test]
fn angle_tolerance_refines_the_output() {
    let curve = CubicBezierSegment {
        from: point(0.0, 0.0),
        ctrl1: point(0.0, 100.0),
        ctrl2: point(100.0, 100.0),
        to: point(100.0, 0.0),
    };

    let plain = collect(&curve, &FlatteningOptions::tolerance(2.0), 1.0);
    let with_angle = collect(
        &curve,
        &FlatteningOptions::tolerance(2.0).with_angle_tolerance(0.05),
        1.0,
    );
    assert!(with_angle.len() >= plain.len());

    for p in with_angle.iter() {
        assert!(p.x > -1.0 && p.x < 101.0 && p.y >= 0.0 && p.y < 76.0);
    }
}
