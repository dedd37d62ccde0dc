//! Adaptive exact geometric predicates.
//!
//! Both predicates return a value whose sign is exact. The magnitude is only meaningful
//! as an approximation.
//!
//! Orientation convention: `orient2d(a, b, c)` is positive when `a`, `b`, `c` turn
//! counter-clockwise in a y-down coordinate system (screen space), which is
//! clockwise when the y axis points up.

use crate::expansion::{difference, most_significant, scale, sum, two_product};
use crate::{Point, Scalar};
use arrayvec::ArrayVec;

const EPSILON: f64 = 1.1102230246251565e-16;
const ORIENT_ERROR_BOUND: f64 = (3.0 + 16.0 * EPSILON) * EPSILON;
const IN_CIRCLE_ERROR_BOUND: f64 = (10.0 + 96.0 * EPSILON) * EPSILON;

/// Orientation of the triangle `a`, `b`, `c`.
///
/// Evaluates `(a.y - c.y) * (b.x - c.x) - (a.x - c.x) * (b.y - c.y)`.
///
/// - positive: counter-clockwise with y pointing down,
/// - negative: clockwise with y pointing down,
/// - zero: the points are collinear.
pub fn orient2d<S: Scalar>(a: Point<S>, b: Point<S>, c: Point<S>) -> f64 {
    let (ax, ay) = (a.x.to_f64(), a.y.to_f64());
    let (bx, by) = (b.x.to_f64(), b.y.to_f64());
    let (cx, cy) = (c.x.to_f64(), c.y.to_f64());

    let left = (ay - cy) * (bx - cx);
    let right = (ax - cx) * (by - cy);
    let det = left - right;

    let det_sum = if left > 0.0 {
        if right <= 0.0 {
            return det;
        }
        left + right
    } else if left < 0.0 {
        if right >= 0.0 {
            return det;
        }
        -(left + right)
    } else {
        return det;
    };

    let tolerance = ORIENT_ERROR_BOUND * det_sum;
    if det >= tolerance || det <= -tolerance {
        return det;
    }

    orient2d_exact(ax, ay, bx, by, cx, cy)
}

fn orient2d_exact(ax: f64, ay: f64, bx: f64, by: f64, cx: f64, cy: f64) -> f64 {
    let bc: ArrayVec<f64, 4> = sum(&two_product(by, cx), &two_product(-cy, bx));
    let ab: ArrayVec<f64, 4> = sum(&two_product(ay, bx), &two_product(-by, ax));
    let positive: ArrayVec<f64, 8> = sum(&bc, &ab);
    let negative: ArrayVec<f64, 4> = sum(&two_product(ay, cx), &two_product(-cy, ax));
    let det: ArrayVec<f64, 12> = difference(&positive, &negative);

    most_significant(&det)
}

/// Position of `d` relative to the circumcircle of `a`, `b`, `c`.
///
/// When `a`, `b`, `c` are clockwise in y-down space (`orient2d(a, b, c) < 0`) the result
/// is positive if `d` is strictly inside the circle, negative if it is strictly outside
/// and zero if the four points are cocircular. The sign is flipped for the other winding.
pub fn in_circle<S: Scalar>(a: Point<S>, b: Point<S>, c: Point<S>, d: Point<S>) -> f64 {
    let (ax, ay) = (a.x.to_f64(), a.y.to_f64());
    let (bx, by) = (b.x.to_f64(), b.y.to_f64());
    let (cx, cy) = (c.x.to_f64(), c.y.to_f64());
    let (dx, dy) = (d.x.to_f64(), d.y.to_f64());

    let adx = ax - dx;
    let bdx = bx - dx;
    let cdx = cx - dx;
    let ady = ay - dy;
    let bdy = by - dy;
    let cdy = cy - dy;

    let bdxcdy = bdx * cdy;
    let cdxbdy = cdx * bdy;
    let alift = adx * adx + ady * ady;

    let cdxady = cdx * ady;
    let adxcdy = adx * cdy;
    let blift = bdx * bdx + bdy * bdy;

    let adxbdy = adx * bdy;
    let bdxady = bdx * ady;
    let clift = cdx * cdx + cdy * cdy;

    let det = alift * (bdxcdy - cdxbdy) + blift * (cdxady - adxcdy) + clift * (adxbdy - bdxady);

    let permanent = (bdxcdy.abs() + cdxbdy.abs()) * alift
        + (cdxady.abs() + adxcdy.abs()) * blift
        + (adxbdy.abs() + bdxady.abs()) * clift;
    let error_bound = IN_CIRCLE_ERROR_BOUND * permanent;
    if det > error_bound || -det > error_bound {
        return det;
    }

    in_circle_exact([ax, ay], [bx, by], [cx, cy], [dx, dy])
}

/// Exact evaluation of the lifted determinant
///
/// ```text
/// | ax ay ax²+ay² 1 |
/// | bx by bx²+by² 1 |
/// | cx cy cx²+cy² 1 |
/// | dx dy dx²+dy² 1 |
/// ```
///
/// expanded along its minors.
fn in_circle_exact(a: [f64; 2], b: [f64; 2], c: [f64; 2], d: [f64; 2]) -> f64 {
    let lift = |p: [f64; 2]| -> Vec<f64> { sum(&two_product(p[0], p[0]), &two_product(p[1], p[1])) };
    let [wa, wb, wc, wd] = [lift(a), lift(b), lift(c), lift(d)];

    let m_bcd = minor((b, &wb[..]), (c, &wc[..]), (d, &wd[..]));
    let m_acd = minor((a, &wa[..]), (c, &wc[..]), (d, &wd[..]));
    let m_abd = minor((a, &wa[..]), (b, &wb[..]), (d, &wd[..]));
    let m_abc = minor((a, &wa[..]), (b, &wb[..]), (c, &wc[..]));

    let positive: Vec<f64> = sum(&m_bcd, &m_abd);
    let negative: Vec<f64> = sum(&m_acd, &m_abc);
    let det: Vec<f64> = difference(&positive, &negative);

    most_significant(&det)
}

/// Negated 3x3 minor of the rows `p`, `q`, `r` of the lifted matrix, expanded along the
/// y column.
fn minor(
    (p, wp): ([f64; 2], &[f64]),
    (q, wq): ([f64; 2], &[f64]),
    (r, wr): ([f64; 2], &[f64]),
) -> Vec<f64> {
    let qr: Vec<f64> = difference(&scale::<Vec<f64>>(wr, q[0]), &scale::<Vec<f64>>(wq, r[0]));
    let pr: Vec<f64> = difference(&scale::<Vec<f64>>(wr, p[0]), &scale::<Vec<f64>>(wp, r[0]));
    let pq: Vec<f64> = difference(&scale::<Vec<f64>>(wq, p[0]), &scale::<Vec<f64>>(wp, q[0]));

    let t0: Vec<f64> = scale(&qr, p[1]);
    let t1: Vec<f64> = scale(&pr, q[1]);
    let t2: Vec<f64> = scale(&pq, r[1]);

    let partial: Vec<f64> = difference(&t0, &t1);
    sum(&partial, &t2)
}

#[cfg(test)]
use crate::point;

#[test]
fn orientation_of_nearly_collinear_points() {
    assert!(orient2d(point(0.0f64, 0.0), point(1e-32, 0.0), point(0.0, 1.0)) < 0.0);
    assert!(orient2d(point(0.0f64, 0.0), point(-1e-32, 0.0), point(0.0, 1.0)) > 0.0);
}

#[test]
fn orientation_across_magnitudes() {
    let mut x = 1e-32f64;
    for _ in 0..32 {
        assert!(orient2d(point(-x, 0.0), point(0.0, 1.0), point(x, 0.0)) > 0.0);
        assert_eq!(orient2d(point(-x, 0.0), point(0.0, 0.0), point(x, 0.0)), 0.0);
        assert!(orient2d(point(-x, 0.0), point(0.0, -1.0), point(x, 0.0)) < 0.0);
        assert!(orient2d(point(0.0, 1.0), point(0.0, 0.0), point(x, x)) < 0.0);
        x *= 10.0;
    }
}

#[test]
fn orientation_is_antisymmetric() {
    let a = point(0.1f64, 0.7);
    let b = point(12.3, -4.0);
    let c = point(3.0, 1e-3);
    let abc = orient2d(a, b, c);
    assert!(abc != 0.0);
    assert_eq!(abc > 0.0, orient2d(b, a, c) < 0.0);
    assert_eq!(abc > 0.0, orient2d(b, c, a) > 0.0);

    assert_eq!(orient2d(a, a, c), 0.0);
    assert_eq!(orient2d(a, b, b), 0.0);
}

#[test]
fn orientation_needs_exact_arithmetic() {
    // c lies just off the line through a and b. The naive evaluation rounds to zero.
    let a = point(0.5f64, 0.5);
    let b = point(12.0, 12.0);
    let c = point(24.0, 24.000000000000004);

    let exact = orient2d(a, b, c);
    let naive = (a.y - c.y) * (b.x - c.x) - (a.x - c.x) * (b.y - c.y);
    assert_eq!(naive, 0.0);
    assert!(exact < 0.0, "{}", exact);

    let on_line = orient2d(a, b, point(24.0f64, 24.0));
    assert_eq!(on_line, 0.0);
}

#[test]
fn in_circle_unit_circle() {
    let a = point(0.0f64, -1.0);
    let b = point(1.0, 0.0);
    let c = point(0.0, 1.0);
    assert!(orient2d(a, b, c) < 0.0);

    assert!(in_circle(a, b, c, point(-0.5, 0.0)) > 0.0);
    assert_eq!(in_circle(a, b, c, point(-1.0, 0.0)), 0.0);
    assert!(in_circle(a, b, c, point(-1.5, 0.0)) < 0.0);

    // Reversing the triangle flips the sign.
    assert!(in_circle(c, b, a, point(-0.5, 0.0)) < 0.0);
}

#[test]
fn in_circle_across_magnitudes() {
    let mut x = 1e-4f64;
    for _ in 0..8 {
        let a = point(0.0, x);
        let b = point(-x, -x);
        let c = point(x, -x);
        assert!(in_circle(a, b, c, point(0.0, 0.0)) > 0.0);
        assert_eq!(in_circle(a, b, c, point(0.0, x)), 0.0);
        assert!(in_circle(a, b, c, point(0.0, 2.0 * x)) < 0.0);
        x *= 10.0;
    }
}

#[test]
fn in_circle_exact_matches_fast_path() {
    let a = [0.0, -1.0];
    let b = [1.0, 0.0];
    let c = [0.0, 1.0];
    assert!(in_circle_exact(a, b, c, [-0.5, 0.0]) > 0.0);
    assert_eq!(in_circle_exact(a, b, c, [-1.0, 0.0]), 0.0);
    assert!(in_circle_exact(a, b, c, [-1.5, 0.0]) < 0.0);
    assert!(in_circle_exact(a, b, c, [0.3, 0.2]) > 0.0);
    assert!(in_circle_exact(a, b, c, [3.0, 2.0]) < 0.0);
}

#[test]
fn single_precision_points() {
    let a = point(0.0f32, 0.0);
    let b = point(1.0f32, 0.0);
    let c = point(0.0f32, 1.0);
    // Counter-clockwise with y down.
    assert!(orient2d(a, c, b) > 0.0);
    assert!(orient2d(a, b, c) < 0.0);
    assert!(in_circle(a, b, c, point(0.5f32, 0.5)) > 0.0);
}
