use crate::flatten_cubic::flatten_cubic_adaptive;
use crate::scalar::Scalar;
use crate::{FlatteningOptions, Point};

/// A 2d curve segment defined by four points: the beginning of the segment, two control
/// points and the end of the segment.
///
/// The curve is defined by equation:
/// ```∀ t ∈ [0..1],  P(t) = (1 - t)³ * from + 3 * (1 - t)² * t * ctrl1 + 3 * t² * (1 - t) * ctrl2 + t³ * to```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct CubicBezierSegment<S> {
    pub from: Point<S>,
    pub ctrl1: Point<S>,
    pub ctrl2: Point<S>,
    pub to: Point<S>,
}

impl<S: Scalar> CubicBezierSegment<S> {
    /// Sample the curve at t (expecting t between 0 and 1).
    pub fn sample(&self, t: S) -> Point<S> {
        let t2 = t * t;
        let t3 = t2 * t;
        let one_t = S::ONE - t;
        let one_t2 = one_t * one_t;
        let one_t3 = one_t2 * one_t;

        self.from * one_t3
            + self.ctrl1.to_vector() * S::THREE * one_t2 * t
            + self.ctrl2.to_vector() * S::THREE * one_t * t2
            + self.to.to_vector() * t3
    }

    /// Approximates the curve with a sequence of points using adaptive subdivision.
    ///
    /// The callback receives the interior points of the approximation in curve order.
    /// Neither `from` nor `to` is passed to the callback, so that consecutive segments of
    /// a path can be chained without duplicates.
    ///
    /// `scale` divides the distance tolerance: flattening a shape that will be drawn
    /// twice as large with a scale of two keeps the on-screen error constant.
    pub fn for_each_adaptive_point<F>(&self, options: &FlatteningOptions, scale: S, callback: &mut F)
    where
        F: FnMut(Point<S>),
    {
        flatten_cubic_adaptive(self, options, scale, callback);
    }

    /// Returns the full polyline approximating the curve, including both end points.
    pub fn adaptive_polyline(&self, options: &FlatteningOptions, scale: S) -> Vec<Point<S>> {
        let mut points = vec![self.from];
        self.for_each_adaptive_point(options, scale, &mut |p| points.push(p));
        points.push(self.to);

        points
    }
}

#[cfg(test)]
use crate::point;

#[test]
fn sample_end_points() {
    let curve = CubicBezierSegment {
        from: point(1.0f32, 2.0),
        ctrl1: point(5.0, 7.0),
        ctrl2: point(-3.0, 4.0),
        to: point(10.0, -1.0),
    };

    assert_eq!(curve.sample(0.0), curve.from);
    assert_eq!(curve.sample(1.0), curve.to);
}

#[test]
fn adaptive_polyline_of_a_line() {
    let curve = CubicBezierSegment {
        from: point(0.0f32, 0.0),
        ctrl1: point(0.0, 5.0),
        ctrl2: point(0.0, 7.0),
        to: point(0.0, 10.0),
    };

    assert_eq!(
        curve.adaptive_polyline(&FlatteningOptions::DEFAULT, 1.0),
        vec![curve.from, curve.to]
    );
}

#[test]
fn adaptive_polyline_of_an_arc() {
    let curve = CubicBezierSegment {
        from: point(0.0f32, 0.0),
        ctrl1: point(0.0, 50.0),
        ctrl2: point(100.0, 50.0),
        to: point(100.0, 0.0),
    };

    let polyline = curve.adaptive_polyline(&FlatteningOptions::tolerance(0.5), 1.0);
    assert!(polyline.len() > 4);
    assert_eq!(polyline.first(), Some(&curve.from));
    assert_eq!(polyline.last(), Some(&curve.to));

    for p in &polyline {
        assert!(p.x >= 0.0 && p.x <= 100.0);
        assert!(p.y >= 0.0 && p.y <= 50.0);
    }
}
