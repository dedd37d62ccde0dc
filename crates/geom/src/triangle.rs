use crate::scalar::Scalar;
use crate::Point;

/// A 2D triangle defined by three points `a`, `b` and `c`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Triangle<S> {
    pub a: Point<S>,
    pub b: Point<S>,
    pub c: Point<S>,
}

impl<S: Scalar> Triangle<S> {
    /// Area of the triangle, positive when `a`, `b`, `c` are counter-clockwise with the
    /// y axis pointing up.
    #[inline]
    pub fn signed_area(&self) -> S {
        (self.b - self.a).cross(self.c - self.a) * S::HALF
    }

    #[inline]
    pub fn area(&self) -> S {
        self.signed_area().abs()
    }

    #[inline]
    pub fn centroid(&self) -> Point<S> {
        let s = (self.a.to_vector() + self.b.to_vector() + self.c.to_vector()) / S::THREE;

        s.to_point()
    }
}

#[test]
fn test_area_and_centroid() {
    use crate::point;

    let t = Triangle {
        a: point(0.0f64, 0.0),
        b: point(4.0, 0.0),
        c: point(0.0, 3.0),
    };
    assert_eq!(t.signed_area(), 6.0);
    assert_eq!(
        Triangle {
            a: t.b,
            b: t.a,
            c: t.c
        }
        .signed_area(),
        -6.0
    );
    assert_eq!(t.area(), 6.0);
    assert_eq!(t.centroid(), point(4.0 / 3.0, 1.0));
}
