#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::excessive_precision)]
#![allow(clippy::many_single_char_names)]

//! 2D geometric primitives and predicates on top of euclid.
//!
//! This crate is reexported in [tessera](https://docs.rs/tessera/).
//!
//! # Overview.
//!
//! This crate implements the maths needed to turn vector paths into triangles:
//!
//! - cubic bézier curves and their adaptive flattening,
//! - triangle area and centroid,
//! - exact orientation and in-circle predicates built on floating-point expansions.
//!
//! # Flattening
//!
//! Flattening is the action of approximating a curve with a succession of line segments.
//! Cubic curves are flattened by recursive subdivision (see [`FlatteningOptions`]): a
//! sub-curve stops being split once its control points lie within the distance tolerance
//! of its chord and, optionally, once the turning angle at its ends is small enough.
//!
//! The tolerance threshold corresponds to the maximum distance between the curve and its
//! linear approximation, expressed in path units at a scale of one. Larger scales make
//! the approximation finer.
//!
//! # Robust predicates
//!
//! [`orient2d`] and [`in_circle`] first evaluate their determinant with plain floating
//! point arithmetic and only fall back to exact expansion arithmetic when the result is
//! within the rounding error bound. The sign of the returned value is always exact.

// Reexport dependencies.
pub use arrayvec;
pub use euclid;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

pub mod cubic_bezier;
pub mod expansion;
mod flatten_cubic;
pub mod predicates;
mod triangle;

#[doc(inline)]
pub use crate::cubic_bezier::CubicBezierSegment;
#[doc(inline)]
pub use crate::flatten_cubic::FlatteningOptions;
#[doc(inline)]
pub use crate::predicates::{in_circle, orient2d};
#[doc(inline)]
pub use crate::triangle::Triangle;

pub use crate::scalar::Scalar;

mod scalar {
    pub(crate) use num_traits::{Float, FloatConst, NumCast};

    use std::fmt::{Debug, Display};
    use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

    pub trait Scalar:
        Float
        + NumCast
        + FloatConst
        + Sized
        + Display
        + Debug
        + AddAssign
        + SubAssign
        + MulAssign
        + DivAssign
    {
        const HALF: Self;
        const ZERO: Self;
        const ONE: Self;
        const TWO: Self;
        const THREE: Self;
        const FOUR: Self;
        const EIGHT: Self;

        const MIN: Self;
        const MAX: Self;

        fn value(v: f32) -> Self;

        /// Widens the value for the exact predicates.
        fn to_f64(self) -> f64;
    }

    impl Scalar for f32 {
        const HALF: Self = 0.5;
        const ZERO: Self = 0.0;
        const ONE: Self = 1.0;
        const TWO: Self = 2.0;
        const THREE: Self = 3.0;
        const FOUR: Self = 4.0;
        const EIGHT: Self = 8.0;

        const MIN: Self = f32::MIN;
        const MAX: Self = f32::MAX;

        #[inline]
        fn value(v: f32) -> Self {
            v
        }

        #[inline]
        fn to_f64(self) -> f64 {
            self as f64
        }
    }

    impl Scalar for f64 {
        const HALF: Self = 0.5;
        const ZERO: Self = 0.0;
        const ONE: Self = 1.0;
        const TWO: Self = 2.0;
        const THREE: Self = 3.0;
        const FOUR: Self = 4.0;
        const EIGHT: Self = 8.0;

        const MIN: Self = f64::MIN;
        const MAX: Self = f64::MAX;

        #[inline]
        fn value(v: f32) -> Self {
            v as f64
        }

        #[inline]
        fn to_f64(self) -> f64 {
            self
        }
    }
}

/// Alias for `euclid::default::Point2D`.
pub use euclid::default::Point2D as Point;

/// Alias for `euclid::default::Point3D`.
pub use euclid::default::Point3D;

/// Alias for `euclid::default::Vector2D`.
pub use euclid::default::Vector2D as Vector;

/// Shorthand for `Vector::new(x, y)`.
#[inline]
pub fn vector<S>(x: S, y: S) -> Vector<S> {
    Vector::new(x, y)
}

/// Shorthand for `Point::new(x, y)`.
#[inline]
pub fn point<S>(x: S, y: S) -> Point<S> {
    Point::new(x, y)
}
