#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::match_like_matches_macro)]

//! Data structures and traits to work with paths made of lines and cubic bézier curves.
//!
//! Paths are the input of the triangulator: an ordered sequence of sub-paths, each of
//! which is implicitly closed when it gets triangulated.
//!
//! This crate is reexported in [tessera](https://docs.rs/tessera/).
//!
//! # Examples
//!
//! ```
//! use tessera_path::Path;
//! use tessera_path::math::point;
//! use tessera_path::builder::*;
//!
//! let mut builder = Path::builder();
//!
//! builder.begin(point(0.0, 0.0));
//! builder.line_to(point(1.0, 2.0));
//! builder.cubic_bezier_to(point(2.0, 2.0), point(2.0, 1.0), point(2.0, 0.0));
//! builder.close();
//!
//! // Beginning a new sub-path ends the previous one.
//! builder.begin(point(5.0, 5.0));
//! builder.line_to(point(6.0, 5.0));
//! builder.line_to(point(6.0, 6.0));
//!
//! let path = builder.build();
//!
//! for event in &path {
//!     println!("{:?}", event);
//! }
//! ```
//!

pub use tessera_geom as geom;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

pub mod builder;
mod events;
pub mod path;

pub use crate::events::*;
#[doc(inline)]
pub use crate::path::Path;

pub mod traits {
    //! `tessera_path` traits reexported here for convenience.

    pub use crate::builder::PathBuilder;
}

pub mod math {
    //! f32 version of the tessera_geom types used everywhere. Most other tessera crates
    //! reexport them.

    use crate::geom::euclid;

    /// Alias for ```euclid::default::Point2D<f32>```.
    pub type Point = euclid::default::Point2D<f32>;

    /// Alias for ```euclid::default::Point3D<f32>```.
    pub type Point3D = euclid::default::Point3D<f32>;

    /// Alias for ```euclid::default::Vector2D<f32>```.
    pub type Vector = euclid::default::Vector2D<f32>;

    /// Shorthand for `Vector::new(x, y)`.
    #[inline]
    pub fn vector(x: f32, y: f32) -> Vector {
        Vector::new(x, y)
    }

    /// Shorthand for `Point::new(x, y)`.
    #[inline]
    pub fn point(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }
}

/// The fill rule defines how to determine what is inside and what is outside of the shape.
///
/// See the SVG specification.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum FillRule {
    EvenOdd,
    NonZero,
}

impl FillRule {
    #[inline]
    pub fn is_in(&self, winding_number: i32) -> bool {
        match *self {
            FillRule::EvenOdd => winding_number % 2 != 0,
            FillRule::NonZero => winding_number != 0,
        }
    }

    #[inline]
    pub fn is_out(&self, winding_number: i32) -> bool {
        !self.is_in(winding_number)
    }
}

#[test]
fn fill_rules() {
    assert!(FillRule::EvenOdd.is_in(1));
    assert!(FillRule::EvenOdd.is_in(-1));
    assert!(FillRule::EvenOdd.is_out(2));
    assert!(FillRule::EvenOdd.is_out(0));
    assert!(FillRule::NonZero.is_in(2));
    assert!(FillRule::NonZero.is_in(-1));
    assert!(FillRule::NonZero.is_out(0));
}
