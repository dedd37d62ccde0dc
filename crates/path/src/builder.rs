//! Path building utilities.
//!
//! ## Examples
//!
//! ```
//! use tessera_path::{Path, geom::point};
//! use tessera_path::builder::PathBuilder;
//!
//! let mut builder = Path::builder();
//!
//! builder.begin(point(0.0, 0.0));
//! builder.line_to(point(1.0, 0.0));
//! builder.cubic_bezier_to(point(2.0, 0.0), point(2.0, 1.0), point(1.0, 1.0));
//! builder.end(false);
//!
//! builder.begin(point(10.0, 0.0));
//! builder.cubic_bezier_to(point(12.0, 2.0), point(11.0, 2.0), point(5.0, 0.0));
//! builder.close(); // close() is equivalent to end(true).
//!
//! let path = builder.build();
//! ```
//!
//! Sub-paths are always triangulated as closed shapes, so `end(false)` and `close()` only
//! differ in the events produced when iterating over the path.

use crate::events::{Event, PathEvent};
use crate::math::Point;

/// The base path building interface.
///
/// Unlike strict builders, starting a new sub-path or building the path while a sub-path
/// is still open ends it implicitly, and drawing an edge outside of a sub-path starts one
/// at the current position.
pub trait PathBuilder {
    /// Starts a new sub-path at a given position.
    fn begin(&mut self, at: Point);

    /// Ends the current sub-path.
    ///
    /// If `close` is true, a `End { close: true }` event is produced.
    fn end(&mut self, close: bool);

    /// Closes the current sub-path.
    ///
    /// Shorthand for `builder.end(true)`.
    fn close(&mut self) {
        self.end(true);
    }

    /// Adds a line segment to the current sub-path.
    fn line_to(&mut self, to: Point);

    /// Adds a cubic bézier curve to the current sub-path.
    fn cubic_bezier_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point);

    /// Hints at the builder that a certain number of endpoints and control
    /// points will be added.
    ///
    /// The Builder implementation may use this information to pre-allocate
    /// memory as an optimization.
    fn reserve(&mut self, _endpoints: usize, _ctrl_points: usize) {}

    /// Applies the provided path event.
    fn path_event(&mut self, event: PathEvent) {
        match event {
            Event::Begin { at } => {
                self.begin(at);
            }
            Event::Line { to, .. } => {
                self.line_to(to);
            }
            Event::Cubic {
                ctrl1, ctrl2, to, ..
            } => {
                self.cubic_bezier_to(ctrl1, ctrl2, to);
            }
            Event::End { close, .. } => {
                self.end(close);
            }
        }
    }

    /// Adds a sub-path from a polygon.
    ///
    /// There must be no sub-path in progress when this method is called.
    /// No sub-path is in progress after the method is called.
    fn add_polygon(&mut self, points: &[Point]) {
        if points.is_empty() {
            return;
        }

        self.reserve(points.len(), 0);

        self.begin(points[0]);
        for p in &points[1..] {
            self.line_to(*p);
        }

        self.close();
    }
}
