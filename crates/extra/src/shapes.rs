//! Closed shapes used to exercise the triangulator.
//!
//! All contours are counter-clockwise with the y axis pointing up unless stated otherwise.

use crate::path::builder::PathBuilder;
use crate::path::math::{point, vector, Point};

use std::f32::consts::PI;

/// Distance of the control points of a quarter circle approximation, for a unit radius.
const CIRCLE_CTRL: f32 = 0.552_284_75;

/// A circle made of four cubic bézier curves.
pub fn build_circle_path<Builder: PathBuilder>(builder: &mut Builder, center: Point, radius: f32) {
    let r = radius;
    let k = radius * CIRCLE_CTRL;

    builder.begin(center + vector(r, 0.0));
    builder.cubic_bezier_to(
        center + vector(r, k),
        center + vector(k, r),
        center + vector(0.0, r),
    );
    builder.cubic_bezier_to(
        center + vector(-k, r),
        center + vector(-r, k),
        center + vector(-r, 0.0),
    );
    builder.cubic_bezier_to(
        center + vector(-r, -k),
        center + vector(-k, -r),
        center + vector(0.0, -r),
    );
    builder.cubic_bezier_to(
        center + vector(k, -r),
        center + vector(r, -k),
        center + vector(r, 0.0),
    );
    builder.close();
}

/// A star polygon alternating between the outer and inner radius.
///
/// The first branch points up.
pub fn build_star_path<Builder: PathBuilder>(
    builder: &mut Builder,
    center: Point,
    outer_radius: f32,
    inner_radius: f32,
    branches: u32,
) {
    let n = branches.max(2) * 2;
    let step = 2.0 * PI / n as f32;

    for i in 0..n {
        let radius = if i % 2 == 0 { outer_radius } else { inner_radius };
        let angle = PI * 0.5 + step * i as f32;
        let p = center + vector(angle.cos(), angle.sin()) * radius;
        if i == 0 {
            builder.begin(p);
        } else {
            builder.line_to(p);
        }
    }
    builder.close();
}

/// Two squares centered on the origin.
///
/// With `reverse_inner`, the inner square is clockwise and cancels out the outer one for
/// both fill rules. Otherwise the inner region has a winding number of two.
pub fn build_nested_squares_path<Builder: PathBuilder>(
    builder: &mut Builder,
    outer_half_size: f32,
    inner_half_size: f32,
    reverse_inner: bool,
) {
    let square = |s: f32| {
        [
            point(-s, -s),
            point(s, -s),
            point(s, s),
            point(-s, s),
        ]
    };

    builder.add_polygon(&square(outer_half_size));

    let mut inner = square(inner_half_size);
    if reverse_inner {
        inner.reverse();
    }
    builder.add_polygon(&inner);
}

/// An irregular curvy shape with no straight edges.
pub fn build_blob_path<Builder: PathBuilder>(builder: &mut Builder) {
    builder.begin(point(0.0, 0.0));
    builder.cubic_bezier_to(point(30.0, -20.0), point(60.0, 20.0), point(80.0, 0.5));
    builder.cubic_bezier_to(point(100.0, -20.0), point(110.0, 40.0), point(79.5, 60.0));
    builder.cubic_bezier_to(point(50.0, 80.0), point(20.0, 40.0), point(0.5, 61.0));
    builder.cubic_bezier_to(point(-20.0, 80.0), point(-30.0, 20.0), point(0.0, 0.0));
    builder.close();
}

#[test]
fn shapes_are_closed() {
    use crate::path::{Path, PathEvent};

    let mut builder = Path::builder();
    build_circle_path(&mut builder, point(1.0, 2.0), 3.0);
    build_star_path(&mut builder, point(0.0, 0.0), 10.0, 4.0, 5);
    build_nested_squares_path(&mut builder, 2.0, 1.0, true);
    build_blob_path(&mut builder);
    let path = builder.build();

    assert_eq!(path.num_sub_paths(), 5);
    let closed = path
        .iter()
        .filter(|event| matches!(event, PathEvent::End { close: true, .. }))
        .count();
    assert_eq!(closed, 5);

    let mut circle = Path::builder();
    build_circle_path(&mut circle, point(0.0, 0.0), 1.0);
    let events: Vec<PathEvent> = circle.build().iter().collect();
    assert_eq!(events.len(), 6);
    assert_eq!(events[0], PathEvent::Begin { at: point(1.0, 0.0) });
    assert_eq!(events[2].to(), point(-1.0, 0.0));
    assert_eq!(events[3].to(), point(0.0, -1.0));
}
