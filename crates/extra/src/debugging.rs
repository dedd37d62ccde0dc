//! Helpers to shrink failing triangulation inputs.

use crate::path::builder::PathBuilder;
use crate::path::geom::FlatteningOptions;
use crate::path::math::Point;
use crate::path::{Path, PathEvent};

use std::panic;

pub type Polygons = Vec<Vec<Point>>;
pub type PolygonsRef<'a> = &'a [Vec<Point>];

/// Flattens each sub-path of a path into a polygon.
///
/// The closing point of a sub-path is not repeated.
pub fn path_to_polygons(path: &Path, tolerance: f32) -> Polygons {
    let options = FlatteningOptions::tolerance(tolerance);
    let mut polygons = Vec::new();
    let mut poly = Vec::new();
    for evt in path.iter() {
        match evt {
            PathEvent::Begin { at } => {
                if !poly.is_empty() {
                    polygons.push(std::mem::take(&mut poly));
                }
                poly.push(at);
            }
            PathEvent::Line { to, .. } => {
                poly.push(to);
            }
            PathEvent::Cubic { .. } => {
                if let Some(segment) = evt.cubic_segment() {
                    segment.for_each_adaptive_point(&options, 1.0, &mut |p| poly.push(p));
                }
                poly.push(evt.to());
            }
            PathEvent::End { first, .. } => {
                if poly.len() > 1 && poly.last() == Some(&first) {
                    poly.pop();
                }
                if !poly.is_empty() {
                    polygons.push(std::mem::take(&mut poly));
                }
            }
        }
    }

    if !poly.is_empty() {
        polygons.push(poly);
    }

    polygons
}

pub fn polygons_to_path(polygons: PolygonsRef) -> Path {
    let mut builder = Path::builder();
    for poly in polygons.iter() {
        builder.add_polygon(poly);
    }
    builder.build()
}

/// Removes sub-paths and vertices from a path as long as `cb` keeps failing, and prints
/// the smallest failing input as a test case.
///
/// `cb` returns `true` when the input still exhibits the failure. Panics count as
/// failures.
pub fn find_reduced_test_case<F: Fn(Path) -> bool + panic::UnwindSafe + panic::RefUnwindSafe>(
    path: &Path,
    cb: &F,
) -> Path {
    let mut polygons = path_to_polygons(path, 0.05);

    println!(" -- removing sub-paths...");

    polygons = find_reduced_test_case_sp(polygons, cb);

    println!(" -- removing vertices...");

    for p in 0..polygons.len() {
        let mut v = 0;
        loop {
            if v >= polygons[p].len() || polygons[p].len() <= 3 {
                break;
            }

            let mut cloned = polygons.clone();
            cloned[p].remove(v);

            let path = polygons_to_path(&cloned);

            let failed = panic::catch_unwind(|| cb(path)).unwrap_or(true);

            if failed {
                polygons = cloned;
                continue;
            }

            v += 1;
        }
    }

    let path = polygons_to_path(&polygons);
    println!(" ----------- reduced test case: -----------\n\n");
    println!("#[test]");
    println!("fn reduced_test_case() {{");
    println!("    let mut builder = Path::builder();\n");
    for poly in &polygons {
        let mut poly_iter = poly.iter();
        if let Some(pos) = poly_iter.next() {
            println!("    builder.begin(point({:?}, {:?}));", pos.x, pos.y);
        }
        for pos in poly_iter {
            println!("    builder.line_to(point({:?}, {:?}));", pos.x, pos.y);
        }
        println!("    builder.close();\n");
    }
    println!("    test_path(&builder.build());\n");
    println!("    // SVG path syntax:");
    println!("    // {:?}", path);
    println!("}}\n\n");

    path
}

fn find_reduced_test_case_sp<F>(mut polygons: Polygons, cb: &F) -> Polygons
where
    F: Fn(Path) -> bool + panic::UnwindSafe + panic::RefUnwindSafe,
{
    let mut i = 0;
    loop {
        if i >= polygons.len() {
            return polygons;
        }

        let mut cloned = polygons.clone();
        cloned.remove(i);
        let path = polygons_to_path(&cloned);

        let failed = panic::catch_unwind(|| cb(path)).unwrap_or(true);

        if failed {
            polygons = cloned;
            continue;
        }

        i += 1;
    }
}

#[test]
fn polygons_round_trip() {
    use crate::path::math::point;

    let polygons = vec![
        vec![point(0.0, 0.0), point(1.0, 0.0), point(1.0, 1.0)],
        vec![point(5.0, 5.0), point(6.0, 5.0), point(6.0, 6.0), point(5.0, 6.0)],
    ];
    let path = polygons_to_path(&polygons);
    assert_eq!(path_to_polygons(&path, 0.1), polygons);
}

#[test]
fn reduce_to_offending_sub_path() {
    use crate::path::math::point;

    // Fails whenever a vertex lies left of x = 0.
    let polygons = vec![
        vec![point(1.0, 1.0), point(2.0, 1.0), point(2.0, 2.0), point(1.0, 2.0)],
        vec![
            point(-1.0, 0.0),
            point(3.0, 0.0),
            point(4.0, 1.0),
            point(3.0, 3.0),
            point(0.5, 3.0),
        ],
    ];
    let path = polygons_to_path(&polygons);

    let reduced = find_reduced_test_case(&path, &|path: Path| {
        path.iter().any(|evt| match evt {
            PathEvent::Begin { at } => at.x < 0.0,
            PathEvent::Line { to, .. } => to.x < 0.0,
            _ => false,
        })
    });

    let reduced = path_to_polygons(&reduced, 0.1);
    assert_eq!(reduced.len(), 1);
    assert_eq!(reduced[0].len(), 3);
    assert!(reduced[0].contains(&point(-1.0, 0.0)));
}
