//! The default path data structure.
//!

use crate::builder::PathBuilder;
use crate::math::*;
use crate::{Event, PathEvent};

use std::fmt;
use std::iter::{FromIterator, IntoIterator};

/// Enumeration corresponding to the [Event](enum.Event.html) enum
/// without the parameters.
///
/// This is used by the [Path](struct.Path.html) data structure to store path events a tad
/// more efficiently.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub(crate) enum Verb {
    LineTo,
    CubicTo,
    Begin,
    Close,
    End,
}

/// A simple path data structure.
///
/// # Representation
///
/// Paths contain two buffers:
/// - a buffer of commands (Begin, Line, Cubic, Close or End),
/// - and a buffer of points that can be endpoints or control points.
///
/// The order of storage for points is determined by the sequence of commands.
///
/// ```ascii
///  __________________________
/// |       |      |         |
/// | Begin | Line |  Cubic  | ...
/// |_______|______|_________|_
///  ______________________________________________
/// |         |         |          |          |
/// |start x,y| to x, y | ctrl1 x,y| ctrl2 x,y| to x, y ...
/// |_________|_________|__________|__________|_
/// ```
///
/// Paths keep their allocations when cleared or turned back into a builder, which lets
/// applications that rebuild a shape every frame avoid reallocating.
#[derive(Clone, Default, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Path {
    points: Vec<Point>,
    verbs: Vec<Verb>,
}

impl Path {
    /// Creates a [Builder](struct.Builder.html) to build a path.
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Creates an empty path.
    pub fn new() -> Path {
        Path {
            points: Vec::new(),
            verbs: Vec::new(),
        }
    }

    /// Iterates over the events of the path.
    pub fn iter(&self) -> Iter {
        Iter::new(&self.points, &self.verbs)
    }

    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }

    /// Removes all events, keeping the allocated memory.
    pub fn clear(&mut self) {
        self.points.clear();
        self.verbs.clear();
    }

    /// Turns the path back into an empty builder that reuses its memory.
    pub fn into_builder(mut self) -> Builder {
        self.clear();
        Builder {
            points: self.points,
            verbs: self.verbs,
            first: point(0.0, 0.0),
            current: point(0.0, 0.0),
            in_subpath: false,
        }
    }

    /// Number of sub-paths.
    pub fn num_sub_paths(&self) -> usize {
        self.verbs.iter().filter(|v| **v == Verb::Begin).count()
    }
}

impl FromIterator<PathEvent> for Path {
    fn from_iter<T: IntoIterator<Item = PathEvent>>(iter: T) -> Path {
        let mut builder = Path::builder();
        for event in iter.into_iter() {
            builder.path_event(event);
        }

        builder.build()
    }
}

impl<'l> IntoIterator for &'l Path {
    type Item = PathEvent;
    type IntoIter = Iter<'l>;

    fn into_iter(self) -> Iter<'l> {
        self.iter()
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        fn write_point(formatter: &mut fmt::Formatter, point: Point) -> fmt::Result {
            write!(formatter, " {} {}", point.x, point.y)
        }

        write!(formatter, "\"")?;

        for evt in self {
            match evt {
                PathEvent::Begin { at } => {
                    write!(formatter, " M")?;
                    write_point(formatter, at)?;
                }
                PathEvent::End { close, .. } => {
                    if close {
                        write!(formatter, " Z")?;
                    }
                }
                PathEvent::Line { to, .. } => {
                    write!(formatter, " L")?;
                    write_point(formatter, to)?;
                }
                PathEvent::Cubic {
                    ctrl1, ctrl2, to, ..
                } => {
                    write!(formatter, " C")?;
                    write_point(formatter, ctrl1)?;
                    write_point(formatter, ctrl2)?;
                    write_point(formatter, to)?;
                }
            }
        }

        write!(formatter, "\"")
    }
}

/// The default builder for `Path`.
#[derive(Clone)]
pub struct Builder {
    points: Vec<Point>,
    verbs: Vec<Verb>,
    first: Point,
    current: Point,
    in_subpath: bool,
}

impl Builder {
    pub fn new() -> Self {
        Builder::with_capacity(0, 0)
    }

    pub fn with_capacity(points: usize, edges: usize) -> Self {
        Builder {
            points: Vec::with_capacity(points),
            verbs: Vec::with_capacity(edges),
            first: point(0.0, 0.0),
            current: point(0.0, 0.0),
            in_subpath: false,
        }
    }

    /// Ends the current sub-path if any and returns the path.
    pub fn build(mut self) -> Path {
        if self.in_subpath {
            self.end(false);
        }

        Path {
            points: self.points,
            verbs: self.verbs,
        }
    }

    fn edge(&mut self) {
        if !self.in_subpath {
            let at = self.current;
            self.begin(at);
        }
    }
}

impl PathBuilder for Builder {
    fn begin(&mut self, at: Point) {
        if self.in_subpath {
            self.end(false);
        }
        nan_check(at);

        self.first = at;
        self.current = at;
        self.in_subpath = true;
        self.points.push(at);
        self.verbs.push(Verb::Begin);
    }

    fn end(&mut self, close: bool) {
        if !self.in_subpath {
            return;
        }

        self.in_subpath = false;
        self.verbs.push(if close { Verb::Close } else { Verb::End });
        self.current = self.first;
    }

    fn line_to(&mut self, to: Point) {
        self.edge();
        nan_check(to);

        self.current = to;
        self.points.push(to);
        self.verbs.push(Verb::LineTo);
    }

    fn cubic_bezier_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point) {
        self.edge();
        nan_check(ctrl1);
        nan_check(ctrl2);
        nan_check(to);

        self.current = to;
        self.points.push(ctrl1);
        self.points.push(ctrl2);
        self.points.push(to);
        self.verbs.push(Verb::CubicTo);
    }

    fn reserve(&mut self, endpoints: usize, ctrl_points: usize) {
        self.points.reserve(endpoints + ctrl_points);
        self.verbs.reserve(endpoints);
    }
}

impl Default for Builder {
    fn default() -> Self {
        Builder::new()
    }
}

#[inline]
fn nan_check(p: Point) {
    debug_assert!(!p.x.is_nan());
    debug_assert!(!p.y.is_nan());
}

/// An iterator for `Path`.
#[derive(Clone)]
pub struct Iter<'l> {
    points: std::slice::Iter<'l, Point>,
    verbs: std::slice::Iter<'l, Verb>,
    current: Point,
    first: Point,
}

impl<'l> Iter<'l> {
    fn new(points: &'l [Point], verbs: &'l [Verb]) -> Self {
        Iter {
            points: points.iter(),
            verbs: verbs.iter(),
            current: point(0.0, 0.0),
            first: point(0.0, 0.0),
        }
    }

    #[inline]
    fn next_point(&mut self) -> Point {
        // Verbs and points are pushed together by the builder.
        self.points.next().copied().unwrap_or(self.current)
    }
}

impl<'l> Iterator for Iter<'l> {
    type Item = PathEvent;
    #[inline]
    fn next(&mut self) -> Option<PathEvent> {
        match self.verbs.next() {
            Some(&Verb::Begin) => {
                self.current = self.next_point();
                self.first = self.current;
                Some(PathEvent::Begin { at: self.current })
            }
            Some(&Verb::LineTo) => {
                let from = self.current;
                self.current = self.next_point();
                Some(PathEvent::Line {
                    from,
                    to: self.current,
                })
            }
            Some(&Verb::CubicTo) => {
                let from = self.current;
                let ctrl1 = self.next_point();
                let ctrl2 = self.next_point();
                self.current = self.next_point();
                Some(PathEvent::Cubic {
                    from,
                    ctrl1,
                    ctrl2,
                    to: self.current,
                })
            }
            Some(&Verb::Close) => {
                let last = self.current;
                self.current = self.first;
                Some(PathEvent::End {
                    last,
                    first: self.first,
                    close: true,
                })
            }
            Some(&Verb::End) => {
                let last = self.current;
                self.current = self.first;
                Some(PathEvent::End {
                    last,
                    first: self.first,
                    close: false,
                })
            }
            None => None,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.verbs.size_hint()
    }
}

#[test]
fn test_path_builder_1() {
    let mut p = Path::builder();
    p.line_to(point(1.0, 0.0));
    p.line_to(point(2.0, 0.0));
    p.line_to(point(3.0, 0.0));
    p.cubic_bezier_to(point(4.0, 0.0), point(4.0, 1.0), point(4.0, 2.0));
    p.end(true);

    p.begin(point(10.0, 0.0));
    p.line_to(point(11.0, 0.0));
    p.line_to(point(12.0, 0.0));
    p.line_to(point(13.0, 0.0));
    p.cubic_bezier_to(point(14.0, 0.0), point(14.0, 1.0), point(14.0, 2.0));
    p.end(true);

    p.begin(point(1.0, 1.0));
    p.line_to(point(2.0, 2.0));

    let path = p.build();

    let mut it = path.iter();
    // The first edge implicitly begins at the origin.
    assert_eq!(it.next(), Some(PathEvent::Begin { at: point(0.0, 0.0) }));
    assert_eq!(
        it.next(),
        Some(PathEvent::Line {
            from: point(0.0, 0.0),
            to: point(1.0, 0.0)
        })
    );
    assert_eq!(
        it.next(),
        Some(PathEvent::Line {
            from: point(1.0, 0.0),
            to: point(2.0, 0.0)
        })
    );
    assert_eq!(
        it.next(),
        Some(PathEvent::Line {
            from: point(2.0, 0.0),
            to: point(3.0, 0.0)
        })
    );
    assert_eq!(
        it.next(),
        Some(PathEvent::Cubic {
            from: point(3.0, 0.0),
            ctrl1: point(4.0, 0.0),
            ctrl2: point(4.0, 1.0),
            to: point(4.0, 2.0)
        })
    );
    assert_eq!(
        it.next(),
        Some(PathEvent::End {
            last: point(4.0, 2.0),
            first: point(0.0, 0.0),
            close: true
        })
    );

    assert_eq!(it.next(), Some(PathEvent::Begin { at: point(10.0, 0.0) }));
    assert_eq!(
        it.next(),
        Some(PathEvent::Line {
            from: point(10.0, 0.0),
            to: point(11.0, 0.0)
        })
    );
    assert_eq!(
        it.nth(2),
        Some(PathEvent::Cubic {
            from: point(13.0, 0.0),
            ctrl1: point(14.0, 0.0),
            ctrl2: point(14.0, 1.0),
            to: point(14.0, 2.0)
        })
    );
    assert_eq!(
        it.next(),
        Some(PathEvent::End {
            last: point(14.0, 2.0),
            first: point(10.0, 0.0),
            close: true
        })
    );

    assert_eq!(it.next(), Some(PathEvent::Begin { at: point(1.0, 1.0) }));
    assert_eq!(
        it.next(),
        Some(PathEvent::Line {
            from: point(1.0, 1.0),
            to: point(2.0, 2.0)
        })
    );
    // build() ends the last sub-path.
    assert_eq!(
        it.next(),
        Some(PathEvent::End {
            last: point(2.0, 2.0),
            first: point(1.0, 1.0),
            close: false
        })
    );
    assert_eq!(it.next(), None);
    assert_eq!(it.next(), None);

    assert_eq!(path.num_sub_paths(), 3);
}

#[test]
fn test_path_builder_empty() {
    let path = Path::builder().build();
    let mut it = path.iter();
    assert_eq!(it.next(), None);
    assert_eq!(it.next(), None);
    assert!(path.is_empty());
}

#[test]
fn test_begin_ends_previous_sub_path() {
    let mut p = Path::builder();
    p.begin(point(0.0, 0.0));
    p.line_to(point(1.0, 0.0));
    p.begin(point(5.0, 5.0));
    p.end(false);
    // end() outside of a sub-path is ignored.
    p.end(true);

    let events: Vec<PathEvent> = p.build().iter().collect();
    assert_eq!(
        events,
        vec![
            PathEvent::Begin { at: point(0.0, 0.0) },
            PathEvent::Line {
                from: point(0.0, 0.0),
                to: point(1.0, 0.0)
            },
            PathEvent::End {
                last: point(1.0, 0.0),
                first: point(0.0, 0.0),
                close: false
            },
            PathEvent::Begin { at: point(5.0, 5.0) },
            PathEvent::End {
                last: point(5.0, 5.0),
                first: point(5.0, 5.0),
                close: false
            },
        ]
    );
}

#[test]
fn test_edge_after_end_starts_at_first_point() {
    let mut p = Path::builder();
    p.add_polygon(&[point(0.0, 0.0), point(1.0, 0.0), point(1.0, 1.0)]);
    p.line_to(point(3.0, 3.0));
    let path = p.build();

    let events: Vec<PathEvent> = path.iter().collect();
    assert_eq!(events[4], PathEvent::Begin { at: point(0.0, 0.0) });
    assert_eq!(path.num_sub_paths(), 2);
}

#[test]
fn test_clear_and_reuse() {
    let mut p = Path::builder();
    p.add_polygon(&[point(0.0, 0.0), point(1.0, 0.0), point(1.0, 1.0)]);
    let mut path = p.build();
    assert!(!path.is_empty());

    path.clear();
    assert!(path.is_empty());
    assert_eq!(path.iter().next(), None);

    let mut p = path.into_builder();
    p.add_polygon(&[point(2.0, 0.0), point(3.0, 0.0), point(3.0, 1.0)]);
    let path = p.build();
    assert_eq!(path.iter().next(), Some(PathEvent::Begin { at: point(2.0, 0.0) }));
}

#[test]
fn test_from_iterator() {
    let mut p = Path::builder();
    p.begin(point(1.0, 1.0));
    p.cubic_bezier_to(point(2.0, 1.0), point(3.0, 2.0), point(3.0, 3.0));
    p.close();
    let path = p.build();

    let copy: Path = path.iter().collect();
    assert_eq!(copy, path);

    assert_eq!(format!("{:?}", path), "\" M 1 1 C 2 1 3 2 3 3 Z\"");
}
