//! Exact arithmetic on floating-point expansions.
//!
//! An expansion is a sequence of `f64` components, ordered by increasing magnitude and
//! non-overlapping, whose exact sum is the represented value. The operations below never
//! round: each one returns a new expansion representing the exact result. Zero
//! components are eliminated, so the last component carries the sign of the value and
//! an expansion holding a single `0.0` represents zero.
//!
//! The algorithms follow Shewchuk, "Adaptive Precision Floating-Point Arithmetic and
//! Fast Robust Geometric Predicates" and require round-to-nearest-even arithmetic.

use arrayvec::ArrayVec;
use std::ops::Deref;

/// 2^27 + 1, used to split a double into two 26-bit halves.
const SPLITTER: f64 = 134_217_729.0;

/// Storage for the components of an expansion.
///
/// Implemented by `Vec<f64>` and by fixed-capacity `ArrayVec`s so that the predicates
/// with a small, known number of terms do not allocate.
pub trait Components: Default + Deref<Target = [f64]> {
    fn push_component(&mut self, value: f64);
}

impl Components for Vec<f64> {
    #[inline]
    fn push_component(&mut self, value: f64) {
        self.push(value);
    }
}

impl<const N: usize> Components for ArrayVec<f64, N> {
    #[inline]
    fn push_component(&mut self, value: f64) {
        self.push(value);
    }
}

/// Exact sum of two doubles as a two-component expansion `[error, sum]`.
#[inline]
pub fn two_sum(a: f64, b: f64) -> [f64; 2] {
    let x = a + b;
    let b_virtual = x - a;
    let a_virtual = x - b_virtual;
    let b_roundoff = b - b_virtual;
    let a_roundoff = a - a_virtual;

    [a_roundoff + b_roundoff, x]
}

/// Requires `|a| >= |b|`.
#[inline]
fn fast_two_sum(a: f64, b: f64) -> [f64; 2] {
    let x = a + b;
    let b_virtual = x - a;

    [b - b_virtual, x]
}

#[inline]
fn split(a: f64) -> (f64, f64) {
    let c = SPLITTER * a;
    let a_big = c - a;
    let hi = c - a_big;

    (hi, a - hi)
}

/// Exact product of two doubles as a two-component expansion `[error, product]`.
#[inline]
pub fn two_product(a: f64, b: f64) -> [f64; 2] {
    let x = a * b;
    let (a_hi, a_lo) = split(a);
    let (b_hi, b_lo) = split(b);
    let err1 = x - a_hi * b_hi;
    let err2 = err1 - a_lo * b_hi;
    let err3 = err2 - a_hi * b_lo;

    [a_lo * b_lo - err3, x]
}

/// Exact `e + f`.
pub fn sum<E: Components>(e: &[f64], f: &[f64]) -> E {
    merge_and_grow(e, f, 1.0)
}

/// Exact `e - f`.
pub fn difference<E: Components>(e: &[f64], f: &[f64]) -> E {
    merge_and_grow(e, f, -1.0)
}

/// Exact `e * b`.
pub fn scale<E: Components>(e: &[f64], b: f64) -> E {
    let mut out = E::default();
    let (first, rest) = match e.split_first() {
        Some(split) => split,
        None => {
            out.push_component(0.0);
            return out;
        }
    };

    let [low, mut q] = two_product(*first, b);
    if low != 0.0 {
        out.push_component(low);
    }

    for &component in rest {
        let [product_low, product_high] = two_product(component, b);
        let [low, sum] = two_sum(q, product_low);
        if low != 0.0 {
            out.push_component(low);
        }
        let [low, next_q] = fast_two_sum(product_high, sum);
        if low != 0.0 {
            out.push_component(low);
        }
        q = next_q;
    }

    if q != 0.0 || out.is_empty() {
        out.push_component(q);
    }

    out
}

/// Merges the components of `e` and `sign * f` by increasing magnitude and accumulates
/// them with `two_sum`, keeping the non-zero roundoff terms.
fn merge_and_grow<E: Components>(e: &[f64], f: &[f64], sign: f64) -> E {
    let mut out = E::default();
    let mut ei = 0;
    let mut fi = 0;

    let mut next = || -> Option<f64> {
        match (e.get(ei), f.get(fi)) {
            (Some(&a), Some(&b)) => {
                if a.abs() <= b.abs() {
                    ei += 1;
                    Some(a)
                } else {
                    fi += 1;
                    Some(b * sign)
                }
            }
            (Some(&a), None) => {
                ei += 1;
                Some(a)
            }
            (None, Some(&b)) => {
                fi += 1;
                Some(b * sign)
            }
            (None, None) => None,
        }
    };

    let mut q = match next() {
        Some(value) => value,
        None => {
            out.push_component(0.0);
            return out;
        }
    };

    while let Some(component) = next() {
        let [low, high] = two_sum(q, component);
        if low != 0.0 {
            out.push_component(low);
        }
        q = high;
    }

    if q != 0.0 || out.is_empty() {
        out.push_component(q);
    }

    out
}

/// The value of the most significant component, which has the sign of the expansion.
#[inline]
pub fn most_significant(e: &[f64]) -> f64 {
    e.last().copied().unwrap_or(0.0)
}

#[test]
fn two_sum_is_exact() {
    let [low, high] = two_sum(1.0, 1e-20);
    assert_eq!(high, 1.0);
    assert_eq!(low, 1e-20);

    let [low, high] = two_sum(0.5, 0.25);
    assert_eq!(high, 0.75);
    assert_eq!(low, 0.0);
}

#[test]
fn two_product_is_exact() {
    // (1 + 2^-30)^2 = 1 + 2^-29 + 2^-60, the last term does not fit in the product.
    let a = 1.0 + (2.0f64).powi(-30);
    let [low, high] = two_product(a, a);
    assert_eq!(high, 1.0 + (2.0f64).powi(-29));
    assert_eq!(low, (2.0f64).powi(-60));
}

#[test]
fn sum_and_difference_cancel() {
    let a = two_product(0.1, 0.3);
    let b = two_product(0.3, 0.1);

    let d: ArrayVec<f64, 4> = difference(&a, &b);
    assert_eq!(&d[..], &[0.0]);

    let s: ArrayVec<f64, 4> = sum(&a, &b);
    let doubled: ArrayVec<f64, 4> = scale(&a, 2.0);
    let d: ArrayVec<f64, 8> = difference(&s, &doubled);
    assert_eq!(&d[..], &[0.0]);
}

#[test]
fn tiny_difference_keeps_its_sign() {
    let big = [1e30];
    let e: Vec<f64> = sum(&big, &[1e-30]);
    let d: Vec<f64> = difference(&e, &big);
    assert_eq!(&d[..], &[1e-30]);

    let d: Vec<f64> = difference(&big, &e);
    assert_eq!(&d[..], &[-1e-30]);
}

#[test]
fn scale_expansion() {
    let e: Vec<f64> = sum(&[3.0], &[1e-20]);
    let s: Vec<f64> = scale(&e, -2.0);
    assert_eq!(&s[..], &[-2e-20, -6.0]);

    let z: Vec<f64> = scale(&e, 0.0);
    assert_eq!(&z[..], &[0.0]);

    let empty: Vec<f64> = scale(&[], 4.0);
    assert_eq!(&empty[..], &[0.0]);
}
