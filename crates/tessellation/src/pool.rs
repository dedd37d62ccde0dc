//! Reusable scratch buffers.
//!
//! The triangulation pipeline needs several short-lived vectors per call (sweep events,
//! hull fragments, vertex stars, work queues). Rebuilding a shape every frame would
//! allocate and free all of them every frame. A [`ScratchPool`] keeps the released
//! vectors around, keyed by element type, and hands them out again, cleared but with
//! their capacity intact.
//!
//! A buffer is checked out as a [`Scratch`] guard which dereferences to a `Vec<T>` and
//! goes back to the pool when dropped, on every exit path of the code that owns it.
//! Two checkouts of the same element type always receive distinct vectors.
//!
//! The pool is not `Sync`: it is meant to be owned by one triangulator and used from one
//! thread.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::ops::{Deref, DerefMut};

const INITIAL_CAPACITY: usize = 32;

/// A collection of reusable vectors, keyed by element type.
#[derive(Default)]
pub struct ScratchPool {
    buffers: RefCell<HashMap<TypeId, Vec<Box<dyn Any>>>>,
}

impl ScratchPool {
    pub fn new() -> Self {
        ScratchPool {
            buffers: RefCell::new(HashMap::new()),
        }
    }

    /// Takes an empty vector out of the pool, or creates one if none is available.
    pub fn checkout<T: 'static>(&self) -> Scratch<T> {
        let recycled = self
            .buffers
            .borrow_mut()
            .get_mut(&TypeId::of::<Vec<T>>())
            .and_then(|stack| stack.pop())
            .and_then(|buffer| buffer.downcast::<Vec<T>>().ok());

        let buffer = match recycled {
            Some(buffer) => *buffer,
            None => Vec::with_capacity(INITIAL_CAPACITY),
        };

        Scratch { pool: self, buffer }
    }

    /// Number of vectors of a given element type currently waiting in the pool.
    pub fn available<T: 'static>(&self) -> usize {
        self.buffers
            .borrow()
            .get(&TypeId::of::<Vec<T>>())
            .map_or(0, |stack| stack.len())
    }

    /// Frees all pooled vectors.
    pub fn clear(&mut self) {
        self.buffers.get_mut().clear();
    }

    fn release<T: 'static>(&self, mut buffer: Vec<T>) {
        buffer.clear();
        self.buffers
            .borrow_mut()
            .entry(TypeId::of::<Vec<T>>())
            .or_insert_with(Vec::new)
            .push(Box::new(buffer));
    }
}

impl fmt::Debug for ScratchPool {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let buffers = self.buffers.borrow();
        let count: usize = buffers.values().map(|stack| stack.len()).sum();
        write!(f, "ScratchPool({} buffers, {} types)", count, buffers.len())
    }
}

/// A vector borrowed from a [`ScratchPool`].
///
/// The vector is cleared and returned to the pool when the guard is dropped.
pub struct Scratch<'l, T: 'static> {
    pool: &'l ScratchPool,
    buffer: Vec<T>,
}

impl<'l, T: 'static> Deref for Scratch<'l, T> {
    type Target = Vec<T>;
    fn deref(&self) -> &Vec<T> {
        &self.buffer
    }
}

impl<'l, T: 'static> DerefMut for Scratch<'l, T> {
    fn deref_mut(&mut self) -> &mut Vec<T> {
        &mut self.buffer
    }
}

impl<'l, T: 'static> Drop for Scratch<'l, T> {
    fn drop(&mut self) {
        let buffer = std::mem::take(&mut self.buffer);
        self.pool.release(buffer);
    }
}

impl<'l, T: fmt::Debug + 'static> fmt::Debug for Scratch<'l, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.buffer.fmt(f)
    }
}

#[test]
fn buffers_are_recycled() {
    let pool = ScratchPool::new();
    assert_eq!(pool.available::<u32>(), 0);

    let capacity = {
        let mut a = pool.checkout::<u32>();
        a.extend_from_slice(&[1, 2, 3]);
        a.reserve(1000);
        a.capacity()
    };
    assert_eq!(pool.available::<u32>(), 1);

    let b = pool.checkout::<u32>();
    assert!(b.is_empty());
    assert_eq!(b.capacity(), capacity);
    assert_eq!(pool.available::<u32>(), 0);
}

#[test]
fn concurrent_checkouts_are_distinct() {
    let pool = ScratchPool::new();
    {
        let mut a = pool.checkout::<u32>();
        let mut b = pool.checkout::<u32>();
        a.push(1);
        b.push(2);
        assert_eq!(&a[..], &[1]);
        assert_eq!(&b[..], &[2]);

        // Other element types live in their own stacks.
        let c = pool.checkout::<(f32, f32)>();
        assert!(c.is_empty());
    }
    assert_eq!(pool.available::<u32>(), 2);
    assert_eq!(pool.available::<(f32, f32)>(), 1);
}

#[test]
fn released_on_early_return() {
    fn bail(pool: &ScratchPool, fail: bool) -> Result<usize, ()> {
        let mut buffer = pool.checkout::<u8>();
        buffer.push(0);
        if fail {
            return Err(());
        }
        Ok(buffer.len())
    }

    let mut pool = ScratchPool::new();
    assert_eq!(bail(&pool, true), Err(()));
    assert_eq!(bail(&pool, false), Ok(1));
    assert_eq!(pool.available::<u8>(), 1);

    pool.clear();
    assert_eq!(pool.available::<u8>(), 0);
}
