//! Caller-supplied notions of "the same object".
//!
//! # Overview
//!
//! Graph construction collapses domain objects into one node per
//! *equivalence class*. The class is never defined by identity or by the
//! builder; it is injected through the [`Equivalence`] capability, a pair of
//! functions `equivalent(a, b)` and `class_hash(a)`.
//!
//! ## Consistency law
//!
//! Implementations must guarantee
//!
//! ```text
//! equivalent(a, b)  ⇒  class_hash(a) == class_hash(b)
//! ```
//!
//! Breaking the law is a caller contract violation. Nothing panics; objects
//! that are equivalent but hash differently simply land in different classes,
//! so the resulting graph shape is unspecified.
//!
//! ## Provided capabilities
//!
//! | Capability | Classes |
//! |------------|---------|
//! | [`Natural`] | `Eq` + `Hash` of the type itself |
//! | [`ByKey`] | equality of a derived canonical key |
//! | [`FnEquivalence`] | two arbitrary closures |
//! | [`Relabeling`] | square matrices equal up to simultaneous row/column permutation |

mod index;
mod relabel;

pub use index::ClassIndex;
pub use relabel::Relabeling;

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// An equality/hash pair defining equivalence classes over `T`.
pub trait Equivalence<T: ?Sized> {
    /// `true` if `a` and `b` belong to the same class.
    fn equivalent(&self, a: &T, b: &T) -> bool;

    /// Hash of `value`'s class. Equivalent values must hash equally.
    fn class_hash(&self, value: &T) -> u64;
}

impl<T: ?Sized, E: Equivalence<T> + ?Sized> Equivalence<T> for &E {
    fn equivalent(&self, a: &T, b: &T) -> bool {
        (**self).equivalent(a, b)
    }

    fn class_hash(&self, value: &T) -> u64 {
        (**self).class_hash(value)
    }
}

/// Hash any `Hash` value with a fixed-key hasher.
///
/// `DefaultHasher::new` is deterministic across runs, which keeps class
/// bucket layout (and therefore tracing output) reproducible.
#[must_use]
pub fn stable_hash<K: Hash + ?Sized>(key: &K) -> u64 {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish()
}

// ---------------------------------------------------------------------------
// Natural
// ---------------------------------------------------------------------------

/// Classes are the type's own `Eq`/`Hash`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Natural;

impl<T: Eq + Hash + ?Sized> Equivalence<T> for Natural {
    fn equivalent(&self, a: &T, b: &T) -> bool {
        a == b
    }

    fn class_hash(&self, value: &T) -> u64 {
        stable_hash(value)
    }
}

// ---------------------------------------------------------------------------
// ByKey
// ---------------------------------------------------------------------------

/// Classes are equality of `key(value)`.
///
/// Useful when the domain has a cheap canonical form, e.g. a seed compared
/// by its exchange matrix only.
#[derive(Debug, Clone, Copy)]
pub struct ByKey<F> {
    key: F,
}

impl<F> ByKey<F> {
    pub const fn new(key: F) -> Self {
        Self { key }
    }
}

impl<T: ?Sized, K: Eq + Hash, F: Fn(&T) -> K> Equivalence<T> for ByKey<F> {
    fn equivalent(&self, a: &T, b: &T) -> bool {
        (self.key)(a) == (self.key)(b)
    }

    fn class_hash(&self, value: &T) -> u64 {
        stable_hash(&(self.key)(value))
    }
}

// ---------------------------------------------------------------------------
// FnEquivalence
// ---------------------------------------------------------------------------

/// Classes defined by an explicit `(equals, hash)` closure pair.
#[derive(Debug, Clone, Copy)]
pub struct FnEquivalence<Q, H> {
    equals: Q,
    hash: H,
}

impl<Q, H> FnEquivalence<Q, H> {
    pub const fn new(equals: Q, hash: H) -> Self {
        Self { equals, hash }
    }
}

impl<T: ?Sized, Q, H> Equivalence<T> for FnEquivalence<Q, H>
where
    Q: Fn(&T, &T) -> bool,
    H: Fn(&T) -> u64,
{
    fn equivalent(&self, a: &T, b: &T) -> bool {
        (self.equals)(a, b)
    }

    fn class_hash(&self, value: &T) -> u64 {
        (self.hash)(value)
    }
}
