//! Equivalence-keyed reverse association.

use std::collections::HashMap;

use super::Equivalence;

/// Maps each equivalence class seen so far to its first representative and
/// a handle (usually a graph node).
///
/// Values are bucketed by [`Equivalence::class_hash`] and compared with
/// [`Equivalence::equivalent`] inside a bucket, so the index never relies on
/// `T: Hash` or `T: Eq`. The capability is passed per call rather than
/// stored; callers must use the same capability for the index's lifetime.
#[derive(Debug, Clone)]
pub struct ClassIndex<T, N> {
    buckets: HashMap<u64, Vec<(T, N)>>,
    len: usize,
}

impl<T, N> Default for ClassIndex<T, N> {
    fn default() -> Self {
        Self {
            buckets: HashMap::new(),
            len: 0,
        }
    }
}

impl<T, N: Copy> ClassIndex<T, N> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of classes recorded.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Representative and handle of `value`'s class, if recorded.
    pub fn find<E>(&self, eq: &E, value: &T) -> Option<(&T, N)>
    where
        E: Equivalence<T> + ?Sized,
    {
        self.buckets
            .get(&eq.class_hash(value))?
            .iter()
            .find(|(rep, _)| eq.equivalent(rep, value))
            .map(|(rep, node)| (rep, *node))
    }

    /// `true` if some recorded representative is equivalent to `value`.
    pub fn contains<E>(&self, eq: &E, value: &T) -> bool
    where
        E: Equivalence<T> + ?Sized,
    {
        self.find(eq, value).is_some()
    }

    /// Record `value` with `node` unless its class is already present.
    ///
    /// Returns the existing handle when the class was already recorded; in
    /// that case `value` is dropped and the first representative is kept.
    pub fn insert<E>(&mut self, eq: &E, value: T, node: N) -> Option<N>
    where
        E: Equivalence<T> + ?Sized,
    {
        let (existing, created) = self.resolve_or_insert_with(eq, value, || node);
        (!created).then_some(existing)
    }

    /// Handle for `value`'s class, creating it with `make` on first sight.
    ///
    /// The returned flag is `true` when a new class was recorded.
    pub fn resolve_or_insert_with<E, F>(&mut self, eq: &E, value: T, make: F) -> (N, bool)
    where
        E: Equivalence<T> + ?Sized,
        F: FnOnce() -> N,
    {
        let bucket = self.buckets.entry(eq.class_hash(&value)).or_default();
        if let Some((_, node)) = bucket.iter().find(|(rep, _)| eq.equivalent(rep, &value)) {
            return (*node, false);
        }
        let node = make();
        bucket.push((value, node));
        self.len += 1;
        (node, true)
    }

    /// Iterate `(representative, handle)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&T, N)> + '_ {
        self.buckets
            .values()
            .flat_map(|bucket| bucket.iter().map(|(rep, node)| (rep, *node)))
    }

    /// Consume the index, yielding `(representative, handle)` pairs.
    pub fn into_entries(self) -> impl Iterator<Item = (T, N)> {
        self.buckets.into_values().flatten()
    }
}
