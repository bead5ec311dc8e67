//! Bounded breadth-first exploration producing dedup-builder sources.
//!
//! [`BoundedExploration`] walks a relation (mutation, moves, anything the
//! caller can express as a neighbour function) from a start object and
//! yields `(Some(object), links)` pairs in breadth-first order, one pair per
//! admitted equivalence class. It is the bounded lazy source that
//! [`DedupGraphBuilder::build`](crate::dedup::DedupGraphBuilder::build)
//! expects.
//!
//! With a limit, at most `limit` classes are admitted. A neighbour whose
//! class was not admitted because the limit was reached appears as `None`
//! in the links, so it becomes a placeholder node downstream. Without a
//! limit the caller guarantees that the relation has finitely many classes.

use std::collections::VecDeque;

use qvdraw_core::config::ExploreConfig;
use qvdraw_core::{ClassIndex, Equivalence};
use tracing::{debug, warn};

/// Lazy breadth-first traversal over equivalence classes.
pub struct BoundedExploration<T, E, F> {
    equivalence: E,
    neighbours: F,
    limit: Option<usize>,
    seen: ClassIndex<T, ()>,
    queue: VecDeque<T>,
    truncated: bool,
}

impl<T, E, F, I> BoundedExploration<T, E, F>
where
    T: Clone,
    E: Equivalence<T>,
    F: FnMut(&T) -> I,
    I: IntoIterator<Item = T>,
{
    /// Start exploring from `start`. `limit` caps the number of classes.
    pub fn new(start: T, equivalence: E, neighbours: F, limit: Option<usize>) -> Self {
        let mut exploration = Self {
            equivalence,
            neighbours,
            limit,
            seen: ClassIndex::new(),
            queue: VecDeque::new(),
            truncated: false,
        };
        if exploration.has_room() {
            exploration.admit(start);
        }
        exploration
    }

    /// [`new`](Self::new) with the limit taken from `config`.
    pub fn with_config(start: T, equivalence: E, neighbours: F, config: &ExploreConfig) -> Self {
        Self::new(start, equivalence, neighbours, config.limit)
    }

    /// Number of classes admitted so far.
    #[must_use]
    pub const fn admitted(&self) -> usize {
        self.seen.len()
    }

    /// `true` once some neighbour was turned away by the limit.
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        self.truncated
    }

    fn has_room(&self) -> bool {
        self.limit.is_none_or(|limit| self.seen.len() < limit)
    }

    fn admit(&mut self, value: T) {
        self.seen.insert(&self.equivalence, value.clone(), ());
        self.queue.push_back(value);
    }
}

impl<T, E, F, I> Iterator for BoundedExploration<T, E, F>
where
    T: Clone,
    E: Equivalence<T>,
    F: FnMut(&T) -> I,
    I: IntoIterator<Item = T>,
{
    type Item = (Option<T>, Vec<Option<T>>);

    fn next(&mut self) -> Option<Self::Item> {
        let Some(current) = self.queue.pop_front() else {
            debug!(
                classes = self.seen.len(),
                truncated = self.truncated,
                "exploration finished"
            );
            return None;
        };
        let mut links = Vec::new();
        for neighbour in (self.neighbours)(&current) {
            if self.seen.contains(&self.equivalence, &neighbour) {
                links.push(Some(neighbour));
            } else if self.has_room() {
                self.admit(neighbour.clone());
                links.push(Some(neighbour));
            } else {
                if !self.truncated {
                    warn!(
                        limit = self.limit,
                        "exploration limit reached, further classes become placeholders"
                    );
                    self.truncated = true;
                }
                links.push(None);
            }
        }
        Some((Some(current), links))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qvdraw_core::equivalence::Natural;

    /// Integers mod `n`, each linked to its successor and predecessor.
    fn cycle(n: u32) -> impl FnMut(&u32) -> Vec<u32> {
        move |&v| vec![(v + 1) % n, (v + n - 1) % n]
    }

    #[test]
    fn unbounded_visits_every_class_once() {
        let pairs: Vec<_> = BoundedExploration::new(0_u32, Natural, cycle(5), None).collect();
        assert_eq!(pairs.len(), 5);
        let objects: Vec<_> = pairs.iter().filter_map(|(o, _)| *o).collect();
        // breadth-first from 0
        assert_eq!(objects, vec![0, 1, 4, 2, 3]);
        for (_, links) in &pairs {
            assert!(links.iter().all(Option::is_some));
        }
    }

    #[test]
    fn limit_turns_new_classes_into_placeholders() {
        let mut explore = BoundedExploration::new(0_u32, Natural, cycle(10), Some(3));
        let pairs: Vec<_> = explore.by_ref().collect();
        assert_eq!(pairs.len(), 3);
        assert_eq!(explore.admitted(), 3);
        assert!(explore.is_truncated());
        // 0 admits 1 and 9; 1 links back to 0 and out to 2, past the cutoff
        assert_eq!(pairs[1], (Some(1), vec![None, Some(0)]));
    }

    #[test]
    fn configured_limit_applies() {
        let config = ExploreConfig { limit: Some(2) };
        let mut explore = BoundedExploration::with_config(0_u32, Natural, cycle(6), &config);
        assert_eq!(explore.by_ref().count(), 2);
        assert!(explore.is_truncated());

        let unbounded = ExploreConfig::default();
        let explore = BoundedExploration::with_config(0_u32, Natural, cycle(6), &unbounded);
        assert_eq!(explore.count(), 6);
    }

    #[test]
    fn limit_zero_yields_nothing() {
        let mut explore = BoundedExploration::new(0_u32, Natural, cycle(3), Some(0));
        assert!(explore.next().is_none());
        assert_eq!(explore.admitted(), 0);
    }

    #[test]
    fn limit_above_class_count_is_not_truncation() {
        let mut explore = BoundedExploration::new(0_u32, Natural, cycle(4), Some(10));
        assert_eq!(explore.by_ref().count(), 4);
        assert!(!explore.is_truncated());
    }
}
