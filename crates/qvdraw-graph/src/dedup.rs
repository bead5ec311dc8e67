//! Equivalence-deduplicating graph construction.
//!
//! # Overview
//!
//! [`DedupGraphBuilder`] consumes a sequence of `(object, linked objects)`
//! pairs, in order and exactly once, and builds a directed graph with one
//! node per equivalence class. Classes come from an injected
//! [`Equivalence`] capability; the builder never compares objects itself.
//!
//! ```text
//! source:  (a, [b, c]) (b', [a]) (c, [None])
//!                 ↓  a ~ a', b ~ b'
//! graph:   a → b   a → c   b → a   c → ·      (· = placeholder)
//! map:     {a ↦ a, b ↦ b, c ↦ c}
//! ```
//!
//! ## Placeholders
//!
//! `None` stands for an object that could not be resolved, such as a link
//! past an exploration cutoff. Every `None` gets a fresh node that is never
//! deduplicated and never enters the [`NodeMap`], so a map miss for a graph
//! node means "placeholder vertex".
//!
//! ## Edges
//!
//! Edges are never merged: two links between the same pair of classes give
//! two parallel edges.
//!
//! ## Contract
//!
//! The source must be finite. An inconsistent capability (equivalent objects
//! with different class hashes) yields extra nodes, never a panic.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;
use std::hash::Hash;

use petgraph::EdgeType;
use petgraph::graph::{DiGraph, Graph, IndexType, NodeIndex};
use qvdraw_core::{ClassIndex, Equivalence};
use tracing::{debug, instrument, trace};

// ---------------------------------------------------------------------------
// GraphSink
// ---------------------------------------------------------------------------

/// A graph the dedup builder can write into.
pub trait GraphSink {
    type Node: Copy + Eq + Hash;

    fn add_node(&mut self) -> Self::Node;

    fn add_edge(&mut self, source: Self::Node, target: Self::Node);
}

impl<N, E, Ty, Ix> GraphSink for Graph<N, E, Ty, Ix>
where
    N: Default,
    E: Default,
    Ty: EdgeType,
    Ix: IndexType,
{
    type Node = NodeIndex<Ix>;

    fn add_node(&mut self) -> Self::Node {
        Graph::add_node(self, N::default())
    }

    fn add_edge(&mut self, source: Self::Node, target: Self::Node) {
        Graph::add_edge(self, source, target, E::default());
    }
}

// ---------------------------------------------------------------------------
// NodeMap
// ---------------------------------------------------------------------------

/// Node ↔ representative association produced by one build.
///
/// Holds exactly one entry per equivalence class encountered. Placeholder
/// nodes have no entry. Immutable once built.
#[derive(Debug, Clone)]
pub struct NodeMap<T, N = NodeIndex> {
    representatives: HashMap<N, T>,
    by_class: HashMap<u64, Vec<N>>,
}

impl<T, N: Copy + Eq + Hash> NodeMap<T, N> {
    fn from_index<E>(index: ClassIndex<T, N>, eq: &E) -> Self
    where
        E: Equivalence<T> + ?Sized,
    {
        let mut representatives = HashMap::with_capacity(index.len());
        let mut by_class: HashMap<u64, Vec<N>> = HashMap::new();
        for (value, node) in index.into_entries() {
            let class = eq.class_hash(&value);
            by_class.entry(class).or_default().push(node);
            representatives.insert(node, value);
        }
        Self {
            representatives,
            by_class,
        }
    }

    /// Representative of `node`'s class, `None` for placeholders.
    #[must_use]
    pub fn representative(&self, node: N) -> Option<&T> {
        self.representatives.get(&node)
    }

    /// `true` if `node` has no representative.
    ///
    /// Only meaningful for nodes of the graph this map was built with.
    #[must_use]
    pub fn is_placeholder(&self, node: N) -> bool {
        !self.representatives.contains_key(&node)
    }

    /// Node of `value`'s class. `eq` must be the capability used to build.
    pub fn find<E>(&self, eq: &E, value: &T) -> Option<N>
    where
        E: Equivalence<T> + ?Sized,
    {
        self.by_class
            .get(&eq.class_hash(value))?
            .iter()
            .copied()
            .find(|node| {
                self.representatives
                    .get(node)
                    .is_some_and(|rep| eq.equivalent(rep, value))
            })
    }

    /// `(node, representative)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (N, &T)> + '_ {
        self.representatives.iter().map(|(node, rep)| (*node, rep))
    }

    /// Number of classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.representatives.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.representatives.is_empty()
    }
}

// ---------------------------------------------------------------------------
// DedupGraphBuilder
// ---------------------------------------------------------------------------

/// Builds one node per equivalence class from a linked-object source.
#[derive(Debug, Clone, Copy, Default)]
pub struct DedupGraphBuilder<E> {
    equivalence: E,
}

/// Result of [`DedupGraphBuilder::build`].
#[derive(Debug, Clone)]
pub struct DedupGraph<T, E> {
    pub graph: DiGraph<(), ()>,
    pub nodes: NodeMap<T>,
    equivalence: E,
}

impl<E> DedupGraphBuilder<E> {
    pub const fn new(equivalence: E) -> Self {
        Self { equivalence }
    }

    pub const fn equivalence(&self) -> &E {
        &self.equivalence
    }

    /// Build a fresh graph from `source`.
    ///
    /// `None` objects, in either position, become placeholder nodes.
    pub fn build<T, S, L>(self, source: S) -> DedupGraph<T, E>
    where
        E: Equivalence<T>,
        S: IntoIterator<Item = (Option<T>, L)>,
        L: IntoIterator<Item = Option<T>>,
    {
        let mut graph: DiGraph<(), ()> = DiGraph::new();
        let nodes = self.build_into(&mut graph, source);
        DedupGraph {
            graph,
            nodes,
            equivalence: self.equivalence,
        }
    }

    /// [`build`](Self::build) for sources without placeholders.
    pub fn build_linked<T, S, L>(self, source: S) -> DedupGraph<T, E>
    where
        E: Equivalence<T>,
        S: IntoIterator<Item = (T, L)>,
        L: IntoIterator<Item = T>,
    {
        self.build(
            source
                .into_iter()
                .map(|(obj, links)| (Some(obj), links.into_iter().map(Some))),
        )
    }

    /// Write the deduplicated graph into `sink` and return its node map.
    ///
    /// Nodes and edges already in `sink` are left alone and never matched
    /// against `source` objects.
    #[instrument(skip_all)]
    pub fn build_into<T, G, S, L>(&self, sink: &mut G, source: S) -> NodeMap<T, G::Node>
    where
        E: Equivalence<T>,
        G: GraphSink,
        S: IntoIterator<Item = (Option<T>, L)>,
        L: IntoIterator<Item = Option<T>>,
    {
        let mut resolver = Resolver {
            index: ClassIndex::new(),
            placeholders: 0,
        };
        let mut edges = 0_usize;
        let mut pairs = 0_usize;

        for (object, links) in source {
            pairs += 1;
            let from = resolver.resolve(&self.equivalence, sink, object);
            for linked in links {
                let to = resolver.resolve(&self.equivalence, sink, linked);
                sink.add_edge(from, to);
                edges += 1;
            }
        }

        debug!(
            pairs,
            classes = resolver.index.len(),
            placeholders = resolver.placeholders,
            edges,
            "dedup graph built"
        );
        NodeMap::from_index(resolver.index, &self.equivalence)
    }
}

struct Resolver<T, N> {
    index: ClassIndex<T, N>,
    placeholders: usize,
}

impl<T, N: Copy> Resolver<T, N> {
    fn resolve<E, G>(&mut self, eq: &E, sink: &mut G, object: Option<T>) -> N
    where
        E: Equivalence<T>,
        G: GraphSink<Node = N>,
    {
        match object {
            Some(value) => {
                let make = || sink.add_node();
                self.index.resolve_or_insert_with(eq, value, make).0
            }
            None => {
                self.placeholders += 1;
                trace!(placeholders = self.placeholders, "placeholder node");
                sink.add_node()
            }
        }
    }
}

impl<T, E> DedupGraph<T, E> {
    pub const fn equivalence(&self) -> &E {
        &self.equivalence
    }

    /// Node of `value`'s class, if any source object was equivalent to it.
    pub fn node_of(&self, value: &T) -> Option<NodeIndex>
    where
        E: Equivalence<T>,
    {
        self.nodes.find(&self.equivalence, value)
    }

    #[must_use]
    pub fn representative(&self, node: NodeIndex) -> Option<&T> {
        self.nodes.representative(node)
    }

    /// Number of equivalence classes (non-placeholder nodes).
    #[must_use]
    pub fn class_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn placeholder_count(&self) -> usize {
        self.graph.node_count() - self.nodes.len()
    }

    /// Placeholder nodes in creation order.
    pub fn placeholders(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph
            .node_indices()
            .filter(|&node| self.nodes.is_placeholder(node))
    }

    pub fn into_parts(self) -> (DiGraph<(), ()>, NodeMap<T>, E) {
        (self.graph, self.nodes, self.equivalence)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use petgraph::visit::EdgeRef;
    use qvdraw_core::equivalence::{FnEquivalence, Natural};

    /// Objects with an id (the class) and a tag (the instance).
    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Obj {
        id: u32,
        tag: &'static str,
    }

    fn obj(id: u32, tag: &'static str) -> Obj {
        Obj { id, tag }
    }

    fn by_id() -> impl Equivalence<Obj> {
        let same_id = |a: &Obj, b: &Obj| a.id == b.id;
        FnEquivalence::new(same_id, |a: &Obj| u64::from(a.id))
    }

    #[test]
    fn equivalent_instances_share_first_node() {
        let source = [(obj(1, "first"), vec![]), (obj(1, "second"), vec![])];
        let dedup = DedupGraphBuilder::new(by_id()).build_linked(source);
        assert_eq!(dedup.graph.node_count(), 1);
        let node = dedup.node_of(&obj(1, "probe")).expect("class present");
        assert_eq!(dedup.representative(node).map(|o| o.tag), Some("first"));
    }

    #[test]
    fn null_links_become_distinct_placeholders() {
        let source = vec![
            (Some(obj(1, "a")), vec![None]),
            (Some(obj(1, "a")), vec![None]),
        ];
        let dedup = DedupGraphBuilder::new(by_id()).build(source);
        assert_eq!(dedup.graph.node_count(), 3);
        assert_eq!(dedup.class_count(), 1);
        assert_eq!(dedup.placeholder_count(), 2);
        let placeholders: Vec<_> = dedup.placeholders().collect();
        assert_eq!(placeholders.len(), 2);
        assert_ne!(placeholders[0], placeholders[1]);
        for &p in &placeholders {
            assert!(dedup.representative(p).is_none());
        }
    }

    #[test]
    fn null_object_gets_its_own_node() {
        let dedup = DedupGraphBuilder::new(Natural).build(vec![(None, vec![Some(7_u8)])]);
        assert_eq!(dedup.graph.node_count(), 2);
        assert_eq!(dedup.graph.edge_count(), 1);
        let seven = dedup.node_of(&7).expect("linked object resolved");
        let edge = dedup.graph.edge_references().next().expect("one edge");
        assert!(dedup.nodes.is_placeholder(edge.source()));
        assert_eq!(edge.target(), seven);
    }

    #[test]
    fn zero_links_give_one_node_per_class() {
        let source = [3_u32, 1, 4, 1, 5, 9, 2, 6, 5, 3].map(|v| (v, Vec::<u32>::new()));
        let dedup = DedupGraphBuilder::new(Natural).build_linked(source);
        assert_eq!(dedup.graph.node_count(), 7);
        assert_eq!(dedup.class_count(), 7);
        assert_eq!(dedup.graph.edge_count(), 0);
    }

    #[test]
    fn repeated_links_stay_parallel() {
        let source = [("a", vec!["b", "b"]), ("b", vec!["a"]), ("a", vec!["b"])];
        let dedup = DedupGraphBuilder::new(Natural).build_linked(source);
        let a = dedup.node_of(&"a").expect("a");
        let b = dedup.node_of(&"b").expect("b");
        assert_eq!(dedup.graph.edges_connecting(a, b).count(), 3);
        assert_eq!(dedup.graph.edges_connecting(b, a).count(), 1);
    }

    #[test]
    fn link_targets_are_deduplicated_against_keys() {
        let source = [
            (obj(1, "key"), vec![obj(2, "link")]),
            (obj(2, "key"), vec![obj(1, "link")]),
        ];
        let dedup = DedupGraphBuilder::new(by_id()).build_linked(source);
        assert_eq!(dedup.graph.node_count(), 2);
        let two = dedup.node_of(&obj(2, "any")).expect("class 2");
        // first sight of class 2 was as a link target
        assert_eq!(dedup.representative(two).map(|o| o.tag), Some("link"));
    }

    #[test]
    fn node_map_keys_are_graph_nodes() {
        let source = vec![
            (Some(1_i32), vec![Some(2), None]),
            (Some(2), vec![Some(3), None]),
        ];
        let dedup = DedupGraphBuilder::new(Natural).build(source);
        let nodes: Vec<_> = dedup.graph.node_indices().collect();
        assert!(dedup.nodes.iter().all(|(node, _)| nodes.contains(&node)));
        assert_eq!(dedup.class_count() + dedup.placeholder_count(), nodes.len());
    }

    #[test]
    fn build_into_writes_to_an_existing_graph() {
        let mut graph: DiGraph<(), ()> = DiGraph::new();
        let pre = graph.add_node(());
        let builder = DedupGraphBuilder::new(Natural);
        let map = builder.build_into(&mut graph, vec![(Some('x'), vec![Some('y')])]);
        assert_eq!(graph.node_count(), 3);
        assert!(map.is_placeholder(pre));
        let y = map.find(builder.equivalence(), &'y');
        assert_eq!(y, Some(NodeIndex::new(2)));
    }

    #[test]
    fn custom_sink_receives_nodes_and_edges() {
        #[derive(Default)]
        struct EdgeList {
            nodes: usize,
            edges: Vec<(usize, usize)>,
        }
        impl GraphSink for EdgeList {
            type Node = usize;
            fn add_node(&mut self) -> usize {
                self.nodes += 1;
                self.nodes - 1
            }
            fn add_edge(&mut self, source: usize, target: usize) {
                self.edges.push((source, target));
            }
        }

        let mut sink = EdgeList::default();
        let source = vec![(Some("a"), vec![Some("b"), Some("a")])];
        let map = DedupGraphBuilder::new(Natural).build_into(&mut sink, source);
        assert_eq!(sink.nodes, 2);
        assert_eq!(sink.edges, vec![(0, 1), (0, 0)]);
        assert_eq!(map.representative(1), Some(&"b"));
    }

    #[test]
    fn inconsistent_capability_splits_classes() {
        let eq = FnEquivalence::new(|_: &u32, _: &u32| true, |a: &u32| u64::from(*a));
        let dedup = DedupGraphBuilder::new(eq).build_linked([(1_u32, vec![2_u32])]);
        assert_eq!(dedup.graph.node_count(), 2);
    }
}
