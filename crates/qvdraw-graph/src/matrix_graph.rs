//! Integer matrix → directed multigraph conversion.
//!
//! # Overview
//!
//! [`MatrixGraphBuilder`] turns an `r × c` [`IntegerMatrix`] into a
//! [`petgraph`] multigraph with `max(r, c)` nodes, one per row/column index.
//! Missing rows or columns of a rectangular matrix are treated as zeros, so
//! their nodes are isolated. Node `i` of the result is always
//! `NodeIndex::new(i)`.
//!
//! Only positive cells produce edges. Negative cells are the implied
//! reverse half of a quiver matrix and are never materialized; the builder
//! does not check skew-symmetry. Multiplicities are either parallel edges or
//! a single labelled edge, depending on the [`LabelStrategy`].
//!
//! ## Structure hash
//!
//! [`MatrixGraph::structure_hash`] is a BLAKE3 hash of the node count, the
//! sorted edge list by index, and every label. Two conversions of the same
//! matrix with the same strategy always hash equally even though their
//! `EdgeIndex` handles are unrelated.
//!
//! ```rust,ignore
//! let matrix: IntegerMatrix = "{ { 0 3 } { -3 0 } }".parse()?;
//! let graph = MatrixGraphBuilder::new(LabelStrategy::Symmetry).build(&matrix);
//! assert_eq!(graph.label_between(0, 1), Some("3"));
//! ```

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use qvdraw_core::IntegerMatrix;
use tracing::{debug, instrument};

use crate::label::{CellPair, LabelStrategy};

// ---------------------------------------------------------------------------
// MatrixGraph
// ---------------------------------------------------------------------------

/// Labels attached to a [`MatrixGraph`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphLabels {
    edges: HashMap<EdgeIndex, String>,
    nodes: HashMap<NodeIndex, String>,
}

impl GraphLabels {
    #[must_use]
    pub fn edge(&self, edge: EdgeIndex) -> Option<&str> {
        self.edges.get(&edge).map(String::as_str)
    }

    #[must_use]
    pub fn node(&self, node: NodeIndex) -> Option<&str> {
        self.nodes.get(&node).map(String::as_str)
    }

    /// Number of labelled edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of labelled nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty() && self.nodes.is_empty()
    }
}

/// A quiver drawn from a matrix: plain multigraph plus optional labels.
///
/// `labels` is `None` for [`LabelStrategy::None`] and `Some` (possibly empty)
/// for every other strategy.
#[derive(Debug, Clone, Default)]
pub struct MatrixGraph {
    pub graph: DiGraph<(), ()>,
    pub labels: Option<GraphLabels>,
}

impl MatrixGraph {
    /// Graph with no nodes and no labels.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Node for matrix index `index`.
    #[must_use]
    pub fn node(&self, index: usize) -> Option<NodeIndex> {
        (index < self.graph.node_count()).then(|| NodeIndex::new(index))
    }

    #[must_use]
    pub fn edge_label(&self, edge: EdgeIndex) -> Option<&str> {
        self.labels.as_ref()?.edge(edge)
    }

    #[must_use]
    pub fn node_label(&self, node: NodeIndex) -> Option<&str> {
        self.labels.as_ref()?.node(node)
    }

    /// Label of the edge `source → target`, looked up by endpoint pair.
    #[must_use]
    pub fn label_between(&self, source: usize, target: usize) -> Option<&str> {
        let (source, target) = (self.node(source)?, self.node(target)?);
        let edge = self.graph.find_edge(source, target)?;
        self.edge_label(edge)
    }

    /// Number of parallel edges `source → target`.
    #[must_use]
    pub fn multiplicity(&self, source: usize, target: usize) -> usize {
        match (self.node(source), self.node(target)) {
            (Some(s), Some(t)) => self.graph.edges_connecting(s, t).count(),
            _ => 0,
        }
    }

    /// Every edge as `(source, target)` matrix indices, sorted.
    ///
    /// Parallel edges appear once each, so this is the edge multiset.
    #[must_use]
    pub fn edges_by_index(&self) -> Vec<(usize, usize)> {
        let mut edges: Vec<_> = self
            .graph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index()))
            .collect();
        edges.sort_unstable();
        edges
    }

    /// BLAKE3 content hash of the node count, edge multiset and labels.
    #[must_use]
    pub fn structure_hash(&self) -> String {
        let mut edges: Vec<(usize, usize, Option<&str>)> = self
            .graph
            .edge_references()
            .map(|e| {
                let label = self.edge_label(e.id());
                (e.source().index(), e.target().index(), label)
            })
            .collect();
        edges.sort_unstable();

        let mut hasher = blake3::Hasher::new();
        hasher.update(self.node_count().to_string().as_bytes());
        hasher.update(b"\x00");
        for (source, target, label) in edges {
            hasher.update(format!("{source}>{target}").as_bytes());
            if let Some(label) = label {
                hasher.update(b":");
                hasher.update(label.as_bytes());
            }
            hasher.update(b"\x00");
        }
        for node in self.graph.node_indices() {
            if let Some(label) = self.node_label(node) {
                hasher.update(format!("{}=", node.index()).as_bytes());
                hasher.update(label.as_bytes());
                hasher.update(b"\x00");
            }
        }
        format!("blake3:{}", hasher.finalize())
    }
}

// ---------------------------------------------------------------------------
// MatrixGraphBuilder
// ---------------------------------------------------------------------------

/// Converts integer matrices to [`MatrixGraph`]s under one label strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatrixGraphBuilder<'a> {
    strategy: LabelStrategy<'a>,
}

impl<'a> MatrixGraphBuilder<'a> {
    #[must_use]
    pub const fn new(strategy: LabelStrategy<'a>) -> Self {
        Self { strategy }
    }

    #[must_use]
    pub const fn strategy(&self) -> LabelStrategy<'a> {
        self.strategy
    }

    /// Convert `matrix`. Never fails; the empty matrix gives an empty graph.
    #[instrument(
        skip_all,
        fields(rows = matrix.num_rows(), cols = matrix.num_cols(), strategy = ?self.strategy)
    )]
    #[must_use]
    pub fn build(&self, matrix: &IntegerMatrix) -> MatrixGraph {
        let n = matrix.dim();
        let positive = matrix.entries().filter(|&(_, _, k)| k > 0).count();
        let mut graph = DiGraph::with_capacity(n, positive);
        let nodes: Vec<NodeIndex> = (0..n).map(|_| graph.add_node(())).collect();

        let annotator = self.strategy.annotator();
        let mut labels = annotator.map(|_| GraphLabels::default());

        for (i, j, k) in matrix.entries() {
            if k <= 0 {
                continue;
            }
            let (source, target) = (nodes[i], nodes[j]);
            match (annotator, labels.as_mut()) {
                (Some(annotator), Some(labels)) => {
                    let edge = graph.add_edge(source, target, ());
                    let cell = CellPair {
                        row: i,
                        col: j,
                        value: k,
                        transposed: matrix.get_or_zero(j, i),
                    };
                    if let Some(label) = annotator.edge_label(cell) {
                        labels.edges.insert(edge, label);
                    }
                }
                _ => {
                    for _ in 0..k {
                        graph.add_edge(source, target, ());
                    }
                }
            }
        }

        if let (Some(annotator), Some(labels)) = (annotator, labels.as_mut()) {
            for (index, &node) in nodes.iter().enumerate() {
                if let Some(label) = annotator.node_label(index) {
                    labels.nodes.insert(node, label);
                }
            }
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            labelled_edges = labels.as_ref().map_or(0, GraphLabels::edge_count),
            "matrix graph built"
        );
        MatrixGraph { graph, labels }
    }
}

/// Convert `matrix` with `strategy`; shorthand for [`MatrixGraphBuilder::build`].
#[must_use]
pub fn build(matrix: &IntegerMatrix, strategy: LabelStrategy<'_>) -> MatrixGraph {
    MatrixGraphBuilder::new(strategy).build(matrix)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
