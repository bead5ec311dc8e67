//! Per-node sub-graphs for nested (box-in-box) drawings.
//!
//! Composes the two builders the way a renderer does: every class node of a
//! [`DedupGraph`] gets the [`MatrixGraph`] of its representative, and every
//! placeholder node gets [`MatrixGraph::empty`].

use petgraph::graph::NodeIndex;
use qvdraw_core::IntegerMatrix;
use tracing::{debug, instrument};

use crate::dedup::DedupGraph;
use crate::label::LabelStrategy;
use crate::matrix_graph::{MatrixGraph, MatrixGraphBuilder};

/// Sub-graph of every node, indexed by `NodeIndex::index()`.
#[instrument(skip_all, fields(strategy = ?strategy))]
pub fn materialize<T, E>(dedup: &DedupGraph<T, E>, strategy: LabelStrategy<'_>) -> Vec<MatrixGraph>
where
    T: AsRef<IntegerMatrix>,
{
    let builder = MatrixGraphBuilder::new(strategy);
    materialize_with(dedup, |rep| builder.build(rep.as_ref()))
}

/// Like [`materialize`] with a caller-chosen conversion per representative.
pub fn materialize_with<T, E, F>(dedup: &DedupGraph<T, E>, mut convert: F) -> Vec<MatrixGraph>
where
    F: FnMut(&T) -> MatrixGraph,
{
    let graphs: Vec<MatrixGraph> = dedup
        .graph
        .node_indices()
        .map(|node: NodeIndex| {
            dedup
                .representative(node)
                .map_or_else(MatrixGraph::empty, &mut convert)
        })
        .collect();
    debug!(
        nodes = graphs.len(),
        placeholders = dedup.placeholder_count(),
        "sub-graphs materialized"
    );
    graphs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::DedupGraphBuilder;
    use crate::label::ClusterAnnotator;
    use qvdraw_core::Seed;
    use qvdraw_core::equivalence::{ByKey, Natural};

    fn m(s: &str) -> IntegerMatrix {
        s.parse().expect("valid matrix text")
    }

    #[test]
    fn placeholders_get_empty_graphs() {
        let a2 = m("{ { 0 1 } { -1 0 } }");
        let dedup = DedupGraphBuilder::new(Natural).build(vec![(Some(a2), vec![None])]);
        let graphs = materialize(&dedup, LabelStrategy::None);
        assert_eq!(graphs.len(), 2);
        assert_eq!(graphs[0].node_count(), 2);
        assert_eq!(graphs[0].edge_count(), 1);
        assert_eq!(graphs[1].node_count(), 0);
        assert!(graphs[1].labels.is_none());
    }

    #[test]
    fn cluster_labels_through_materialize_with() {
        let seed = Seed::with_default_cluster(m("{ { 0 2 } { -2 0 } }"));
        let dedup = DedupGraphBuilder::new(ByKey::new(|s: &Seed| s.matrix().clone()))
            .build_linked([(seed, Vec::new())]);
        let graphs = materialize_with(&dedup, |seed| {
            let annotator = ClusterAnnotator::new(seed);
            MatrixGraphBuilder::new(LabelStrategy::Custom(&annotator)).build(seed.matrix())
        });
        assert_eq!(graphs[0].node_label(NodeIndex::new(1)), Some("x_1"));
        assert_eq!(graphs[0].label_between(0, 1), Some("2"));
    }
}
