#![forbid(unsafe_code)]
//! qvdraw-graph library.
//!
//! The graph construction layer: matrices become labelled multigraphs, and
//! linked domain objects become one node per equivalence class. Layout and
//! rendering consume the results; nothing here computes coordinates.
//!
//! ```text
//! start object ──► explore::BoundedExploration ──► (object, links)*
//!                                                       │
//!                                dedup::DedupGraphBuilder::build
//!                                                       ▼
//!                              DedupGraph { graph, nodes: NodeMap }
//!                                                       │
//!                                    nested::materialize (per node)
//!                                                       ▼
//!                   matrix_graph::MatrixGraphBuilder::build ──► MatrixGraph
//! ```
//!
//! The two builders never call each other; `nested` composes them.
//!
//! # Conventions
//!
//! - **Errors**: the builders are infallible; input errors live in `qvdraw-core`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod dedup;
pub mod explore;
pub mod label;
pub mod matrix_graph;
pub mod nested;

pub use dedup::{DedupGraph, DedupGraphBuilder, GraphSink, NodeMap};
pub use explore::BoundedExploration;
pub use label::{Annotator, CellPair, ClusterAnnotator, LabelStrategy, SymmetryAnnotator};
pub use matrix_graph::{GraphLabels, MatrixGraph, MatrixGraphBuilder};
