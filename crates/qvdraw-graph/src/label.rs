//! Edge and node labelling strategies for matrix graphs.
//!
//! # Overview
//!
//! A positive matrix cell `k = a[i][j]` becomes an arrow `i → j`. How that
//! arrow is drawn depends on the [`LabelStrategy`]:
//!
//! | Strategy | Edges per positive cell | Labels |
//! |----------|-------------------------|--------|
//! | [`LabelStrategy::None`] | `k` parallel edges | none |
//! | [`LabelStrategy::Symmetry`] | one | [`symmetry_label`] |
//! | [`LabelStrategy::Custom`] | one | decided by an [`Annotator`] |
//!
//! ## Symmetry rule
//!
//! With `k_t = a[j][i]`:
//!
//! - `k != -k_t`: the cell pair is not skew-symmetric, so both magnitudes
//!   are shown as `"k,-k_t"` when `i < j` and `"-k_t,k"` otherwise. The
//!   upper-triangle value always comes first, whichever cell is visited.
//! - `k == -k_t`, `k != 1`: the multiplicity alone, `"k"`.
//! - `k == -k_t == 1`: no label.

#![allow(clippy::module_name_repetitions)]

use std::fmt;

use qvdraw_core::Seed;
use qvdraw_core::config::LabelMode;

/// A positive matrix cell together with its transposed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellPair {
    pub row: usize,
    pub col: usize,
    /// `a[row][col]`, always positive when handed to an [`Annotator`].
    pub value: i64,
    /// `a[col][row]`, zero outside the stored matrix.
    pub transposed: i64,
}

impl CellPair {
    /// `true` if `a[col][row] == -a[row][col]`.
    #[must_use]
    pub fn is_skew(&self) -> bool {
        self.transposed.checked_neg() == Some(self.value)
    }
}

/// Decides the labels of a single-edge matrix graph.
pub trait Annotator {
    /// Label for the edge built from `cell`.
    fn edge_label(&self, cell: CellPair) -> Option<String>;

    /// Label for the node at matrix index `index`.
    fn node_label(&self, _index: usize) -> Option<String> {
        None
    }
}

/// How a matrix graph represents multiplicities and which labels it carries.
#[derive(Clone, Copy, Default)]
pub enum LabelStrategy<'a> {
    #[default]
    None,
    Symmetry,
    Custom(&'a dyn Annotator),
}

impl LabelStrategy<'_> {
    /// `true` unless the strategy is [`LabelStrategy::None`].
    #[must_use]
    pub const fn is_labelled(&self) -> bool {
        !matches!(self, Self::None)
    }

    pub(crate) fn annotator(&self) -> Option<&dyn Annotator> {
        match self {
            Self::None => None,
            Self::Symmetry => Some(&SymmetryAnnotator),
            Self::Custom(annotator) => Some(*annotator),
        }
    }
}

impl fmt::Debug for LabelStrategy<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Symmetry => f.write_str("Symmetry"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl From<LabelMode> for LabelStrategy<'static> {
    fn from(mode: LabelMode) -> Self {
        match mode {
            LabelMode::None => Self::None,
            LabelMode::Symmetry => Self::Symmetry,
        }
    }
}

/// The symmetry label for `cell`; see the module docs.
#[must_use]
pub fn symmetry_label(cell: CellPair) -> Option<String> {
    let CellPair {
        row,
        col,
        value: k,
        transposed: k_t,
    } = cell;
    if !cell.is_skew() {
        // widened so that negating i64::MIN cannot overflow
        let neg_t = -i128::from(k_t);
        let label = if row < col {
            format!("{k},{neg_t}")
        } else {
            format!("{neg_t},{k}")
        };
        Some(label)
    } else if k != 1 {
        Some(k.to_string())
    } else {
        None
    }
}

/// Edge labels from [`symmetry_label`], no node labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SymmetryAnnotator;

impl Annotator for SymmetryAnnotator {
    fn edge_label(&self, cell: CellPair) -> Option<String> {
        symmetry_label(cell)
    }
}

/// Symmetry edge labels plus the seed's cluster variable names on nodes.
#[derive(Debug, Clone, Copy)]
pub struct ClusterAnnotator<'s> {
    seed: &'s Seed,
}

impl<'s> ClusterAnnotator<'s> {
    #[must_use]
    pub const fn new(seed: &'s Seed) -> Self {
        Self { seed }
    }
}

impl Annotator for ClusterAnnotator<'_> {
    fn edge_label(&self, cell: CellPair) -> Option<String> {
        symmetry_label(cell)
    }

    fn node_label(&self, index: usize) -> Option<String> {
        self.seed.variable(index).map(str::to_string)
    }
}
