//! The move table: sub-quiver rewrites that preserve mutation class.
//!
//! # Overview
//!
//! A move replaces a small sub-quiver `lhs` by `rhs` (or back) inside a
//! larger quiver. The move-graph traversal consults the table for every
//! quiver it expands, so the table is configuration, not state: it is built
//! once at startup, validated, and then only ever borrowed.
//!
//! ```rust,ignore
//! let table = MoveTable::builtin()?;
//! let explorer = my_move_traversal(start, &table, limit);
//! ```
//!
//! ## Data format
//!
//! Tables are TOML documents with one `[[move]]` entry per move:
//!
//! ```toml
//! [[move]]
//! lhs = "{ { 0 1 0 } { -1 0 1 } { 0 -1 0 } }"
//! rhs = "{ { 0 -1 1 } { 1 0 -1 } { -1 1 0 } }"
//! connections = [0, 2]
//! requirements = ["unconnected", "line"]
//! ```
//!
//! `requirements[k]` constrains vertex `connections[k]`:
//!
//! - `"unconnected"`: no arrows to the rest of the quiver.
//! - `"line"`: attached to the rest of the quiver by a single line.
//! - `{ connected_to = v }`: joined to connection vertex `v` through the rest
//!   of the quiver.
//! - `{ line_to = v }`: joined to connection vertex `v` by a single line
//!   through the rest of the quiver.
//!
//! The optional `finite_lhs_to_rhs` / `finite_rhs_to_lhs` matrices name a
//! sub-quiver that must be mutation-finite for the move to apply in that
//! direction.
//!
//! The bundled table (`data/moves.toml`) holds the moves used to classify
//! mutation-finite quivers of rank 6 to 10.

#![allow(clippy::module_name_repetitions)]

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::ErrorCode;
use crate::matrix::IntegerMatrix;

const BUILTIN_TABLE: &str = include_str!("../data/moves.toml");

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum MoveTableError {
    #[error("move table parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("move {index}: lhs and rhs must be square matrices of the same size")]
    Shape { index: usize },
    #[error("move {index}: sides must be skew-symmetric quiver matrices")]
    NotSkewSymmetric { index: usize },
    #[error("move {index}: {connections} connections, {requirements} requirements")]
    RequirementCount {
        index: usize,
        connections: usize,
        requirements: usize,
    },
    #[error("move {index}: vertex {vertex} out of range for a {size}-vertex move")]
    VertexOutOfRange {
        index: usize,
        vertex: usize,
        size: usize,
    },
    #[error("move {index}: finite requirement must be {size}x{size}")]
    FiniteShape { index: usize, size: usize },
}

impl MoveTableError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Parse(_) => ErrorCode::MoveTableParse,
            _ => ErrorCode::MoveTableInvalid,
        }
    }
}

// ---------------------------------------------------------------------------
// MoveDefinition
// ---------------------------------------------------------------------------

/// How a connection vertex of a move may attach to the surrounding quiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionRequirement {
    Unconnected,
    Line,
    ConnectedTo(usize),
    LineTo(usize),
}

impl ConnectionRequirement {
    /// The other connection vertex this requirement refers to, if any.
    #[must_use]
    pub const fn partner(self) -> Option<usize> {
        match self {
            Self::ConnectedTo(v) | Self::LineTo(v) => Some(v),
            Self::Unconnected | Self::Line => None,
        }
    }
}

/// One sub-quiver rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MoveDefinition {
    pub lhs: IntegerMatrix,
    pub rhs: IntegerMatrix,
    #[serde(default)]
    pub connections: Vec<usize>,
    #[serde(default)]
    pub requirements: Vec<ConnectionRequirement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finite_lhs_to_rhs: Option<IntegerMatrix>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finite_rhs_to_lhs: Option<IntegerMatrix>,
}

impl MoveDefinition {
    /// Number of vertices in each side of the move.
    #[must_use]
    pub fn size(&self) -> usize {
        self.lhs.num_rows()
    }

    /// Requirement attached to each connection vertex, in order.
    pub fn connection_requirements(
        &self,
    ) -> impl Iterator<Item = (usize, ConnectionRequirement)> + '_ {
        self.connections
            .iter()
            .copied()
            .zip(self.requirements.iter().copied())
    }

    /// The same move applied right to left.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            lhs: self.rhs.clone(),
            rhs: self.lhs.clone(),
            connections: self.connections.clone(),
            requirements: self.requirements.clone(),
            finite_lhs_to_rhs: self.finite_rhs_to_lhs.clone(),
            finite_rhs_to_lhs: self.finite_lhs_to_rhs.clone(),
        }
    }

    /// Check the structural rules for the move at position `index`.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule as a [`MoveTableError`].
    pub fn validate(&self, index: usize) -> Result<(), MoveTableError> {
        let size = self.size();
        if !self.lhs.is_square() || !self.rhs.is_square() || self.rhs.num_rows() != size {
            return Err(MoveTableError::Shape { index });
        }
        if !self.lhs.is_skew_symmetric() || !self.rhs.is_skew_symmetric() {
            return Err(MoveTableError::NotSkewSymmetric { index });
        }
        if self.connections.len() != self.requirements.len() {
            return Err(MoveTableError::RequirementCount {
                index,
                connections: self.connections.len(),
                requirements: self.requirements.len(),
            });
        }
        let partners = self.requirements.iter().filter_map(|r| r.partner());
        let mut vertices = self.connections.iter().copied().chain(partners);
        if let Some(vertex) = vertices.find(|&v| v >= size) {
            return Err(MoveTableError::VertexOutOfRange {
                index,
                vertex,
                size,
            });
        }
        let finite = [&self.finite_lhs_to_rhs, &self.finite_rhs_to_lhs];
        if finite
            .into_iter()
            .flatten()
            .any(|m| !m.is_square() || m.num_rows() != size)
        {
            return Err(MoveTableError::FiniteShape { index, size });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MoveTable
// ---------------------------------------------------------------------------

/// An immutable, validated list of moves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveTable {
    #[serde(rename = "move", default)]
    moves: Vec<MoveDefinition>,
}

impl MoveTable {
    /// Build a table from already-constructed moves.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure.
    pub fn new(moves: Vec<MoveDefinition>) -> Result<Self, MoveTableError> {
        let table = Self { moves };
        table.validate()?;
        Ok(table)
    }

    /// The table bundled with qvdraw.
    ///
    /// # Errors
    ///
    /// Only fails if the bundled data is corrupt.
    #[instrument]
    pub fn builtin() -> Result<Self, MoveTableError> {
        Self::from_toml_str(BUILTIN_TABLE)
    }

    /// Parse and validate a TOML move table.
    ///
    /// # Errors
    ///
    /// Returns [`MoveTableError::Parse`] on malformed TOML or matrices, and
    /// a validation variant for structurally invalid moves.
    pub fn from_toml_str(text: &str) -> Result<Self, MoveTableError> {
        let table: Self = toml::from_str(text)?;
        table.validate()?;
        debug!(
            moves = table.len(),
            max_size = table.max_size(),
            "move table loaded"
        );
        Ok(table)
    }

    /// Read, parse and validate a move table file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails to parse or
    /// validate.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid move table {}", path.display()))
    }

    /// # Errors
    ///
    /// Returns the first invalid move's error.
    pub fn validate(&self) -> Result<(), MoveTableError> {
        self.moves
            .iter()
            .enumerate()
            .try_for_each(|(index, mv)| mv.validate(index))
    }

    #[must_use]
    pub fn moves(&self) -> &[MoveDefinition] {
        &self.moves
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MoveDefinition> {
        self.moves.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Largest move size in the table (0 for an empty table).
    #[must_use]
    pub fn max_size(&self) -> usize {
        self.moves
            .iter()
            .map(MoveDefinition::size)
            .max()
            .unwrap_or(0)
    }

    /// Moves whose sides have exactly `size` vertices.
    pub fn of_size(&self, size: usize) -> impl Iterator<Item = &MoveDefinition> + '_ {
        self.moves.iter().filter(move |mv| mv.size() == size)
    }
}

impl<'a> IntoIterator for &'a MoveTable {
    type Item = &'a MoveDefinition;
    type IntoIter = std::slice::Iter<'a, MoveDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}
