//! Seeds: an exchange matrix paired with a cluster of named variables.
//!
//! Exchange graphs are built over seeds rather than bare matrices; the
//! cluster variable names become node labels when a seed's quiver is drawn.

use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;
use crate::matrix::IntegerMatrix;

/// Prefix used by [`Seed::with_default_cluster`]: variables `x_0, x_1, …`.
pub const DEFAULT_VARIABLE_PREFIX: &str = "x_";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeedError {
    /// The cluster must name exactly one variable per matrix vertex.
    #[error("cluster has {actual} variables, the matrix has {expected} vertices")]
    ClusterSize { expected: usize, actual: usize },
}

impl SeedError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::ClusterSize { .. } => ErrorCode::MatrixShape,
        }
    }
}

/// An exchange matrix together with one cluster variable per vertex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Seed {
    matrix: IntegerMatrix,
    cluster: Vec<String>,
}

impl Seed {
    /// # Errors
    ///
    /// Returns [`SeedError::ClusterSize`] unless `cluster` has exactly
    /// `matrix.dim()` entries.
    pub fn new(matrix: IntegerMatrix, cluster: Vec<String>) -> Result<Self, SeedError> {
        if cluster.len() != matrix.dim() {
            return Err(SeedError::ClusterSize {
                expected: matrix.dim(),
                actual: cluster.len(),
            });
        }
        Ok(Self { matrix, cluster })
    }

    /// Seed whose variables are named `x_0 .. x_{n-1}`.
    #[must_use]
    pub fn with_default_cluster(matrix: IntegerMatrix) -> Self {
        Self::with_prefixed_cluster(matrix, DEFAULT_VARIABLE_PREFIX)
    }

    /// Seed whose variables are named `{prefix}0 .. {prefix}{n-1}`.
    #[must_use]
    pub fn with_prefixed_cluster(matrix: IntegerMatrix, prefix: &str) -> Self {
        let cluster = default_cluster(matrix.dim(), prefix);
        Self { matrix, cluster }
    }

    #[must_use]
    pub const fn matrix(&self) -> &IntegerMatrix {
        &self.matrix
    }

    #[must_use]
    pub fn cluster(&self) -> &[String] {
        &self.cluster
    }

    /// Name of the variable at vertex `index`.
    #[must_use]
    pub fn variable(&self, index: usize) -> Option<&str> {
        self.cluster.get(index).map(String::as_str)
    }
}

impl AsRef<IntegerMatrix> for Seed {
    fn as_ref(&self) -> &IntegerMatrix {
        &self.matrix
    }
}

/// `size` variable names `{prefix}0 .. {prefix}{size-1}`.
#[must_use]
pub fn default_cluster(size: usize, prefix: &str) -> Vec<String> {
    (0..size).map(|i| format!("{prefix}{i}")).collect()
}
