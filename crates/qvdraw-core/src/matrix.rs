//! Immutable integer matrices and their text format.
//!
//! # Overview
//!
//! [`IntegerMatrix`] is the exchange format between the domain layer and the
//! graph builders: a `rows × cols` grid of signed integers, addressed by
//! zero-based `(row, col)` and never mutated after construction.
//!
//! ## Text format
//!
//! Matrices are written as nested brace groups, one group per row:
//!
//! ```text
//! { { 0 1 0 } { -1 0 1 } { 0 -1 0 } }
//! ```
//!
//! Entries are whitespace separated. `{ }` is the empty (0×0) matrix. A
//! matrix with columns but no rows has no row groups to write, so it is
//! also written `{ }` and reads back as 0×0.
//!
//! The same format is used on the command line, in the move table and in
//! config files, which is why [`IntegerMatrix`] serializes to and from this
//! string.

#![allow(clippy::module_name_repetitions)]

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from constructing or parsing an [`IntegerMatrix`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatrixError {
    /// Input ended before the outer brace group was closed.
    #[error("unexpected end of matrix text")]
    UnexpectedEnd,
    /// A character that cannot start a brace or an integer.
    #[error("unexpected character '{ch}' at byte {offset}")]
    UnexpectedChar { ch: char, offset: usize },
    /// A signed token that does not fit in `i64` or has no digits.
    #[error("invalid integer '{token}' at byte {offset}")]
    InvalidInteger { token: String, offset: usize },
    /// Non-whitespace text after the closing brace.
    #[error("trailing input at byte {offset}")]
    TrailingInput { offset: usize },
    /// A row whose length differs from the first row.
    #[error("row {row} has {actual} entries, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    /// Flat data whose length is not `rows * cols`.
    #[error("matrix data has {actual} entries, expected {expected}")]
    ShapeMismatch { expected: usize, actual: usize },
    /// `rows * cols` does not fit in `usize`.
    #[error("a {rows}x{cols} matrix is too large to address")]
    DimensionOverflow { rows: usize, cols: usize },
}

impl MatrixError {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::UnexpectedEnd
            | Self::UnexpectedChar { .. }
            | Self::InvalidInteger { .. }
            | Self::TrailingInput { .. } => ErrorCode::MatrixSyntax,
            Self::RaggedRow { .. } => ErrorCode::RaggedMatrix,
            Self::ShapeMismatch { .. } | Self::DimensionOverflow { .. } => ErrorCode::MatrixShape,
        }
    }
}

// ---------------------------------------------------------------------------
// IntegerMatrix
// ---------------------------------------------------------------------------

/// A rectangular grid of signed integers stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IntegerMatrix {
    rows: usize,
    cols: usize,
    data: Vec<i64>,
}

impl IntegerMatrix {
    /// Build a matrix from row-major `data`.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::DimensionOverflow`] if `rows * cols` overflows
    /// and [`MatrixError::ShapeMismatch`] if `data.len() != rows * cols`.
    pub fn new(rows: usize, cols: usize, data: Vec<i64>) -> Result<Self, MatrixError> {
        let expected = cell_count(rows, cols)?;
        if data.len() != expected {
            return Err(MatrixError::ShapeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Build a matrix from a list of rows.
    ///
    /// An empty list yields the 0×0 matrix.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::RaggedRow`] for the first row whose length
    /// differs from the first row's, and [`MatrixError::DimensionOverflow`]
    /// if the cell count overflows.
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Result<Self, MatrixError> {
        let cols = rows.first().map_or(0, Vec::len);
        let row_count = rows.len();
        let mut data = Vec::with_capacity(cell_count(row_count, cols)?);
        for (row, entries) in rows.into_iter().enumerate() {
            if entries.len() != cols {
                return Err(MatrixError::RaggedRow {
                    row,
                    expected: cols,
                    actual: entries.len(),
                });
            }
            data.extend(entries);
        }
        Ok(Self {
            rows: row_count,
            cols,
            data,
        })
    }

    /// Skew-symmetric `n × n` quiver matrix with one arrow per `(source, target)`.
    ///
    /// Repeated arrows accumulate, so `[(0, 1), (0, 1)]` gives entry `2`.
    ///
    /// # Panics
    ///
    /// Panics if an endpoint is `>= n` or if `n * n` overflows.
    #[must_use]
    pub fn from_arrows(n: usize, arrows: &[(usize, usize)]) -> Self {
        let mut data = vec![0; checked_cell_count(n, n)];
        for &(source, target) in arrows {
            assert!(
                source < n && target < n,
                "arrow {source}->{target} outside {n} vertices"
            );
            data[source * n + target] += 1;
            data[target * n + source] -= 1;
        }
        Self {
            rows: n,
            cols: n,
            data,
        }
    }

    /// A `rows × cols` matrix of zeros.
    ///
    /// # Panics
    ///
    /// Panics if `rows * cols` overflows.
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0; checked_cell_count(rows, cols)],
        }
    }

    /// The 0×0 matrix.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            rows: 0,
            cols: 0,
            data: Vec::new(),
        }
    }

    #[must_use]
    pub const fn num_rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub const fn num_cols(&self) -> usize {
        self.cols
    }

    /// `max(rows, cols)`: the size of the square matrix this one pads to.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.rows.max(self.cols)
    }

    /// `true` if the matrix has no rows or no columns.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    #[must_use]
    pub const fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Entry at `(row, col)`, or `None` outside the matrix.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<i64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// Entry at `(row, col)` treating the matrix as zero-padded to
    /// [`dim`](Self::dim) × [`dim`](Self::dim) (and beyond).
    #[must_use]
    pub fn get_or_zero(&self, row: usize, col: usize) -> i64 {
        self.get(row, col).unwrap_or(0)
    }

    /// Slice of row `row`, or `None` if out of range.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[i64]> {
        (row < self.rows).then(|| &self.data[row * self.cols..(row + 1) * self.cols])
    }

    /// Iterate rows in order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[i64]> + '_ {
        (0..self.rows).map(move |r| &self.data[r * self.cols..(r + 1) * self.cols])
    }

    /// Iterate `(row, col, value)` over every stored cell, row-major.
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize, i64)> + '_ {
        self.data.iter().enumerate().map(move |(idx, &value)| {
            // cols > 0 whenever data is non-empty
            (idx / self.cols, idx % self.cols, value)
        })
    }

    /// `true` if the matrix is square and `a[j][i] == -a[i][j]` everywhere.
    #[must_use]
    pub fn is_skew_symmetric(&self) -> bool {
        self.is_square()
            && (0..self.rows).all(|i| {
                (i..self.cols).all(|j| {
                    self.data[i * self.cols + j].checked_neg() == Some(self.data[j * self.cols + i])
                })
            })
    }

    /// The transposed matrix.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for c in 0..self.cols {
            for r in 0..self.rows {
                data.push(self.data[r * self.cols + c]);
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            data,
        }
    }

    /// The matrix with rows and columns both reordered by `perm`, so that
    /// entry `(i, j)` of the result is entry `(perm[i], perm[j])` of `self`.
    ///
    /// Returns `None` unless the matrix is square and `perm` is a
    /// permutation of `0..dim`.
    #[must_use]
    pub fn permuted(&self, perm: &[usize]) -> Option<Self> {
        let n = self.rows;
        if !self.is_square() || perm.len() != n {
            return None;
        }
        let mut seen = vec![false; n];
        for &p in perm {
            if p >= n || std::mem::replace(&mut seen[p], true) {
                return None;
            }
        }
        let mut data = Vec::with_capacity(n * n);
        for &pi in perm {
            for &pj in perm {
                data.push(self.data[pi * n + pj]);
            }
        }
        Some(Self {
            rows: n,
            cols: n,
            data,
        })
    }
}

fn cell_count(rows: usize, cols: usize) -> Result<usize, MatrixError> {
    let Some(count) = rows.checked_mul(cols) else {
        return Err(MatrixError::DimensionOverflow { rows, cols });
    };
    Ok(count)
}

fn checked_cell_count(rows: usize, cols: usize) -> usize {
    let Some(count) = rows.checked_mul(cols) else {
        panic!("a {rows}x{cols} matrix is too large to address");
    };
    count
}

impl AsRef<Self> for IntegerMatrix {
    fn as_ref(&self) -> &Self {
        self
    }
}

// ---------------------------------------------------------------------------
// Text format
// ---------------------------------------------------------------------------

/// Writes the brace format. Every 0×n matrix writes as `{ }`.
impl fmt::Display for IntegerMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{ ")?;
        for row in self.iter_rows() {
            f.write_str("{ ")?;
            for value in row {
                write!(f, "{value} ")?;
            }
            f.write_str("} ")?;
        }
        f.write_str("}")
    }
}

impl FromStr for IntegerMatrix {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Parser { src: s, pos: 0 }.parse()
    }
}

impl TryFrom<String> for IntegerMatrix {
    type Error = MatrixError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<IntegerMatrix> for String {
    fn from(value: IntegerMatrix) -> Self {
        value.to_string()
    }
}

/// Recursive-descent reader for the brace format.
struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn parse(mut self) -> Result<IntegerMatrix, MatrixError> {
        self.expect_open()?;
        let mut rows = Vec::new();
        loop {
            match self.peek() {
                Some((_, '{')) => {
                    self.pos += 1;
                    rows.push(self.parse_row()?);
                }
                Some((_, '}')) => {
                    self.pos += 1;
                    break;
                }
                Some((offset, ch)) => return Err(MatrixError::UnexpectedChar { ch, offset }),
                None => return Err(MatrixError::UnexpectedEnd),
            }
        }
        if let Some((offset, _)) = self.peek() {
            return Err(MatrixError::TrailingInput { offset });
        }
        IntegerMatrix::from_rows(rows)
    }

    fn expect_open(&mut self) -> Result<(), MatrixError> {
        match self.peek() {
            Some((_, '{')) => {
                self.pos += 1;
                Ok(())
            }
            Some((offset, ch)) => Err(MatrixError::UnexpectedChar { ch, offset }),
            None => Err(MatrixError::UnexpectedEnd),
        }
    }

    fn parse_row(&mut self) -> Result<Vec<i64>, MatrixError> {
        let mut row = Vec::new();
        loop {
            match self.peek() {
                Some((_, '}')) => {
                    self.pos += 1;
                    return Ok(row);
                }
                Some((offset, ch)) if ch == '-' || ch == '+' || ch.is_ascii_digit() => {
                    row.push(self.parse_int(offset)?);
                }
                Some((offset, ch)) => return Err(MatrixError::UnexpectedChar { ch, offset }),
                None => return Err(MatrixError::UnexpectedEnd),
            }
        }
    }

    fn parse_int(&mut self, start: usize) -> Result<i64, MatrixError> {
        let rest = &self.src[start..];
        let len = rest
            .char_indices()
            .find(|&(i, c)| !is_integer_char(i, c))
            .map_or(rest.len(), |(i, _)| i);
        let token = &rest[..len];
        self.pos = start + len;
        token.parse().map_err(|_| MatrixError::InvalidInteger {
            token: token.to_string(),
            offset: start,
        })
    }

    /// Skip whitespace and return the next character with its byte offset.
    fn peek(&mut self) -> Option<(usize, char)> {
        let rest = &self.src[self.pos..];
        let trimmed = rest.trim_start();
        self.pos += rest.len() - trimmed.len();
        trimmed.chars().next().map(|c| (self.pos, c))
    }
}

/// Digits, plus a leading sign at `index` 0.
fn is_integer_char(index: usize, c: char) -> bool {
    c.is_ascii_digit() || (index == 0 && matches!(c, '-' | '+'))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn m(s: &str) -> IntegerMatrix {
        s.parse().expect("valid matrix text")
    }

    #[test]
    fn parses_square_matrix() {
        let mat = m("{ { 0 1 0 } { -1 0 1 } { 0 -1 0 } }");
        assert_eq!(mat.num_rows(), 3);
        assert_eq!(mat.num_cols(), 3);
        assert_eq!(mat.get(0, 1), Some(1));
        assert_eq!(mat.get(2, 1), Some(-1));
        assert_eq!(mat.get(3, 0), None);
        assert!(mat.is_skew_symmetric());
    }

    #[test]
    fn parses_without_spaces_around_braces() {
        assert_eq!(m("{{0 2}{-1 0}}"), m("{ { 0 2 } { -1 0 } }"));
    }

    #[test]
    fn empty_braces_are_zero_by_zero() {
        let mat = m("{ }");
        assert!(mat.is_empty());
        assert_eq!(mat.dim(), 0);
        assert_eq!(mat, IntegerMatrix::empty());
    }

    #[test]
    fn display_uses_canonical_spacing() {
        let mat = m("{{0 1}{-1 0}}");
        assert_eq!(mat.to_string(), "{ { 0 1 } { -1 0 } }");
        assert_eq!(IntegerMatrix::empty().to_string(), "{ }");
    }

    #[test]
    fn rectangular_matrix_pads_to_larger_dimension() {
        let mat = m("{ { 0 1 0 } { -1 0 1 } }");
        assert_eq!(mat.dim(), 3);
        assert!(!mat.is_square());
        assert!(!mat.is_skew_symmetric());
        assert_eq!(mat.get_or_zero(2, 1), 0);
        assert_eq!(mat.get_or_zero(1, 2), 1);
    }

    #[test]
    fn ragged_rows_rejected() {
        let err = "{ { 0 1 } { 1 } }".parse::<IntegerMatrix>().unwrap_err();
        assert_eq!(
            err,
            MatrixError::RaggedRow {
                row: 1,
                expected: 2,
                actual: 1
            }
        );
        assert_eq!(err.code(), ErrorCode::RaggedMatrix);
    }

    #[test]
    fn syntax_errors_report_offsets() {
        assert_eq!(
            "{ { 0 x } }".parse::<IntegerMatrix>().unwrap_err(),
            MatrixError::UnexpectedChar { ch: 'x', offset: 6 }
        );
        assert_eq!(
            "{ { 0 1 }".parse::<IntegerMatrix>().unwrap_err(),
            MatrixError::UnexpectedEnd
        );
        assert_eq!(
            "{ } }".parse::<IntegerMatrix>().unwrap_err(),
            MatrixError::TrailingInput { offset: 4 }
        );
        assert_eq!(
            "{ { - } }".parse::<IntegerMatrix>().unwrap_err(),
            MatrixError::InvalidInteger {
                token: "-".to_string(),
                offset: 4
            }
        );
        assert_eq!(
            "".parse::<IntegerMatrix>().unwrap_err(),
            MatrixError::UnexpectedEnd
        );
    }

    #[test]
    fn rowless_matrix_reads_back_as_empty() {
        let text = IntegerMatrix::zeros(0, 3).to_string();
        assert_eq!(text, "{ }");
        assert_eq!(m(&text).dim(), 0);

        let columnless = IntegerMatrix::zeros(2, 0);
        assert_eq!(columnless.to_string(), "{ { } { } }");
        assert_eq!(m(&columnless.to_string()), columnless);
    }

    #[test]
    fn new_rejects_overflowing_dimensions() {
        let err = IntegerMatrix::new(usize::MAX, 2, Vec::new()).unwrap_err();
        assert_eq!(
            err,
            MatrixError::DimensionOverflow {
                rows: usize::MAX,
                cols: 2
            }
        );
        assert_eq!(err.code(), ErrorCode::MatrixShape);
    }

    #[test]
    #[should_panic(expected = "too large to address")]
    fn zeros_panics_on_overflowing_dimensions() {
        let _ = IntegerMatrix::zeros(2, usize::MAX);
    }

    #[test]
    fn new_checks_shape() {
        assert!(IntegerMatrix::new(2, 2, vec![0, 1, -1, 0]).is_ok());
        assert_eq!(
            IntegerMatrix::new(2, 2, vec![0, 1, -1]).unwrap_err(),
            MatrixError::ShapeMismatch {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn transpose_swaps_dimensions() {
        let mat = m("{ { 1 2 3 } { 4 5 6 } }");
        let t = mat.transpose();
        assert_eq!(t, m("{ { 1 4 } { 2 5 } { 3 6 } }"));
        assert_eq!(t.transpose(), mat);
    }

    #[test]
    fn permuted_relabels_vertices() {
        let mat = m("{ { 0 1 0 } { -1 0 1 } { 0 -1 0 } }");
        let p = mat.permuted(&[2, 1, 0]).expect("valid permutation");
        assert_eq!(p, m("{ { 0 -1 0 } { 1 0 -1 } { 0 1 0 } }"));
        assert!(mat.permuted(&[0, 0, 1]).is_none());
        assert!(mat.permuted(&[0, 1]).is_none());
    }

    #[test]
    fn from_arrows_is_skew_symmetric() {
        let mat = IntegerMatrix::from_arrows(3, &[(0, 1), (0, 1), (2, 1)]);
        assert_eq!(mat, m("{ { 0 2 0 } { -2 0 -1 } { 0 1 0 } }"));
        assert!(mat.is_skew_symmetric());
    }

    #[test]
    fn entries_are_row_major() {
        let mat = m("{ { 1 2 } { 3 4 } }");
        let cells: Vec<_> = mat.entries().collect();
        assert_eq!(cells, vec![(0, 0, 1), (0, 1, 2), (1, 0, 3), (1, 1, 4)]);
    }

    #[test]
    fn serde_uses_text_format() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            matrix: IntegerMatrix,
        }
        let parsed: Wrapper =
            toml::from_str("matrix = \"{ { 0 3 } { -3 0 } }\"").expect("parse toml");
        assert_eq!(parsed.matrix.get(0, 1), Some(3));
        let text = toml::to_string(&parsed).expect("serialize toml");
        assert!(text.contains("{ { 0 3 } { -3 0 } }"));
    }
}
