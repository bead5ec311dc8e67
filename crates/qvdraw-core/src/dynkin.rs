//! Quiver matrices of simply-laced Dynkin type.
//!
//! Names follow the usual convention: `A<n>` (n ≥ 1), `D<n>` (n ≥ 4), `E6`,
//! `E7`, `E8`. Every quiver is linearly oriented along its longest path,
//! `0 → 1 → … `, with the branch vertex last:
//!
//! ```text
//! D_n:  0 → 1 → … → n-3 → n-2        E_n:  0 → 1 → 2 → … → n-2
//!                     ↘                          ↘
//!                      n-1                         n-1
//! ```

use crate::error::ErrorCode;
use crate::matrix::IntegerMatrix;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DynkinError {
    #[error("unrecognized Dynkin type '{0}'")]
    Unknown(String),
}

impl DynkinError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Unknown(_) => ErrorCode::UnknownDynkin,
        }
    }
}

/// Quiver matrix for the Dynkin diagram `name`, e.g. `"A4"` or `"e6"`.
///
/// # Errors
///
/// Returns [`DynkinError::Unknown`] for anything that is not a valid
/// simply-laced type and rank.
pub fn matrix(name: &str) -> Result<IntegerMatrix, DynkinError> {
    let unknown = || DynkinError::Unknown(name.to_string());
    let trimmed = name.trim();
    let mut chars = trimmed.chars();
    let kind = chars.next().ok_or_else(unknown)?.to_ascii_uppercase();
    let rank_text = chars.as_str().trim_start_matches('_');
    if rank_text.is_empty() || !rank_text.chars().all(|c| c.is_ascii_digit()) {
        return Err(unknown());
    }
    let n: usize = rank_text.parse().map_err(|_| unknown())?;

    let mut arrows: Vec<(usize, usize)> = Vec::new();
    match (kind, n) {
        ('A', 1..) => arrows.extend((1..n).map(|i| (i - 1, i))),
        ('D', 4..) => {
            arrows.extend((1..n - 1).map(|i| (i - 1, i)));
            arrows.push((n - 3, n - 1));
        }
        ('E', 6..=8) => {
            arrows.extend((1..n - 1).map(|i| (i - 1, i)));
            arrows.push((2, n - 1));
        }
        _ => return Err(unknown()),
    }
    Ok(IntegerMatrix::from_arrows(n, &arrows))
}

/// `true` if [`matrix`] accepts `name`.
#[must_use]
pub fn is_valid(name: &str) -> bool {
    matrix(name).is_ok()
}
