//! Matrix equivalence up to relabeling of vertices.
//!
//! Two square matrices `A` and `B` are equivalent when some permutation `σ`
//! gives `A[i][j] == B[σ(i)][σ(j)]` for every cell. For quiver matrices this
//! is "the same quiver drawn with different vertex numbers".
//!
//! The class hash is built from per-vertex signatures (sorted row, sorted
//! column, diagonal), which are invariant under relabeling. Equality first
//! compares the signature multisets, then searches for `σ` by backtracking,
//! only pairing vertices with identical signatures.

use super::{Equivalence, stable_hash};
use crate::matrix::IntegerMatrix;

/// Square matrices compared up to simultaneous row/column permutation.
///
/// Non-square matrices have no relabeling symmetry and compare exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Relabeling;

type Signature = (Vec<i64>, Vec<i64>, i64);

fn signatures(m: &IntegerMatrix) -> Vec<Signature> {
    let n = m.num_rows();
    (0..n)
        .map(|v| {
            let mut row: Vec<i64> = (0..n).map(|j| m.get_or_zero(v, j)).collect();
            let mut col: Vec<i64> = (0..n).map(|i| m.get_or_zero(i, v)).collect();
            row.sort_unstable();
            col.sort_unstable();
            (row, col, m.get_or_zero(v, v))
        })
        .collect()
}

fn sorted(mut sigs: Vec<Signature>) -> Vec<Signature> {
    sigs.sort_unstable();
    sigs
}

struct Search<'a> {
    a: &'a IntegerMatrix,
    b: &'a IntegerMatrix,
    sig_a: Vec<Signature>,
    sig_b: Vec<Signature>,
    image: Vec<usize>,
    used: Vec<bool>,
}

impl Search<'_> {
    /// Try to extend the partial map `0..v → image` to vertex `v`.
    fn extend(&mut self, v: usize) -> bool {
        let n = self.sig_a.len();
        if v == n {
            return true;
        }
        for w in 0..n {
            if self.used[w] || self.sig_a[v] != self.sig_b[w] || !self.consistent(v, w) {
                continue;
            }
            self.used[w] = true;
            self.image[v] = w;
            if self.extend(v + 1) {
                return true;
            }
            self.used[w] = false;
        }
        false
    }

    /// Does mapping `v ↦ w` agree with every vertex already mapped?
    fn consistent(&self, v: usize, w: usize) -> bool {
        (0..v).all(|u| {
            let x = self.image[u];
            self.a.get_or_zero(v, u) == self.b.get_or_zero(w, x)
                && self.a.get_or_zero(u, v) == self.b.get_or_zero(x, w)
        })
    }
}

impl<M: AsRef<IntegerMatrix>> Equivalence<M> for Relabeling {
    fn equivalent(&self, a: &M, b: &M) -> bool {
        let (a, b) = (a.as_ref(), b.as_ref());
        if !a.is_square() || !b.is_square() {
            return a == b;
        }
        if a.num_rows() != b.num_rows() {
            return false;
        }
        if a == b {
            return true;
        }
        let sig_a = signatures(a);
        let sig_b = signatures(b);
        if sorted(sig_a.clone()) != sorted(sig_b.clone()) {
            return false;
        }
        let n = sig_a.len();
        Search {
            a,
            b,
            sig_a,
            sig_b,
            image: vec![0; n],
            used: vec![false; n],
        }
        .extend(0)
    }

    fn class_hash(&self, value: &M) -> u64 {
        let m = value.as_ref();
        if !m.is_square() {
            return stable_hash(m);
        }
        stable_hash(&(m.num_rows(), sorted(signatures(m))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(s: &str) -> IntegerMatrix {
        s.parse().expect("valid matrix text")
    }

    #[test]
    fn relabelled_path_is_equivalent() {
        let a = m("{ { 0 1 0 } { -1 0 1 } { 0 -1 0 } }");
        let b = a.permuted(&[1, 2, 0]).expect("permutation");
        assert_ne!(a, b);
        assert!(Relabeling.equivalent(&a, &b));
        assert_eq!(Relabeling.class_hash(&a), Relabeling.class_hash(&b));
    }

    #[test]
    fn orientation_matters() {
        // linear A3 vs. the cyclic triangle
        let path = m("{ { 0 1 0 } { -1 0 1 } { 0 -1 0 } }");
        let cycle = m("{ { 0 1 -1 } { -1 0 1 } { 1 -1 0 } }");
        assert!(!Relabeling.equivalent(&path, &cycle));
    }

    #[test]
    fn oriented_four_cycles_are_equivalent() {
        let a = IntegerMatrix::from_arrows(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]);
        let b = IntegerMatrix::from_arrows(4, &[(0, 1), (1, 3), (3, 2), (2, 0)]);
        assert!(Relabeling.equivalent(&a, &b));
    }

    #[test]
    fn equal_signatures_but_not_isomorphic() {
        let triangles = [(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)];
        let two_triangles = IntegerMatrix::from_arrows(6, &triangles);
        let cycle = [(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0)];
        let hexagon = IntegerMatrix::from_arrows(6, &cycle);
        // same hash bucket, different class
        assert_eq!(
            Relabeling.class_hash(&two_triangles),
            Relabeling.class_hash(&hexagon)
        );
        assert!(!Relabeling.equivalent(&two_triangles, &hexagon));
    }

    #[test]
    fn different_sizes_never_equivalent() {
        let (small, large) = (IntegerMatrix::zeros(2, 2), IntegerMatrix::zeros(3, 3));
        assert!(!Relabeling.equivalent(&small, &large));
    }

    #[test]
    fn rectangular_compares_exactly() {
        let a = m("{ { 0 1 0 } { -1 0 1 } }");
        let b = m("{ { 0 1 0 } { -1 0 1 } }");
        let c = m("{ { 1 0 0 } { 0 -1 1 } }");
        assert!(Relabeling.equivalent(&a, &b));
        assert!(!Relabeling.equivalent(&a, &c));
    }

    #[test]
    fn works_through_references() {
        let a = m("{ { 0 2 } { -2 0 } }");
        let b = m("{ { 0 -2 } { 2 0 } }");
        assert!(Relabeling.equivalent(&&a, &&b));
    }
}
