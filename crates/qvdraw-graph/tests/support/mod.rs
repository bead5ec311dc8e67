#![allow(dead_code)]

use std::sync::Once;

use proptest::prelude::*;
use qvdraw_core::IntegerMatrix;
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Route library logs to the test harness. Filter with `QVDRAW_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_env("QVDRAW_LOG")
            .unwrap_or_else(|_| EnvFilter::new("qvdraw_core=debug,qvdraw_graph=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Fomin-Zelevinsky mutation of a skew-symmetric matrix at vertex `k`.
pub fn mutate(b: &IntegerMatrix, k: usize) -> IntegerMatrix {
    let n = b.dim();
    let rows = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| {
                    let b_ij = b.get_or_zero(i, j);
                    if i == k || j == k {
                        -b_ij
                    } else {
                        let (b_ik, b_kj) = (b.get_or_zero(i, k), b.get_or_zero(k, j));
                        b_ij + (b_ik.abs() * b_kj + b_ik * b_kj.abs()) / 2
                    }
                })
                .collect()
        })
        .collect();
    IntegerMatrix::from_rows(rows).expect("square rows")
}

/// Every single-vertex mutation of `b`.
pub fn mutations(b: &IntegerMatrix) -> Vec<IntegerMatrix> {
    (0..b.dim()).map(|k| mutate(b, k)).collect()
}

/// Rectangular matrix up to 6×6 with entries in -3..=3.
pub fn arb_matrix() -> impl Strategy<Value = IntegerMatrix> {
    (0usize..6, 0usize..6).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(-3i64..=3, rows * cols).prop_map(move |data| {
            IntegerMatrix::new(rows, cols, data).expect("length matches shape")
        })
    })
}

/// Linked-object source over small integers, with optional placeholders.
pub fn arb_source() -> impl Strategy<Value = Vec<(Option<u8>, Vec<Option<u8>>)>> {
    prop::collection::vec(
        (arb_object(), prop::collection::vec(arb_object(), 0..4)),
        0..20,
    )
}

fn arb_object() -> impl Strategy<Value = Option<u8>> {
    prop::option::weighted(0.9, 0u8..12)
}
