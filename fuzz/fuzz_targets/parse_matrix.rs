#![no_main]

use libfuzzer_sys::fuzz_target;
use qvdraw_core::IntegerMatrix;
use qvdraw_graph::LabelStrategy;
use qvdraw_graph::matrix_graph::build;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(matrix) = text.parse::<IntegerMatrix>() else {
        return;
    };

    // Display output must parse back to an equal non-empty matrix.
    let reparsed: IntegerMatrix = matrix.to_string().parse().expect("display output parses");
    if !matrix.is_empty() {
        assert_eq!(reparsed, matrix);
    }

    // Keep fan-out bounded; parallel edges scale with entry size.
    if matrix.entries().all(|(_, _, k)| k.unsigned_abs() <= 64) && matrix.dim() <= 64 {
        let graph = build(&matrix, LabelStrategy::Symmetry);
        assert_eq!(graph.node_count(), matrix.dim());
    }
});
