#![no_main]

use libfuzzer_sys::fuzz_target;
use qvdraw_core::moves::MoveTable;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Any table that loads must survive a serialize/parse cycle.
    if let Ok(table) = MoveTable::from_toml_str(text) {
        let rendered = toml::to_string(&table).expect("table serializes");
        let reloaded = MoveTable::from_toml_str(&rendered).expect("rendered table loads");
        assert_eq!(reloaded, table);
    }
});
