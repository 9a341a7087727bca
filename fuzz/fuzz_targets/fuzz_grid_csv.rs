#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(grid) = heatmap_core::export::read_csv(data) {
        assert!(grid.iter_rows().flatten().all(|v| (0.0..=1.0).contains(v)));
        let text = heatmap_core::export::to_csv_string(&grid, 12).unwrap_or_default();
        assert!(heatmap_core::export::read_csv(text.as_bytes()).is_ok());
    }
});
