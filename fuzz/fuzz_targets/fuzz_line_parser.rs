#![no_main]
use heatmap_core::Session;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let mut session = Session::new(64);
    let before = session.grid().clone();
    match session.ingest(data) {
        Ok(m) => {
            assert!(m.x < 64 && m.y < 64);
            assert!((0.0..=1.0).contains(&m.v));
            assert_eq!(session.grid().get(m.y, m.x), Some(m.v));
        }
        Err(_) => assert_eq!(session.grid(), &before),
    }
});
