use heatmap_core::{Grid, Session};
use proptest::prelude::*;

fn triple() -> impl Strategy<Value = (usize, usize, f64)> {
    (0usize..64, 0usize..64, -2.0f64..3.0)
}

proptest! {
    #[test]
    fn apply_covers_and_clamps((x, y, v) in triple()) {
        let mut g = Grid::new();
        g.apply(x, y, v);
        prop_assert!(g.rows() > y);
        prop_assert!(g.cols() > x);
        prop_assert_eq!(g.get(y, x), Some(v.clamp(0.0, 1.0)));
    }

    #[test]
    fn growth_preserves_earlier_values(
        first in triple(),
        second in triple(),
    ) {
        let (x0, y0, v0) = first;
        let (x1, y1, v1) = second;
        prop_assume!((x0, y0) != (x1, y1));
        let mut g = Grid::new();
        g.apply(x0, y0, v0);
        g.apply(x1, y1, v1);
        prop_assert_eq!(g.get(y0, x0), Some(v0.clamp(0.0, 1.0)));
        prop_assert_eq!(g.get(y1, x1), Some(v1.clamp(0.0, 1.0)));
    }

    #[test]
    fn apply_is_idempotent(seq in prop::collection::vec(triple(), 0..20), extra in triple()) {
        let mut once = Grid::new();
        for &(x, y, v) in &seq {
            once.apply(x, y, v);
        }
        let mut twice = once.clone();
        once.apply(extra.0, extra.1, extra.2);
        twice.apply(extra.0, extra.1, extra.2);
        twice.apply(extra.0, extra.1, extra.2);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn reset_always_returns_to_ten_by_ten(seq in prop::collection::vec(triple(), 0..30)) {
        let mut s = Session::default();
        for (x, y, v) in seq {
            let _ = s.ingest(&format!("{x},{y},{v}"));
        }
        s.reset();
        prop_assert_eq!(s.grid().shape(), (10, 10));
        prop_assert!(s.grid().iter_rows().flatten().all(|&c| c == 0.0));
    }

    #[test]
    fn parser_never_panics(line in ".{0,64}") {
        let mut s = Session::default();
        let before = s.grid().clone();
        if s.ingest(&line).is_err() {
            prop_assert_eq!(s.grid(), &before);
        }
    }
}

#[test]
fn growth_example_from_origin() {
    let mut g = Grid::new();
    g.apply(0, 0, 0.5);
    g.apply(5, 5, 0.9);
    assert_eq!(g.get(0, 0), Some(0.5));
    assert_eq!(g.get(5, 5), Some(0.9));
    assert!(g.rows() >= 6 && g.cols() >= 6);
}

#[test]
fn clamping_examples() {
    let mut g = Grid::new();
    g.apply(1, 1, 5.0);
    assert_eq!(g.get(1, 1), Some(1.0));
    g.apply(1, 1, -3.0);
    assert_eq!(g.get(1, 1), Some(0.0));
}
