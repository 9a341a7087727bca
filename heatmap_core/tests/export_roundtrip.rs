use heatmap_core::export::{load_csv, read_csv, save_csv, save_png, to_csv_string};
use heatmap_core::{CsvError, Grid, RenderOptions, Renderer};
use rstest::rstest;

fn sample_grid() -> Grid {
    let mut g = Grid::new();
    g.apply(0, 0, 0.123_456_789);
    g.apply(3, 7, 1.0);
    g.apply(11, 2, 0.5);
    g
}

#[rstest]
#[case(0)]
#[case(2)]
#[case(6)]
#[case(12)]
fn csv_round_trip_within_precision(#[case] precision: usize) {
    let g = sample_grid();
    let text = to_csv_string(&g, precision).unwrap();
    let back = read_csv(text.as_bytes()).unwrap();
    assert_eq!(back.shape(), g.shape());
    let tol = 10f64.powi(-(precision as i32));
    for (a, b) in g.iter_rows().flatten().zip(back.iter_rows().flatten()) {
        assert!((a - b).abs() <= tol, "{a} vs {b} at precision {precision}");
    }
}

#[rstest]
#[case("0.1,x\n", 1, 2)]
#[case("0.1,0.2\n0.5,-1\n", 2, 2)]
#[case("2.0\n", 1, 1)]
fn bad_cells_are_located(#[case] input: &str, #[case] line: u64, #[case] column: usize) {
    match read_csv(input.as_bytes()).unwrap_err() {
        CsvError::NotANumber { line: l, column: c, .. } | CsvError::OutOfRange { line: l, column: c, .. } => {
            assert_eq!((l, c), (line, column));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn files_round_trip_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("map.csv");
    let png_path = dir.path().join("map.png");
    let g = sample_grid();

    save_csv(&csv_path, &g, 6).unwrap();
    let back = load_csv(&csv_path).unwrap();
    assert_eq!(back.shape(), g.shape());

    let img = Renderer::new(RenderOptions::default()).render(&back, None);
    save_png(&png_path, &img).unwrap();
    let decoded = image::open(&png_path).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), img.dimensions());
    assert_eq!(decoded.as_raw(), img.as_raw());
}

#[test]
fn missing_csv_is_reported_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_csv(&dir.path().join("absent.csv")).unwrap_err();
    assert!(err.to_string().contains("absent.csv"));
}
