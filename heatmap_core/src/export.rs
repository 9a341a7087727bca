//! Grid and frame export: delimited text and PNG.
//!
//! CSV layout is row-major with row 0 first, one grid row per line, no
//! header. Files are replaced atomically (write to a sibling temp file, then
//! rename) so a viewer polling `map.png` never sees a torn write.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use eyre::WrapErr;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};

use crate::error::{CsvError, HeatmapError, Result};
use crate::grid::Grid;

/// Default number of decimals written per cell.
pub const DEFAULT_PRECISION: usize = 6;

/// Write `grid` as CSV with `precision` decimals per value.
pub fn write_csv<W: Write>(grid: &Grid, precision: usize, out: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(out);
    for row in grid.iter_rows() {
        wtr.write_record(row.iter().map(|v| format!("{v:.precision$}")))
            .wrap_err("write csv record")?;
    }
    wtr.flush().wrap_err("flush csv")?;
    Ok(())
}

pub fn to_csv_string(grid: &Grid, precision: usize) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(grid, precision, &mut buf)?;
    String::from_utf8(buf).wrap_err("csv output is not utf-8")
}

/// Parse a grid previously written by [`write_csv`].
pub fn read_csv<R: Read>(input: R) -> std::result::Result<Grid, CsvError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut rows: Vec<Vec<f64>> = Vec::new();
    for (idx, record) in rdr.records().enumerate() {
        let fallback_line = idx as u64 + 1;
        let record = record.map_err(|source| CsvError::Read {
            line: source
                .position()
                .map_or(fallback_line, csv::Position::line),
            source,
        })?;
        let line = record.position().map_or(fallback_line, csv::Position::line);
        // Blank lines are skipped by the reader; a lone empty field is not data.
        if record.len() == 1 && record.get(0).is_some_and(str::is_empty) {
            continue;
        }

        let mut row = Vec::with_capacity(record.len());
        for (col, field) in record.iter().enumerate() {
            let column = col + 1;
            let value: f64 = field.parse().map_err(|_| CsvError::NotANumber {
                line,
                column,
                value: field.to_string(),
            })?;
            if !(0.0..=1.0).contains(&value) {
                return Err(CsvError::OutOfRange {
                    line,
                    column,
                    value,
                });
            }
            row.push(value);
        }

        if let Some(expected) = rows.first().map(Vec::len) {
            if expected != row.len() {
                return Err(CsvError::Ragged {
                    line,
                    expected,
                    found: row.len(),
                });
            }
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(CsvError::Empty);
    }
    Grid::from_rows(rows).map_err(|_| CsvError::Empty)
}

/// Read a CSV grid from disk.
pub fn load_csv(path: &Path) -> Result<Grid> {
    let file = fs::File::open(path)
        .map_err(|e| HeatmapError::Io(format!("{}: {e}", path.display())))?;
    let grid = read_csv(std::io::BufReader::new(file))
        .wrap_err_with(|| format!("load grid from {}", path.display()))?;
    tracing::debug!(rows = grid.rows(), cols = grid.cols(), path = %path.display(), "grid loaded");
    Ok(grid)
}

/// Write the grid as CSV to `path`, atomically.
pub fn save_csv(path: &Path, grid: &Grid, precision: usize) -> Result<()> {
    let text = to_csv_string(grid, precision)?;
    write_atomic(path, text.as_bytes())?;
    Ok(())
}

/// Encode a frame as PNG bytes.
pub fn encode_png(img: &RgbaImage) -> std::result::Result<Vec<u8>, HeatmapError> {
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf)
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| HeatmapError::Encode(e.to_string()))?;
    Ok(buf)
}

/// Encode and atomically write a frame to `path`.
pub fn save_png(path: &Path, img: &RgbaImage) -> Result<()> {
    let bytes = encode_png(img)?;
    write_atomic(path, &bytes)?;
    Ok(())
}

/// Replace `path` with `bytes` via a sibling temp file and rename.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> std::result::Result<(), HeatmapError> {
    let tmp = temp_path(path);
    let io_err = |e: std::io::Error| HeatmapError::Io(format!("{}: {e}", path.display()));
    fs::write(&tmp, bytes).map_err(io_err)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(io_err(e));
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_is_row_major_with_fixed_precision() {
        let mut g = Grid::zeros(2, 3);
        g.apply(2, 1, 0.5);
        let text = to_csv_string(&g, 2).unwrap();
        assert_eq!(text, "0.00,0.00,0.00\n0.00,0.00,0.50\n");
    }

    #[test]
    fn read_reports_line_and_column() {
        let err = read_csv("0.1,0.2\n0.3,oops\n".as_bytes()).unwrap_err();
        match err {
            CsvError::NotANumber { line, column, .. } => assert_eq!((line, column), (2, 2)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn read_rejects_ragged_and_empty() {
        assert!(matches!(
            read_csv("0,0\n0\n".as_bytes()),
            Err(CsvError::Ragged {
                line: 2,
                expected: 2,
                found: 1
            })
        ));
        assert!(matches!(read_csv("".as_bytes()), Err(CsvError::Empty)));
    }

    #[test]
    fn png_has_signature() {
        let img = RgbaImage::new(3, 2);
        let bytes = encode_png(&img).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn atomic_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.csv");
        write_atomic(&path, b"one").unwrap();
        write_atomic(&path, b"two").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"two");
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn write_to_missing_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("map.png");
        assert!(matches!(
            write_atomic(&path, b"x"),
            Err(HeatmapError::Io(_))
        ));
    }
}
