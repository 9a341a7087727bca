//! Growable dense intensity grid.
//!
//! Cells are stored row-major. Row 0 / column 0 is the origin. The grid only
//! ever grows (to fit incoming indices) until an explicit `reset`.

use crate::error::GridError;
use crate::util::clamp_unit;

/// Rows of a fresh grid.
pub const DEFAULT_ROWS: usize = 10;
/// Columns of a fresh grid.
pub const DEFAULT_COLS: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<f64>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    /// Fresh 10×10 zero grid.
    pub fn new() -> Self {
        Self::zeros(DEFAULT_ROWS, DEFAULT_COLS)
    }

    /// Zero grid of the given shape (each side at least 1).
    pub fn zeros(rows: usize, cols: usize) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        Self {
            rows,
            cols,
            cells: vec![0.0; rows * cols],
        }
    }

    /// Build from explicit rows, validating shape and value range.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, GridError> {
        let expected = rows.first().map_or(0, Vec::len);
        if rows.is_empty() || expected == 0 {
            return Err(GridError::Empty);
        }
        let mut cells = Vec::with_capacity(rows.len() * expected);
        for (r, row) in rows.iter().enumerate() {
            if row.len() != expected {
                return Err(GridError::Ragged {
                    row: r,
                    expected,
                    found: row.len(),
                });
            }
            for (c, &value) in row.iter().enumerate() {
                if !(0.0..=1.0).contains(&value) {
                    return Err(GridError::OutOfRange {
                        row: r,
                        col: c,
                        value,
                    });
                }
                cells.push(value);
            }
        }
        Ok(Self {
            rows: rows.len(),
            cols: expected,
            cells,
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    /// Rows in index order (row 0 first).
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.cells.chunks_exact(self.cols)
    }

    /// Store `v` (clamped to [0, 1]) at column `x`, row `y`, growing the grid to
    /// `(max(rows, y + 1), max(cols, x + 1))` first when needed. Existing values
    /// keep their `(row, col)`; new cells start at 0.
    ///
    /// Nothing bounds the growth here; callers fed untrusted input should cap
    /// the indices first (`Session` does). A write whose grown size would not
    /// fit in `usize` is dropped.
    pub fn apply(&mut self, x: usize, y: usize, v: f64) {
        if y >= self.rows || x >= self.cols {
            let grown = y
                .checked_add(1)
                .zip(x.checked_add(1))
                .map(|(r, c)| (self.rows.max(r), self.cols.max(c)))
                .filter(|(r, c)| r.checked_mul(*c).is_some());
            let Some((rows, cols)) = grown else {
                tracing::warn!(x, y, "grid write dropped: size overflows");
                return;
            };
            self.grow(rows, cols);
        }
        let idx = y * self.cols + x;
        self.cells[idx] = clamp_unit(v);
    }

    /// Replace with a fresh 10×10 zero grid.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn grow(&mut self, rows: usize, cols: usize) {
        let mut cells = vec![0.0; rows * cols];
        for (r, old) in self.cells.chunks_exact(self.cols).enumerate() {
            let start = r * cols;
            cells[start..start + self.cols].copy_from_slice(old);
        }
        tracing::debug!(
            from_rows = self.rows,
            from_cols = self.cols,
            rows,
            cols,
            "grid grown"
        );
        self.rows = rows;
        self.cols = cols;
        self.cells = cells;
    }
}
