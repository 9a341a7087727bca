//! Grid → RGBA raster.
//!
//! Frame layout, outside in: caption band on top, row labels on the left,
//! column labels below, color scale on the right. The heat area sits in the
//! middle with row 0 at the bottom. Cells are square.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::colormap::inferno;
use crate::config::RenderOptions;
use crate::error::{HeatmapError, Result};
use crate::font::{draw_text, text_height, text_width};
use crate::grid::Grid;
use crate::measurement::Measurement;

struct Palette;
impl Palette {
    const CANVAS: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const AXIS: Rgba<u8> = Rgba([51, 51, 51, 255]);
    const TEXT: Rgba<u8> = Rgba([30, 30, 30, 255]);
    const GRID_LINE: Rgba<u8> = Rgba([255, 255, 255, 255]);
}

const FONT_SCALE: u32 = 2;
const PAD: u32 = 10;
const TICK_LEN: u32 = 4;
const LABEL_GAP: u32 = 4;
const BAR_GAP: u32 = 12;
const BAR_W: u32 = 16;
/// Keeps room for the caption on tiny grids.
const MIN_CANVAS_W: u32 = 320;

/// Cell edge in pixels: the longer grid side maps to `target_px`, clamped to
/// `[min_cell_px, max_cell_px]`.
pub fn cell_size(rows: usize, cols: usize, opts: &RenderOptions) -> u32 {
    let longest = rows.max(cols).max(1) as f64;
    let raw = (f64::from(opts.target_px) / longest).floor() as u32;
    let min = opts.min_cell_px.max(1);
    raw.clamp(min, opts.max_cell_px.max(min))
}

/// Evenly strided label indices, at most `max_ticks` of them.
pub fn tick_indices(n: usize, max_ticks: usize) -> Vec<usize> {
    let stride = n.div_ceil(max_ticks.max(1)).max(1);
    (0..n).step_by(stride).collect()
}

/// Pixel geometry of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub rows: usize,
    pub cols: usize,
    pub cell_px: u32,
    /// Top-left corner of the heat area.
    pub origin_x: u32,
    pub origin_y: u32,
    pub heat_w: u32,
    pub heat_h: u32,
    /// Full canvas size.
    pub width: u32,
    pub height: u32,
}

impl Layout {
    pub fn compute(rows: usize, cols: usize, opts: &RenderOptions) -> Self {
        let cell_px = cell_size(rows, cols, opts);
        let heat_w = cell_px.saturating_mul(cols as u32);
        let heat_h = cell_px.saturating_mul(rows as u32);
        let text_h = text_height(FONT_SCALE);

        let top = PAD + text_h + PAD;
        let (left, bottom) = if opts.show_ticks {
            let widest = text_width(&rows.saturating_sub(1).to_string(), FONT_SCALE);
            (
                PAD + widest + LABEL_GAP + TICK_LEN,
                PAD + TICK_LEN + LABEL_GAP + text_h,
            )
        } else {
            (PAD, PAD)
        };
        let right = if opts.show_colorbar {
            PAD + BAR_GAP + BAR_W + LABEL_GAP + text_width("0.5", FONT_SCALE)
        } else {
            PAD
        };

        Self {
            rows,
            cols,
            cell_px,
            origin_x: left,
            origin_y: top,
            heat_w,
            heat_h,
            width: (left + heat_w + right).max(MIN_CANVAS_W),
            height: top + heat_h + bottom,
        }
    }

    /// Top-left pixel of a cell; row 0 is the bottom row.
    pub fn cell_origin(&self, row: usize, col: usize) -> (u32, u32) {
        let flipped = self.rows.saturating_sub(1).saturating_sub(row) as u32;
        (
            self.origin_x + col as u32 * self.cell_px,
            self.origin_y + flipped * self.cell_px,
        )
    }

    pub fn cell_center(&self, row: usize, col: usize) -> (u32, u32) {
        let (x, y) = self.cell_origin(row, col);
        (x + self.cell_px / 2, y + self.cell_px / 2)
    }
}

/// Load a background picture (png/jpg) as RGBA.
pub fn load_background(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path)
        .map_err(|e| HeatmapError::Decode(format!("{}: {e}", path.display())))?;
    Ok(img.to_rgba8())
}

/// Stateful renderer: owns the display options and the background image,
/// caching the background resampled to the current heat-area size.
///
/// The background is drawn upright: its top row sits at the top of the heat
/// area. Grid rows are flipped (row 0 at the bottom), the picture is not.
pub struct Renderer {
    opts: RenderOptions,
    background: Option<RgbaImage>,
    scaled: Option<RgbaImage>,
}

impl Renderer {
    pub fn new(opts: RenderOptions) -> Self {
        Self {
            opts,
            background: None,
            scaled: None,
        }
    }

    pub fn with_background(mut self, img: RgbaImage) -> Self {
        self.set_background(Some(img));
        self
    }

    pub fn set_background(&mut self, img: Option<RgbaImage>) {
        self.background = img;
        self.scaled = None;
    }

    pub fn options(&self) -> &RenderOptions {
        &self.opts
    }

    pub fn layout(&self, grid: &Grid) -> Layout {
        Layout::compute(grid.rows(), grid.cols(), &self.opts)
    }

    /// Draw one frame.
    pub fn render(&mut self, grid: &Grid, last: Option<&Measurement>) -> RgbaImage {
        let layout = self.layout(grid);
        let mut img = RgbaImage::from_pixel(layout.width, layout.height, Palette::CANVAS);

        if let Some(bg) = self.scaled_background(layout.heat_w, layout.heat_h) {
            imageops::overlay(
                &mut img,
                bg,
                i64::from(layout.origin_x),
                i64::from(layout.origin_y),
            );
        }

        self.draw_cells(&mut img, grid, &layout);
        if self.opts.show_grid {
            draw_grid_lines(&mut img, &layout);
        }
        draw_frame(
            &mut img,
            layout.origin_x - 1,
            layout.origin_y - 1,
            layout.heat_w + 2,
            layout.heat_h + 2,
        );
        if self.opts.show_ticks {
            draw_ticks(&mut img, &layout, self.opts.max_ticks);
        }
        if self.opts.show_colorbar {
            draw_colorbar(&mut img, &layout);
        }
        if let Some(m) = last {
            draw_caption(&mut img, &layout, &format!("last {m}"));
        }
        img
    }

    fn scaled_background(&mut self, w: u32, h: u32) -> Option<&RgbaImage> {
        let bg = self.background.as_ref()?;
        let stale = self
            .scaled
            .as_ref()
            .is_none_or(|s| s.dimensions() != (w, h));
        if stale {
            tracing::debug!(w, h, "resampling background");
            self.scaled = Some(imageops::resize(bg, w, h, FilterType::Triangle));
        }
        self.scaled.as_ref()
    }

    fn draw_cells(&self, img: &mut RgbaImage, grid: &Grid, layout: &Layout) {
        let alpha = f64::from(self.opts.alpha.clamp(0.0, 1.0));
        let cell = layout.cell_px;
        for (row, values) in grid.iter_rows().enumerate() {
            for (col, &v) in values.iter().enumerate() {
                let color = inferno(v);
                let (x0, y0) = layout.cell_origin(row, col);
                for py in y0..y0 + cell {
                    for px in x0..x0 + cell {
                        let under = *img.get_pixel(px, py);
                        img.put_pixel(px, py, blend(under, color, alpha));
                    }
                }
            }
        }
    }
}

/// `alpha * over + (1 - alpha) * under`, opaque result.
pub fn blend(under: Rgba<u8>, over: [u8; 3], alpha: f64) -> Rgba<u8> {
    let mix = |o: u8, u: u8| -> u8 {
        (f64::from(o) * alpha + f64::from(u) * (1.0 - alpha))
            .round()
            .clamp(0.0, 255.0) as u8
    };
    Rgba([
        mix(over[0], under[0]),
        mix(over[1], under[1]),
        mix(over[2], under[2]),
        255,
    ])
}

fn hline(img: &mut RgbaImage, x: u32, y: u32, w: u32, color: Rgba<u8>) {
    let (iw, ih) = img.dimensions();
    if y >= ih {
        return;
    }
    for px in x..x.saturating_add(w).min(iw) {
        img.put_pixel(px, y, color);
    }
}

fn vline(img: &mut RgbaImage, x: u32, y: u32, h: u32, color: Rgba<u8>) {
    let (iw, ih) = img.dimensions();
    if x >= iw {
        return;
    }
    for py in y..y.saturating_add(h).min(ih) {
        img.put_pixel(x, py, color);
    }
}

fn draw_frame(img: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32) {
    hline(img, x, y, w, Palette::AXIS);
    hline(img, x, y + h - 1, w, Palette::AXIS);
    vline(img, x, y, h, Palette::AXIS);
    vline(img, x + w - 1, y, h, Palette::AXIS);
}

fn draw_grid_lines(img: &mut RgbaImage, layout: &Layout) {
    for c in 1..layout.cols as u32 {
        let x = layout.origin_x + c * layout.cell_px;
        vline(img, x, layout.origin_y, layout.heat_h, Palette::GRID_LINE);
    }
    for r in 1..layout.rows as u32 {
        let y = layout.origin_y + r * layout.cell_px;
        hline(img, layout.origin_x, y, layout.heat_w, Palette::GRID_LINE);
    }
}

fn draw_ticks(img: &mut RgbaImage, layout: &Layout, max_ticks: usize) {
    let text_h = text_height(FONT_SCALE);
    let axis_y = layout.origin_y + layout.heat_h + 1;
    for col in tick_indices(layout.cols, max_ticks) {
        let (cx, _) = layout.cell_center(0, col);
        vline(img, cx, axis_y, TICK_LEN, Palette::AXIS);
        let label = col.to_string();
        let lw = text_width(&label, FONT_SCALE);
        draw_text(
            img,
            cx.saturating_sub(lw / 2),
            axis_y + TICK_LEN + LABEL_GAP,
            &label,
            FONT_SCALE,
            Palette::TEXT,
        );
    }

    let axis_x = layout.origin_x.saturating_sub(1);
    for row in tick_indices(layout.rows, max_ticks) {
        let (_, cy) = layout.cell_center(row, 0);
        hline(
            img,
            axis_x.saturating_sub(TICK_LEN),
            cy,
            TICK_LEN,
            Palette::AXIS,
        );
        let label = row.to_string();
        let lw = text_width(&label, FONT_SCALE);
        draw_text(
            img,
            axis_x.saturating_sub(TICK_LEN + LABEL_GAP + lw),
            cy.saturating_sub(text_h / 2),
            &label,
            FONT_SCALE,
            Palette::TEXT,
        );
    }
}

fn draw_colorbar(img: &mut RgbaImage, layout: &Layout) {
    let x0 = layout.origin_x + layout.heat_w + 1 + BAR_GAP;
    let y0 = layout.origin_y;
    let h = layout.heat_h;
    let span = f64::from(h.saturating_sub(1).max(1));
    for dy in 0..h {
        let t = 1.0 - f64::from(dy) / span;
        let [r, g, b] = inferno(t);
        hline(img, x0, y0 + dy, BAR_W, Rgba([r, g, b, 255]));
    }
    draw_frame(img, x0 - 1, y0 - 1, BAR_W + 2, h + 2);

    let text_h = text_height(FONT_SCALE);
    let label_x = x0 + BAR_W + LABEL_GAP;
    let bottom = y0 + h.saturating_sub(1);
    for (label, y) in [("1", y0), ("0.5", y0 + h / 2), ("0", bottom)] {
        draw_text(
            img,
            label_x,
            y.saturating_sub(text_h / 2),
            label,
            FONT_SCALE,
            Palette::TEXT,
        );
    }
}

fn draw_caption(img: &mut RgbaImage, layout: &Layout, text: &str) {
    let tw = text_width(text, FONT_SCALE);
    let center = layout.origin_x + layout.heat_w / 2;
    let x = center.saturating_sub(tw / 2).max(PAD);
    draw_text(img, x, PAD, text, FONT_SCALE, Palette::TEXT);
}
