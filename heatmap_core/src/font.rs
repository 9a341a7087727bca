//! Embedded 5x7 bitmap font for axis labels and the caption.
//!
//! Only the characters the dashboard prints are present; anything else
//! renders as blank space.

use image::{Rgba, RgbaImage};

/// Glyph width in font pixels (before scaling).
pub const GLYPH_W: u32 = 5;
/// Glyph height in font pixels (before scaling).
pub const GLYPH_H: u32 = 7;
/// Horizontal advance per character (glyph + 1 spacing column).
pub const ADVANCE: u32 = GLYPH_W + 1;

/// Each glyph: 7 rows, each row's lower 5 bits = pixels (MSB = left).
#[rustfmt::skip]
const GLYPHS: [(char, [u8; 7]); 25] = [
    ('0', [0x0E,0x11,0x13,0x15,0x19,0x11,0x0E]),
    ('1', [0x04,0x0C,0x04,0x04,0x04,0x04,0x0E]),
    ('2', [0x0E,0x11,0x01,0x02,0x04,0x08,0x1F]),
    ('3', [0x1F,0x02,0x04,0x02,0x01,0x11,0x0E]),
    ('4', [0x02,0x06,0x0A,0x12,0x1F,0x02,0x02]),
    ('5', [0x1F,0x10,0x1E,0x01,0x01,0x11,0x0E]),
    ('6', [0x06,0x08,0x10,0x1E,0x11,0x11,0x0E]),
    ('7', [0x1F,0x01,0x02,0x04,0x08,0x08,0x08]),
    ('8', [0x0E,0x11,0x11,0x0E,0x11,0x11,0x0E]),
    ('9', [0x0E,0x11,0x11,0x0F,0x01,0x02,0x0C]),
    ('.', [0x00,0x00,0x00,0x00,0x00,0x0C,0x0C]),
    (',', [0x00,0x00,0x00,0x00,0x0C,0x04,0x08]),
    ('-', [0x00,0x00,0x00,0x1F,0x00,0x00,0x00]),
    (':', [0x00,0x0C,0x0C,0x00,0x0C,0x0C,0x00]),
    ('=', [0x00,0x00,0x1F,0x00,0x1F,0x00,0x00]),
    ('a', [0x00,0x00,0x0E,0x01,0x0F,0x11,0x0F]),
    ('e', [0x00,0x00,0x0E,0x11,0x1F,0x10,0x0E]),
    ('l', [0x0C,0x04,0x04,0x04,0x04,0x04,0x0E]),
    ('r', [0x00,0x00,0x16,0x19,0x10,0x10,0x10]),
    ('s', [0x00,0x00,0x0E,0x10,0x0E,0x01,0x1E]),
    ('t', [0x08,0x08,0x1C,0x08,0x08,0x09,0x06]),
    ('v', [0x00,0x00,0x11,0x11,0x11,0x0A,0x04]),
    ('x', [0x00,0x00,0x11,0x0A,0x04,0x0A,0x11]),
    ('y', [0x00,0x00,0x11,0x11,0x0F,0x01,0x0E]),
    ('n', [0x00,0x00,0x16,0x19,0x11,0x11,0x11]),
];

fn glyph(ch: char) -> Option<&'static [u8; 7]> {
    GLYPHS.iter().find(|(c, _)| *c == ch).map(|(_, g)| g)
}

/// Rendered width of `text` at `scale`, without trailing spacing.
pub fn text_width(text: &str, scale: u32) -> u32 {
    let n = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
    if n == 0 {
        return 0;
    }
    n.saturating_mul(ADVANCE * scale).saturating_sub(scale)
}

/// Rendered height of one line at `scale`.
pub fn text_height(scale: u32) -> u32 {
    GLYPH_H * scale
}

/// Draw `text` with its top-left corner at `(x, y)`, clipped to the image.
pub fn draw_text(img: &mut RgbaImage, x: u32, y: u32, text: &str, scale: u32, color: Rgba<u8>) {
    let scale = scale.max(1);
    let mut pen_x = x;
    for ch in text.chars() {
        if let Some(rows) = glyph(ch) {
            draw_glyph(img, pen_x, y, rows, scale, color);
        }
        pen_x = pen_x.saturating_add(ADVANCE * scale);
    }
}

fn draw_glyph(img: &mut RgbaImage, x: u32, y: u32, rows: &[u8; 7], scale: u32, color: Rgba<u8>) {
    let (w, h) = img.dimensions();
    for (row, &bits) in rows.iter().enumerate() {
        for col in 0..GLYPH_W {
            if bits & (0x10 >> col) == 0 {
                continue;
            }
            let px0 = x.saturating_add(col * scale);
            let py0 = y.saturating_add(row as u32 * scale);
            for dy in 0..scale {
                for dx in 0..scale {
                    let (px, py) = (px0.saturating_add(dx), py0.saturating_add(dy));
                    if px < w && py < h {
                        img.put_pixel(px, py, color);
                    }
                }
            }
        }
    }
}
