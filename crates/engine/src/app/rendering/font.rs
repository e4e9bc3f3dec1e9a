//! 3×5 bitmap font for the HUD and swatch labels.

use crate::grid::Rgba;

use super::raster::Canvas;

const GLYPH_WIDTH: i32 = 3;
const GLYPH_HEIGHT: i32 = 5;
const FIRST_GLYPH: u32 = ' ' as u32;

/// Printable ASCII, five 3-bit rows per glyph packed top row first.
const GLYPHS: [u16; 95] = [
    0x0000, 0x2482, 0x5a00, 0x5f7d, 0x7ddf, 0x52a5, 0x2aab, 0x2400, //  !"#$%&'
    0x1491, 0x4494, 0x0aa8, 0x05d0, 0x0014, 0x01c0, 0x0002, 0x12a4, // ()*+,-./
    0x7b6f, 0x2c97, 0x73e7, 0x73cf, 0x5bc9, 0x79cf, 0x79ef, 0x7292, // 01234567
    0x7bef, 0x7bcf, 0x0410, 0x0414, 0x1511, 0x0e38, 0x4454, 0x72c2, // 89:;<=>?
    0x7be7, 0x2bed, 0x6bae, 0x7927, 0x6b6e, 0x79a7, 0x79a4, 0x796f, // @ABCDEFG
    0x5bed, 0x7497, 0x726f, 0x5bad, 0x4927, 0x5fed, 0x5ffd, 0x7b6f, // HIJKLMNO
    0x6ba4, 0x7b79, 0x6bad, 0x79cf, 0x7492, 0x5b6f, 0x5b6a, 0x5bfd, // PQRSTUVW
    0x5aad, 0x5a92, 0x72a7, 0x6926, 0x4889, 0x324b, 0x2a00, 0x0007, // XYZ[\]^_
    0x4400, 0x0e7f, 0x49ae, 0x0f27, 0x13ef, 0x0fa7, 0x39a4, 0x0f79, // `abcdefg
    0x49ad, 0x2092, 0x106a, 0x4bad, 0x4927, 0x0ded, 0x0d6d, 0x0f6f, // hijklmno
    0x0d74, 0x0f79, 0x0d64, 0x0f8f, 0x2e93, 0x0b6f, 0x0b6a, 0x0b7a, // pqrstuvw
    0x0a95, 0x0b79, 0x0e57, 0x3593, 0x2492, 0x64d6, 0x0780, // xyz{|}~
];

/// Anything outside printable ASCII draws as `?`.
fn glyph_bits(ch: char) -> u16 {
    let index = (ch as u32).wrapping_sub(FIRST_GLYPH) as usize;
    GLYPHS
        .get(index)
        .copied()
        .unwrap_or(GLYPHS[('?' as u32 - FIRST_GLYPH) as usize])
}

fn glyph_row(bits: u16, row: i32) -> u16 {
    (bits >> (GLYPH_WIDTH * (GLYPH_HEIGHT - 1 - row))) & 0b111
}

pub(crate) fn glyph_advance(scale: i32) -> i32 {
    (GLYPH_WIDTH + 1) * scale
}

pub(crate) fn line_advance(scale: i32) -> i32 {
    (GLYPH_HEIGHT + 2) * scale
}

pub(crate) fn text_width(text: &str, scale: i32) -> i32 {
    let count = text.chars().count() as i32;
    if count == 0 {
        return 0;
    }
    count * glyph_advance(scale) - scale
}

/// Draw `text` with its top-left at `(x, y)`. Pixels off the canvas are
/// dropped.
pub(crate) fn draw_text(canvas: &mut Canvas<'_>, x: i32, y: i32, text: &str, color: Rgba, scale: i32) {
    let scale = scale.max(1);
    let mut pen_x = x;
    for ch in text.chars() {
        let bits = glyph_bits(ch);
        for row in 0..GLYPH_HEIGHT {
            let row_bits = glyph_row(bits, row);
            for col in 0..GLYPH_WIDTH {
                if row_bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                    continue;
                }
                canvas.fill_rect(
                    pen_x + col * scale,
                    y + row * scale,
                    scale,
                    scale,
                    color,
                );
            }
        }
        pen_x += glyph_advance(scale);
    }
}
