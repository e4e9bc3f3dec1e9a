//! Software rasterizer over an RGBA8 frame.

use crate::grid::Rgba;

pub(crate) struct Canvas<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> Canvas<'a> {
    pub(crate) fn new(frame: &'a mut [u8], width: u32, height: u32) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub(crate) fn width(&self) -> u32 {
        self.width
    }

    pub(crate) fn height(&self) -> u32 {
        self.height
    }

    pub(crate) fn clear(&mut self, color: Rgba) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&color.0);
        }
    }

    /// Source-over blend of one pixel. Out-of-bounds writes are dropped.
    pub(crate) fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let Some(offset) = (y as usize)
            .checked_mul(self.width as usize)
            .and_then(|row| row.checked_add(x as usize))
            .and_then(|pixel| pixel.checked_mul(4))
        else {
            return;
        };
        let Some(dst) = self.frame.get_mut(offset..offset + 4) else {
            return;
        };
        let [r, g, b, a] = color.0;
        match a {
            0 => {}
            255 => dst.copy_from_slice(&color.0),
            _ => {
                let alpha = a as u32;
                for (channel, src) in dst.iter_mut().zip([r, g, b]) {
                    let blended = (src as u32 * alpha + *channel as u32 * (255 - alpha) + 127) / 255;
                    *channel = blended as u8;
                }
                dst[3] = 255;
            }
        }
    }

    pub(crate) fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Rgba) {
        let start_x = x.max(0);
        let start_y = y.max(0);
        let end_x = x.saturating_add(width).min(self.width as i32);
        let end_y = y.saturating_add(height).min(self.height as i32);
        for py in start_y..end_y {
            for px in start_x..end_x {
                self.blend_pixel(px, py, color);
            }
        }
    }

    /// Even-odd scanline fill, sampling at pixel centers.
    pub(crate) fn fill_polygon(&mut self, points: &[(i32, i32)], color: Rgba) {
        if points.len() < 3 {
            return;
        }
        let min_y = points.iter().map(|p| p.1).min().unwrap_or(0).max(0);
        let max_y = points
            .iter()
            .map(|p| p.1)
            .max()
            .unwrap_or(0)
            .min(self.height as i32);

        let mut crossings: Vec<f32> = Vec::with_capacity(points.len());
        for y in min_y..max_y {
            let sample_y = y as f32 + 0.5;
            crossings.clear();
            for (index, &(x0, y0)) in points.iter().enumerate() {
                let (x1, y1) = points[(index + 1) % points.len()];
                let (y0f, y1f) = (y0 as f32, y1 as f32);
                if (y0f <= sample_y) == (y1f <= sample_y) {
                    continue;
                }
                let t = (sample_y - y0f) / (y1f - y0f);
                crossings.push(x0 as f32 + t * (x1 - x0) as f32);
            }
            crossings.sort_by(|a, b| a.total_cmp(b));
            for span in crossings.chunks_exact(2) {
                let start = (span[0] - 0.5).ceil() as i32;
                let end = (span[1] - 0.5).floor() as i32;
                for x in start.max(0)..=end.min(self.width as i32 - 1) {
                    self.blend_pixel(x, y, color);
                }
            }
        }
    }

    /// Closed outline, `width` pixels thick, centered on each edge. Alpha is
    /// ignored.
    pub(crate) fn stroke_polygon(&mut self, points: &[(i32, i32)], color: Rgba, width: u32) {
        if points.len() < 2 {
            return;
        }
        for (index, &start) in points.iter().enumerate() {
            let end = points[(index + 1) % points.len()];
            self.stroke_line(start, end, color, width.max(1) as i32);
        }
    }

    fn stroke_line(&mut self, (x0, y0): (i32, i32), (x1, y1): (i32, i32), color: Rgba, width: i32) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let half = (width - 1) / 2;
        let (mut x, mut y) = (x0, y0);
        let mut error = dx + dy;
        loop {
            // Strokes are always opaque.
            self.fill_rect(x - half, y - half, width, width, color.with_alpha(255));
            if x == x1 && y == y1 {
                break;
            }
            let doubled = 2 * error;
            if doubled >= dy {
                error += dy;
                x += sx;
            }
            if doubled <= dx {
                error += dx;
                y += sy;
            }
        }
    }

    pub(crate) fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = ((y * self.width + x) * 4) as usize;
        let bytes = self.frame.get(offset..offset + 4)?;
        Some([bytes[0], bytes[1], bytes[2], bytes[3]])
    }
}
