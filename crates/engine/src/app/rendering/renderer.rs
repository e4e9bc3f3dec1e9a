use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{ImageFormat, RgbaImage};
use pixels::{Error, Pixels, SurfaceTexture};
use thiserror::Error as ThisError;
use tracing::warn;
use winit::window::Window;

use crate::drawing::{
    DrawList, Drawing, PlayerArt, StyleSwatch, TileArt, CURSOR_DRAWING, PLAYER_DRAWING,
    STYLES_DRAWING, TILE_MAP_DRAWING,
};
use crate::geom::{Vec2, Viewport, Xfm};
use crate::grid::{Color, Rgba};

use super::font::{draw_text, line_advance, text_width};
use super::raster::Canvas;

const CLEAR_COLOR: Rgba = Color::GREY;
const DEBUG_OVERLAY_STROKE_PX: u32 = 2;
const SELECTED_SWATCH_STROKE_PX: u32 = 5;
const LABEL_SCALE: i32 = 2;
const HUD_SCALE: i32 = 2;
const HUD_PADDING_PX: i32 = 4;
const HUD_TEXT_COLOR: Rgba = Color::WHITE;
const HUD_PANEL_COLOR: Rgba = Rgba([10, 12, 16, 170]);
const HUD_RULE_WIDTH: usize = 30;

/// Which drawings the last frame handled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub drawn: Vec<String>,
    pub forgotten: Vec<String>,
}

impl RenderReport {
    pub fn hud_lines(&self) -> Vec<String> {
        let mut lines = vec!["-".repeat(HUD_RULE_WIDTH), format!("Drew: {}", self.drawn.join(","))];
        if self.forgotten.is_empty() {
            lines.push("Drew all drawings.".to_string());
        } else {
            lines.push(format!("Forgot to draw: {}", self.forgotten.join(",")));
        }
        lines
    }
}

#[derive(Debug, ThisError)]
pub enum ScreenshotError {
    #[error("failed to create screenshot directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("frame buffer does not match a {width}x{height} image")]
    FrameSize { width: u32, height: u32 },
    #[error("failed to write screenshot {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
    warned_unknown_drawings: HashSet<String>,
}

impl Renderer {
    pub fn new(window: Arc<Window>) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport: Viewport::new(size.width, size.height),
            warned_unknown_drawings: HashSet::new(),
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.viewport = Viewport::new(width, height);
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }

    pub fn render(
        &mut self,
        drawings: &DrawList,
        xfm: &Xfm,
        debug: bool,
        hud_lines: Option<&[String]>,
    ) -> Result<RenderReport, Error> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Ok(RenderReport::default());
        }
        let viewport = self.viewport;
        let mut canvas = Canvas::new(self.pixels.frame_mut(), viewport.width, viewport.height);
        let report = paint_drawings(
            &mut canvas,
            drawings,
            xfm,
            debug,
            &mut self.warned_unknown_drawings,
        );
        if let Some(lines) = hud_lines {
            paint_hud(&mut canvas, lines);
        }
        self.pixels.render()?;
        Ok(report)
    }

    /// Write the last rendered frame to `path` as PNG.
    pub fn save_screenshot(&self, path: &Path) -> Result<(), ScreenshotError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ScreenshotError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let Viewport { width, height } = self.viewport;
        let image = RgbaImage::from_raw(width, height, self.pixels.frame().to_vec())
            .ok_or(ScreenshotError::FrameSize { width, height })?;
        image
            .save_with_format(path, ImageFormat::Png)
            .map_err(|source| ScreenshotError::Encode {
                path: path.to_path_buf(),
                source,
            })
    }
}

pub(crate) fn paint_drawings(
    canvas: &mut Canvas<'_>,
    drawings: &DrawList,
    xfm: &Xfm,
    debug: bool,
    warned_unknown: &mut HashSet<String>,
) -> RenderReport {
    let viewport = Viewport::new(canvas.width(), canvas.height());
    let project = |vertices: &[Vec2; 4]| vertices.map(|v| xfm.world_to_render(v, viewport));
    canvas.clear(CLEAR_COLOR);

    let mut report = RenderReport::default();
    for (name, drawing) in drawings.iter() {
        let handled = match (name, drawing) {
            (TILE_MAP_DRAWING, Drawing::TileMap(tiles)) => {
                for tile in tiles {
                    paint_tile(canvas, &project(&tile.vertices), tile.color, debug);
                }
                true
            }
            (PLAYER_DRAWING, Drawing::Player(art)) => {
                paint_player(canvas, art, &project);
                true
            }
            (CURSOR_DRAWING, Drawing::Cursor(art)) => {
                paint_cursor(canvas, art, &project);
                true
            }
            (STYLES_DRAWING, Drawing::Styles(swatches)) => {
                for swatch in swatches {
                    paint_swatch(canvas, swatch, xfm, viewport);
                }
                true
            }
            _ => false,
        };
        if handled {
            report.drawn.push(name.to_string());
        } else {
            if warned_unknown.insert(name.to_string()) {
                warn!(name, kind = drawing.kind(), "unknown_drawing");
            }
            report.forgotten.push(name.to_string());
        }
    }
    report
}

/// White tiles get a light grey border so they stay visible on each other.
fn tile_border(color: Rgba, debug: bool) -> (Rgba, u32) {
    let border = if color == Color::WHITE {
        Color::LIGHT_GREY
    } else {
        Color::WHITE
    };
    (border, if debug { 2 } else { 1 })
}

fn paint_tile(canvas: &mut Canvas<'_>, points: &[(i32, i32); 4], color: Rgba, debug: bool) {
    canvas.fill_polygon(points, color);
    let (border, width) = tile_border(color, debug);
    canvas.stroke_polygon(points, border, width);
}

fn paint_player(
    canvas: &mut Canvas<'_>,
    art: &PlayerArt,
    project: &impl Fn(&[Vec2; 4]) -> [(i32, i32); 4],
) {
    canvas.fill_polygon(&project(&art.vertices), art.color);
    if let Some(overlay) = &art.debug {
        for tile in &overlay.tiles {
            canvas.stroke_polygon(&project(tile), overlay.color, DEBUG_OVERLAY_STROKE_PX);
        }
    }
}

fn paint_cursor(
    canvas: &mut Canvas<'_>,
    art: &TileArt,
    project: &impl Fn(&[Vec2; 4]) -> [(i32, i32); 4],
) {
    let points = project(&art.vertices);
    canvas.fill_polygon(&points, art.color);
    canvas.stroke_polygon(&points, Color::WHITE, 1);
}

fn paint_swatch(canvas: &mut Canvas<'_>, swatch: &StyleSwatch, xfm: &Xfm, viewport: Viewport) {
    let half = 0.5;
    let vertices = [
        Vec2::new(swatch.center.x - half, swatch.center.y + half),
        Vec2::new(swatch.center.x + half, swatch.center.y + half),
        Vec2::new(swatch.center.x + half, swatch.center.y - half),
        Vec2::new(swatch.center.x - half, swatch.center.y - half),
    ];
    let points = vertices.map(|v| xfm.world_to_render(v, viewport));
    canvas.fill_polygon(&points, swatch.color);
    let (border, _) = tile_border(swatch.color, false);
    let width = if swatch.selected {
        SELECTED_SWATCH_STROKE_PX
    } else {
        1
    };
    canvas.stroke_polygon(&points, border, width);

    let label = swatch.id.to_string();
    let (bottom_mid_x, bottom_y) = xfm.world_to_render(
        Vec2::new(swatch.center.x, swatch.center.y - half),
        viewport,
    );
    let label_x = bottom_mid_x - text_width(&label, LABEL_SCALE) / 2;
    draw_text(canvas, label_x, bottom_y + 3, &label, Color::WHITE, LABEL_SCALE);
}

fn paint_hud(canvas: &mut Canvas<'_>, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    let widest = lines
        .iter()
        .map(|line| text_width(line, HUD_SCALE))
        .max()
        .unwrap_or(0);
    let panel_height = lines.len() as i32 * line_advance(HUD_SCALE) + HUD_PADDING_PX * 2;
    canvas.fill_rect(0, 0, widest + HUD_PADDING_PX * 2, panel_height, HUD_PANEL_COLOR);

    let mut y = HUD_PADDING_PX;
    for line in lines {
        draw_text(canvas, HUD_PADDING_PX, y, line, HUD_TEXT_COLOR, HUD_SCALE);
        y += line_advance(HUD_SCALE);
    }
}
