//! The drawing surface: a fixed-size freehand canvas.
//!
//! Two pixel layers: an opaque background color and a transparent stroke
//! layer. Keeping them apart lets the user recolor the background at any
//! time without losing strokes, and lets Clear wipe only the strokes.
//! `snapshot()` composites both into the buffer that gets encoded and sent
//! to the provider.

use eframe::egui;
use egui::{Color32, ColorImage, Pos2, Rect, Sense, TextureHandle, TextureOptions, Vec2};
use image::{Rgba, RgbaImage};

pub const CANVAS_WIDTH: u32 = 480;
pub const CANVAS_HEIGHT: u32 = 320;

pub struct SketchCanvas {
    /// Stroke layer; alpha 0 where the pencil never touched.
    strokes: RgbaImage,
    background: Color32,
    texture: Option<TextureHandle>,
    dirty: bool,
    /// Last stamped point of the in-progress drag, in canvas coordinates.
    last_point: Option<(f32, f32)>,
}

impl Default for SketchCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl SketchCanvas {
    pub fn new() -> Self {
        Self {
            strokes: RgbaImage::new(CANVAS_WIDTH, CANVAS_HEIGHT),
            background: Color32::WHITE,
            texture: None,
            dirty: true,
            last_point: None,
        }
    }

    pub fn background(&self) -> Color32 {
        self.background
    }

    pub fn set_background(&mut self, color: Color32) {
        if self.background != color {
            self.background = color;
            self.dirty = true;
        }
    }

    /// Wipe the stroke layer, keeping the background color.
    pub fn clear(&mut self) {
        self.strokes = RgbaImage::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        self.last_point = None;
        self.dirty = true;
    }

    /// True until the first stroke lands.
    pub fn is_blank(&self) -> bool {
        self.strokes.pixels().all(|p| p[3] == 0)
    }

    /// Read-only composite of background + strokes, taken at the moment
    /// analyze is pressed. Always a valid buffer, possibly blank.
    pub fn snapshot(&self) -> RgbaImage {
        let bg = [
            self.background.r(),
            self.background.g(),
            self.background.b(),
        ];
        let mut out = RgbaImage::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        for (dst, src) in out.pixels_mut().zip(self.strokes.pixels()) {
            let a = src[3] as f32 / 255.0;
            *dst = Rgba([
                (src[0] as f32 * a + bg[0] as f32 * (1.0 - a)).round() as u8,
                (src[1] as f32 * a + bg[1] as f32 * (1.0 - a)).round() as u8,
                (src[2] as f32 * a + bg[2] as f32 * (1.0 - a)).round() as u8,
                255,
            ]);
        }
        out
    }

    // ---- drawing ----------------------------------------------------------

    /// Stamp one round brush dab centered at (cx, cy), with a 1px coverage
    /// falloff at the rim so strokes don't alias hard.
    fn stamp(&mut self, cx: f32, cy: f32, radius: f32, color: Color32) {
        let r = radius.max(0.5);
        let min_x = (cx - r - 1.0).floor().max(0.0) as u32;
        let min_y = (cy - r - 1.0).floor().max(0.0) as u32;
        let max_x = ((cx + r + 1.0).ceil() as u32).min(CANVAS_WIDTH - 1);
        let max_y = ((cy + r + 1.0).ceil() as u32).min(CANVAS_HEIGHT - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                let dist = (dx * dx + dy * dy).sqrt();
                let coverage = (r - dist + 0.5).clamp(0.0, 1.0);
                if coverage <= 0.0 {
                    continue;
                }
                blend_over(
                    self.strokes.get_pixel_mut(x, y),
                    color,
                    (coverage * 255.0) as u8,
                );
            }
        }
        self.dirty = true;
    }

    /// Dense sub-pixel stepping between two points for smooth strokes.
    fn draw_line(&mut self, start: (f32, f32), end: (f32, f32), radius: f32, color: Color32) {
        let dx = end.0 - start.0;
        let dy = end.1 - start.1;
        let distance = (dx * dx + dy * dy).sqrt();
        if distance < 0.1 {
            self.stamp(start.0, start.1, radius, color);
            return;
        }
        let steps = distance.ceil() as usize;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            self.stamp(start.0 + dx * t, start.1 + dy * t, radius, color);
        }
    }

    // ---- egui integration --------------------------------------------------

    /// Show the canvas and handle freehand input. `stroke_width` is the
    /// brush diameter in pixels (1–30).
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        stroke_width: f32,
        stroke_color: Color32,
    ) -> egui::Response {
        let size = Vec2::new(CANVAS_WIDTH as f32, CANVAS_HEIGHT as f32);
        let (response, painter) = ui.allocate_painter(size, Sense::drag());
        let rect = response.rect;

        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                let current = to_canvas_coords(pos, rect);
                let radius = (stroke_width * 0.5).max(0.5);
                match self.last_point {
                    Some(last) => self.draw_line(last, current, radius, stroke_color),
                    None => self.stamp(current.0, current.1, radius, stroke_color),
                }
                self.last_point = Some(current);
            }
        } else {
            self.last_point = None;
        }

        if self.dirty || self.texture.is_none() {
            let composite = self.snapshot();
            let color_image = ColorImage::from_rgba_unmultiplied(
                [CANVAS_WIDTH as usize, CANVAS_HEIGHT as usize],
                composite.as_raw(),
            );
            match &mut self.texture {
                Some(texture) => texture.set(color_image, TextureOptions::NEAREST),
                None => {
                    self.texture = Some(ui.ctx().load_texture(
                        "sketch_canvas",
                        color_image,
                        TextureOptions::NEAREST,
                    ));
                }
            }
            self.dirty = false;
        }

        if let Some(texture) = &self.texture {
            painter.image(
                texture.id(),
                rect,
                Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(1.0, 1.0)),
                Color32::WHITE,
            );
        }
        painter.rect_stroke(rect, 0.0, egui::Stroke::new(1.0, Color32::GRAY));

        response
    }
}

/// Screen position → canvas pixel coordinates, clamped to the buffer.
fn to_canvas_coords(pos: Pos2, rect: Rect) -> (f32, f32) {
    let x = (pos.x - rect.min.x).clamp(0.0, CANVAS_WIDTH as f32 - 1.0);
    let y = (pos.y - rect.min.y).clamp(0.0, CANVAS_HEIGHT as f32 - 1.0);
    (x, y)
}

/// Source-over blend of `color` at `alpha` onto one stroke-layer pixel.
fn blend_over(dst: &mut Rgba<u8>, color: Color32, alpha: u8) {
    let sa = alpha as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return;
    }
    let src = [color.r() as f32, color.g() as f32, color.b() as f32];
    for c in 0..3 {
        let blended = (src[c] * sa + dst[c] as f32 * da * (1.0 - sa)) / out_a;
        dst[c] = blended.round() as u8;
    }
    dst[3] = (out_a * 255.0).round() as u8;
}
