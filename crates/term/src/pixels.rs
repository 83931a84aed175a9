//! Software rasteriser behind the [`Surface`] trait.
//!
//! Every write is clipped to the buffer and folded into a damage rectangle,
//! so presenters only have to look at what changed since the last flush.

use crate::atlas::Atlas;
use crate::fb::{palette, Rgb};
use crate::surface::{Point, Rect, Surface, Transform, DEFAULT_LINE_WIDTH};

/// RGB pixel framebuffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
    line_width: u32,
    damage: Option<Rect>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![palette::BACKGROUND; (width as usize) * (height as usize)],
            line_width: DEFAULT_LINE_WIDTH,
            damage: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    #[inline(always)]
    fn idx(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Rgb> {
        self.idx(x, y).map(|i| self.pixels[i])
    }

    /// Union of everything written since the last call.
    pub fn take_damage(&mut self) -> Option<Rect> {
        self.damage.take()
    }

    pub fn damage(&self) -> Option<Rect> {
        self.damage
    }

    /// Count pixels of `color` inside `rect`.
    pub fn count(&self, rect: Rect, color: Rgb) -> usize {
        let Some(r) = rect.intersect(&self.bounds()) else {
            return 0;
        };
        let mut n = 0;
        for y in r.y..r.bottom() {
            for x in r.x..r.right() {
                if self.get(x as u32, y as u32) == Some(color) {
                    n += 1;
                }
            }
        }
        n
    }

    fn mark(&mut self, rect: Rect) {
        self.damage = Some(match self.damage {
            Some(d) => d.union(&rect),
            None => rect,
        });
    }

    fn put(&mut self, x: i32, y: i32, color: Rgb) {
        if x < 0 || y < 0 {
            return;
        }
        if let Some(i) = self.idx(x as u32, y as u32) {
            self.pixels[i] = color;
        }
    }

    fn paint(&mut self, rect: Rect, color: Rgb) {
        let Some(r) = rect.intersect(&self.bounds()) else {
            return;
        };
        for y in r.y..r.bottom() {
            let start = (y as usize) * (self.width as usize) + r.x as usize;
            self.pixels[start..start + r.w as usize].fill(color);
        }
        self.mark(r);
    }
}

impl Surface for PixelBuffer {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.paint(rect, palette::BACKGROUND);
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        self.paint(rect, color);
    }

    fn line_width(&self) -> u32 {
        self.line_width
    }

    fn set_line_width(&mut self, width: u32) {
        self.line_width = width.max(1);
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Rgb) {
        let w = self.line_width;
        // Thickness is centred on the line, rounding towards the top/left.
        let half = ((w - 1) / 2) as i32;
        if from.y == to.y {
            let x0 = from.x.min(to.x);
            let len = (from.x - to.x).unsigned_abs();
            self.paint(Rect::new(x0, from.y - half, len, w), color);
        } else if from.x == to.x {
            let y0 = from.y.min(to.y);
            let len = (from.y - to.y).unsigned_abs();
            self.paint(Rect::new(from.x - half, y0, w, len), color);
        } else {
            // Diagonal fallback: stamp along the major axis.
            let dx = (to.x - from.x) as f32;
            let dy = (to.y - from.y) as f32;
            let steps = dx.abs().max(dy.abs()) as i32;
            for i in 0..steps {
                let t = i as f32 / steps as f32;
                let x = from.x + (dx * t).round() as i32;
                let y = from.y + (dy * t).round() as i32;
                self.paint(Rect::new(x - half, y - half, w, w), color);
            }
        }
    }

    fn fill_circle(&mut self, center: Point, radius: u32, color: Rgb) {
        let r = radius as i32;
        let r2 = r * r;
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r2 {
                    self.put(center.x + dx, center.y + dy, color);
                }
            }
        }
        let d = 2 * radius + 1;
        if let Some(touched) = Rect::new(center.x - r, center.y - r, d, d).intersect(&self.bounds()) {
            self.mark(touched);
        }
    }

    fn draw_image(&mut self, atlas: &Atlas, src: Rect, dst: Rect, transform: &Transform) {
        if dst.is_empty() || src.is_empty() {
            return;
        }
        let Some(inverse) = transform.invert() else {
            return;
        };

        // Device-space bounding box of the transformed destination rect.
        let corners = [
            transform.apply(dst.x as f32, dst.y as f32),
            transform.apply(dst.right() as f32, dst.y as f32),
            transform.apply(dst.x as f32, dst.bottom() as f32),
            transform.apply(dst.right() as f32, dst.bottom() as f32),
        ];
        let min_x = corners.iter().map(|c| c.0).fold(f32::INFINITY, f32::min).floor() as i32;
        let min_y = corners.iter().map(|c| c.1).fold(f32::INFINITY, f32::min).floor() as i32;
        let max_x = corners.iter().map(|c| c.0).fold(f32::NEG_INFINITY, f32::max).ceil() as i32;
        let max_y = corners.iter().map(|c| c.1).fold(f32::NEG_INFINITY, f32::max).ceil() as i32;
        let bbox = Rect::new(min_x, min_y, (max_x - min_x) as u32, (max_y - min_y) as u32);
        let Some(area) = bbox.intersect(&self.bounds()) else {
            return;
        };

        let sx = src.w as f32 / dst.w as f32;
        let sy = src.h as f32 / dst.h as f32;
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                let (lx, ly) = inverse.apply(x as f32 + 0.5, y as f32 + 0.5);
                let u = (lx - dst.x as f32) * sx;
                let v = (ly - dst.y as f32) * sy;
                if u < 0.0 || v < 0.0 || u >= src.w as f32 || v >= src.h as f32 {
                    continue;
                }
                let ax = src.x as u32 + u as u32;
                let ay = src.y as u32 + v as u32;
                if let Some(color) = atlas.opaque_pixel(ax, ay) {
                    self.put(x, y, color);
                }
            }
        }
        self.mark(area);
    }
}
