//! The abstract device context every painter draws on.
//!
//! [`Surface`] is deliberately small: rectangles, axis-aligned strokes,
//! filled circles and transformed image blits. [`PixelBuffer`](crate::pixels::PixelBuffer)
//! rasterises it; [`RecordingSurface`] keeps a command log for tests.

use crate::atlas::Atlas;
use crate::fb::Rgb;

/// Stroke width every painter returns to after a thick line.
pub const DEFAULT_LINE_WIDTH: u32 = 1;

/// Integer pixel position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Pixel rectangle, half-open on the right and bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> i32 {
        self.x + self.w as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h as i32
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Shrink by `by` pixels on every side.
    pub fn inset(&self, by: u32) -> Self {
        Self {
            x: self.x + by as i32,
            y: self.y + by as i32,
            w: self.w.saturating_sub(2 * by),
            h: self.h.saturating_sub(2 * by),
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Rect::new(x0, y0, (x1 - x0) as u32, (y1 - y0) as u32))
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = self.right().max(other.right());
        let y1 = self.bottom().max(other.bottom());
        Rect::new(x0, y0, (x1 - x0) as u32, (y1 - y0) as u32)
    }
}

/// 2D affine transform in canvas order.
///
/// Maps `(x, y)` to `(a*x + c*y + e, b*x + d*y + f)`. Each builder call
/// post-multiplies, so `identity().translate(..).rotate_degrees(..)` rotates
/// first and translates second, exactly like a canvas context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub const fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    pub fn translate(self, tx: f32, ty: f32) -> Self {
        Self {
            e: self.a * tx + self.c * ty + self.e,
            f: self.b * tx + self.d * ty + self.f,
            ..self
        }
    }

    /// Clockwise rotation in screen space (y grows downwards).
    ///
    /// Multiples of 90° use exact coefficients so quarter turns stay
    /// pixel-exact.
    pub fn rotate_degrees(self, degrees: f32) -> Self {
        let (sin, cos) = if degrees.rem_euclid(90.0) == 0.0 {
            match (degrees.rem_euclid(360.0) / 90.0) as u32 {
                0 => (0.0, 1.0),
                1 => (1.0, 0.0),
                2 => (0.0, -1.0),
                _ => (-1.0, 0.0),
            }
        } else {
            degrees.to_radians().sin_cos()
        };
        Self {
            a: self.a * cos + self.c * sin,
            b: self.b * cos + self.d * sin,
            c: self.c * cos - self.a * sin,
            d: self.d * cos - self.b * sin,
            ..self
        }
    }

    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    pub fn invert(&self) -> Option<Self> {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() < f32::EPSILON {
            return None;
        }
        Some(Self {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        })
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }
}

/// Device context.
///
/// Painters only ever talk to this trait, so the presentation layer is not
/// tied to a terminal, a canvas or a GPU.
pub trait Surface {
    /// Surface size in pixels, `(width, height)`.
    fn size(&self) -> (u32, u32);

    /// Reset `rect` to the background.
    fn clear_rect(&mut self, rect: Rect);

    fn fill_rect(&mut self, rect: Rect, color: Rgb);

    fn line_width(&self) -> u32;

    fn set_line_width(&mut self, width: u32);

    /// Axis-aligned stroke at the current line width.
    ///
    /// The run is half-open: `to` itself is not painted.
    fn stroke_line(&mut self, from: Point, to: Point, color: Rgb);

    fn fill_circle(&mut self, center: Point, radius: u32, color: Rgb);

    /// Blit `src` from the atlas into `dst`, where `dst` is in the local space
    /// described by `transform`. Transparent atlas pixels are skipped.
    fn draw_image(&mut self, atlas: &Atlas, src: Rect, dst: Rect, transform: &Transform);
}

/// One recorded [`Surface`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Rect),
    Fill(Rect, Rgb),
    LineWidth(u32),
    Line {
        from: Point,
        to: Point,
        width: u32,
        color: Rgb,
    },
    Circle {
        center: Point,
        radius: u32,
        color: Rgb,
    },
    Image {
        src: Rect,
        dst: Rect,
        transform: Transform,
    },
}

/// A surface that only records what was asked of it.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    line_width: u32,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            line_width: DEFAULT_LINE_WIDTH,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }

    pub fn images(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Image { .. }))
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::Clear(rect));
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        self.commands.push(DrawCommand::Fill(rect, color));
    }

    fn line_width(&self) -> u32 {
        self.line_width
    }

    fn set_line_width(&mut self, width: u32) {
        self.line_width = width;
        self.commands.push(DrawCommand::LineWidth(width));
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Rgb) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width: self.line_width,
            color,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: u32, color: Rgb) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn draw_image(&mut self, _atlas: &Atlas, src: Rect, dst: Rect, transform: &Transform) {
        self.commands.push(DrawCommand::Image {
            src,
            dst,
            transform: *transform,
        });
    }
}
