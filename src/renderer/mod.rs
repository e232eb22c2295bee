//! Drawing seam
//!
//! The core never talks to a graphics API. It walks the live shapes and
//! issues calls on a [`Canvas`] implemented by the host backend. Shapes
//! whose brush or bitmap is missing or unrealized are skipped.

pub mod recording;
pub mod resources;

pub use recording::{DrawCommand, RecordingCanvas};
pub use resources::{BitmapId, BrushId, Color, ResourceLoader, Resources, SlotState, colors};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{
    BitmapShape, BoundsProvider, CircleShape, Rect, RectangleShape, ShapeArena, ShapeId,
    ShapeKind, TextAlign, TextShape, World,
};

/// Host drawing backend
pub trait Canvas {
    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, rect: Rect, brush: BrushId);
    fn fill_circle(&mut self, centre: Vec2, radius: f32, brush: BrushId);
    fn outline_rect(&mut self, rect: Rect, brush: BrushId);
    fn draw_bitmap(&mut self, bitmap: BitmapId, rect: Rect, opacity: f32);
    fn draw_text(&mut self, text: &str, rect: Rect, align: TextAlign, brush: BrushId);
}

/// Debug overlays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawOptions {
    pub show_group_bounds: bool,
    pub show_bitmap_bounds: bool,
}

/// What a drawable may consult while drawing
pub struct DrawContext<'a> {
    pub resources: &'a Resources,
    pub options: DrawOptions,
}

impl DrawContext<'_> {
    /// The brush, if it exists and the backend has realized it
    pub fn brush(&self, brush: Option<BrushId>) -> Option<BrushId> {
        brush.filter(|&b| self.resources.is_brush_realized(b))
    }

    pub fn bitmap(&self, bitmap: Option<BitmapId>) -> Option<BitmapId> {
        bitmap.filter(|&b| self.resources.is_bitmap_realized(b))
    }
}

/// Capability: paint a shape at an effective position
pub trait Drawable {
    fn draw(
        &self,
        pos: Vec2,
        brush: Option<BrushId>,
        ctx: &DrawContext<'_>,
        canvas: &mut dyn Canvas,
    );
}

impl Drawable for RectangleShape {
    fn draw(
        &self,
        pos: Vec2,
        brush: Option<BrushId>,
        ctx: &DrawContext<'_>,
        canvas: &mut dyn Canvas,
    ) {
        if let Some(brush) = ctx.brush(brush) {
            canvas.fill_rect(self.bounds_at(pos), brush);
        }
    }
}

impl Drawable for CircleShape {
    fn draw(
        &self,
        pos: Vec2,
        brush: Option<BrushId>,
        ctx: &DrawContext<'_>,
        canvas: &mut dyn Canvas,
    ) {
        if let Some(brush) = ctx.brush(brush) {
            canvas.fill_circle(pos, self.radius, brush);
        }
    }
}

impl Drawable for BitmapShape {
    fn draw(
        &self,
        pos: Vec2,
        brush: Option<BrushId>,
        ctx: &DrawContext<'_>,
        canvas: &mut dyn Canvas,
    ) {
        let rect = self.bounds_at(pos);
        if let Some(bitmap) = ctx.bitmap(self.bitmap) {
            canvas.draw_bitmap(bitmap, rect, self.opacity);
        }
        if ctx.options.show_bitmap_bounds {
            if let Some(brush) = ctx.brush(brush) {
                canvas.outline_rect(rect, brush);
            }
        }
    }
}

impl Drawable for TextShape {
    fn draw(
        &self,
        pos: Vec2,
        brush: Option<BrushId>,
        ctx: &DrawContext<'_>,
        canvas: &mut dyn Canvas,
    ) {
        if let Some(brush) = ctx.brush(brush) {
            canvas.draw_text(&self.text, self.bounds_at(pos), self.align, brush);
        }
    }
}

impl Drawable for ShapeKind {
    fn draw(
        &self,
        pos: Vec2,
        brush: Option<BrushId>,
        ctx: &DrawContext<'_>,
        canvas: &mut dyn Canvas,
    ) {
        match self {
            ShapeKind::Rectangle(r) => r.draw(pos, brush, ctx, canvas),
            ShapeKind::Circle(c) => c.draw(pos, brush, ctx, canvas),
            ShapeKind::Bitmap(b) => b.draw(pos, brush, ctx, canvas),
            ShapeKind::Text(t) => t.draw(pos, brush, ctx, canvas),
            // Group outlines need the arena; see draw_shape
            ShapeKind::Group(_) => {}
        }
    }
}

/// Draw a shape, then its active children
pub fn draw_shape(
    shapes: &ShapeArena,
    id: ShapeId,
    ctx: &DrawContext<'_>,
    canvas: &mut dyn Canvas,
) {
    let (Some(shape), Some(pos)) = (shapes.get(id), shapes.pos(id)) else {
        return;
    };
    shape.kind.draw(pos, shape.brush, ctx, canvas);
    if shape.kind.is_group() && ctx.options.show_group_bounds {
        if let (Some(rect), Some(brush)) = (shapes.bounds(id), ctx.brush(shape.brush)) {
            canvas.outline_rect(rect, brush);
        }
    }
    for &child in shape.children() {
        if shapes.is_active(child) {
            draw_shape(shapes, child, ctx, canvas);
        }
    }
}

/// Draw every active live shape of the world in live order. Shapes that
/// were attached to a group are drawn by the group.
pub fn render(world: &World, canvas: &mut dyn Canvas) {
    let ctx = DrawContext {
        resources: world.resources(),
        options: world.settings().draw,
    };
    canvas.clear(world.background());
    for id in world.live_roots() {
        if world.shapes().is_active(id) {
            draw_shape(world.shapes(), id, &ctx, canvas);
        }
    }
}
