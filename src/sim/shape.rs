//! Shape entities and their bounding boxes
//!
//! A shape is a positioned, movable entity. What it looks like and how big
//! it is comes from its [`ShapeKind`]; each kind provides its own bounding
//! box through [`BoundsProvider`]. Groups have no intrinsic size: their
//! bounds are the union of their children's and are resolved by the arena.

use std::cell::Cell;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bounds::Rect;
use super::motion::Motion;
use crate::renderer::{BitmapId, BrushId};

/// Handle to a shape stored in a [`ShapeArena`](super::ShapeArena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShapeId(pub u32);

/// Capability: axis-aligned bounds for a hypothetical top-left/centre position
pub trait BoundsProvider {
    fn bounds_at(&self, pos: Vec2) -> Rect;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectangleShape {
    pub width: f32,
    pub height: f32,
}

/// Circle positioned by its centre
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleShape {
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BitmapShape {
    pub width: f32,
    pub height: f32,
    pub opacity: f32,
    /// Missing bitmaps draw nothing
    pub bitmap: Option<BitmapId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Leading,
    Center,
    Trailing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextShape {
    pub text: String,
    pub width: f32,
    pub height: f32,
    pub align: TextAlign,
}

/// Composite shape. The cached local bounds are cleared whenever a child
/// changes and rebuilt on the next query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupShape {
    #[serde(skip)]
    pub(crate) bounds_cache: Cell<Option<Rect>>,
}

impl GroupShape {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn invalidate(&self) {
        self.bounds_cache.set(None);
    }
}

impl PartialEq for GroupShape {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl BoundsProvider for RectangleShape {
    fn bounds_at(&self, pos: Vec2) -> Rect {
        Rect::from_pos_size(pos, self.width, self.height)
    }
}

impl BoundsProvider for CircleShape {
    fn bounds_at(&self, pos: Vec2) -> Rect {
        Rect::new(
            pos.x - self.radius,
            pos.y - self.radius,
            pos.x + self.radius,
            pos.y + self.radius,
        )
    }
}

impl BoundsProvider for BitmapShape {
    fn bounds_at(&self, pos: Vec2) -> Rect {
        Rect::from_pos_size(pos, self.width, self.height)
    }
}

impl BoundsProvider for TextShape {
    fn bounds_at(&self, pos: Vec2) -> Rect {
        Rect::from_pos_size(pos, self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShapeKind {
    Rectangle(RectangleShape),
    Circle(CircleShape),
    Bitmap(BitmapShape),
    Text(TextShape),
    Group(GroupShape),
}

impl ShapeKind {
    /// Bounds of a leaf shape; `None` for groups
    pub fn leaf_bounds_at(&self, pos: Vec2) -> Option<Rect> {
        match self {
            ShapeKind::Rectangle(r) => Some(r.bounds_at(pos)),
            ShapeKind::Circle(c) => Some(c.bounds_at(pos)),
            ShapeKind::Bitmap(b) => Some(b.bounds_at(pos)),
            ShapeKind::Text(t) => Some(t.bounds_at(pos)),
            ShapeKind::Group(_) => None,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, ShapeKind::Group(_))
    }

    pub fn radius(&self) -> Option<f32> {
        match self {
            ShapeKind::Circle(c) => Some(c.radius),
            _ => None,
        }
    }
}

/// A positioned, movable, collidable entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// Position relative to the parent (absolute when there is none)
    pub pos: Vec2,
    pub motion: Motion,
    pub active: bool,
    /// Opaque game tag
    pub user_data: i64,
    pub brush: Option<BrushId>,
    pub kind: ShapeKind,
    pub(crate) parent: Option<ShapeId>,
    pub(crate) children: Vec<ShapeId>,
}

impl Shape {
    pub fn new(pos: Vec2, motion: Motion, kind: ShapeKind) -> Self {
        Self {
            pos,
            motion,
            active: true,
            user_data: 0,
            brush: None,
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn rectangle(x: f32, y: f32, width: f32, height: f32, motion: Motion) -> Self {
        Self::new(
            Vec2::new(x, y),
            motion,
            ShapeKind::Rectangle(RectangleShape { width, height }),
        )
    }

    pub fn circle(x: f32, y: f32, radius: f32, motion: Motion) -> Self {
        Self::new(Vec2::new(x, y), motion, ShapeKind::Circle(CircleShape { radius }))
    }

    pub fn bitmap(
        bitmap: Option<BitmapId>,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        motion: Motion,
    ) -> Self {
        Self::new(
            Vec2::new(x, y),
            motion,
            ShapeKind::Bitmap(BitmapShape {
                width,
                height,
                opacity: 1.0,
                bitmap,
            }),
        )
    }

    pub fn text(
        text: impl Into<String>,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        align: TextAlign,
        motion: Motion,
    ) -> Self {
        Self::new(
            Vec2::new(x, y),
            motion,
            ShapeKind::Text(TextShape {
                text: text.into(),
                width,
                height,
                align,
            }),
        )
    }

    pub fn group(x: f32, y: f32, motion: Motion) -> Self {
        Self::new(Vec2::new(x, y), motion, ShapeKind::Group(GroupShape::new()))
    }

    pub fn with_brush(mut self, brush: BrushId) -> Self {
        self.brush = Some(brush);
        self
    }

    pub fn with_user_data(mut self, user_data: i64) -> Self {
        self.user_data = user_data;
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn parent(&self) -> Option<ShapeId> {
        self.parent
    }

    pub fn children(&self) -> &[ShapeId] {
        &self.children
    }
}
