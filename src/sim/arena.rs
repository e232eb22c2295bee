//! Shape storage and hierarchy
//!
//! Shapes are owned by the arena and addressed by [`ShapeId`]. A child keeps
//! its parent's id (never a pointer) and parents keep an ordered id list of
//! children, so there are no ownership cycles. Ids are never reused, which
//! makes a stale id simply "absent".

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bounds::{BoundsHit, Rect, classify};
use super::motion::Motion;
use super::shape::{Shape, ShapeId, ShapeKind};
use crate::renderer::BrushId;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShapeArena {
    shapes: BTreeMap<ShapeId, Shape>,
    next_id: u32,
}

impl ShapeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a detached shape
    pub fn insert(&mut self, mut shape: Shape) -> ShapeId {
        let id = ShapeId(self.next_id);
        self.next_id += 1;
        shape.parent = None;
        shape.children.clear();
        if let ShapeKind::Group(g) = &shape.kind {
            g.invalidate();
        }
        self.shapes.insert(id, shape);
        id
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.contains_key(&id)
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.shapes.keys().copied()
    }

    pub fn children(&self, id: ShapeId) -> &[ShapeId] {
        self.shapes.get(&id).map(|s| s.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent(&self, id: ShapeId) -> Option<ShapeId> {
        self.shapes.get(&id).and_then(|s| s.parent)
    }

    pub fn is_active(&self, id: ShapeId) -> bool {
        self.shapes.get(&id).is_some_and(|s| s.active)
    }

    /// Motion can be changed freely: it never affects bounds
    pub fn motion_mut(&mut self, id: ShapeId) -> Option<&mut Motion> {
        self.shapes.get_mut(&id).map(|s| &mut s.motion)
    }

    pub fn motion(&self, id: ShapeId) -> Option<&Motion> {
        self.shapes.get(&id).map(|s| &s.motion)
    }

    /// Apply an arbitrary edit, then treat the shape as structurally changed
    pub fn modify<F: FnOnce(&mut Shape)>(&mut self, id: ShapeId, f: F) -> bool {
        let Some(shape) = self.shapes.get_mut(&id) else {
            return false;
        };
        f(shape);
        if let ShapeKind::Group(g) = &shape.kind {
            g.invalidate();
        }
        self.invalidate_ancestors(id);
        true
    }

    pub fn set_active(&mut self, id: ShapeId, active: bool) -> bool {
        self.modify(id, |s| s.active = active)
    }

    pub fn set_user_data(&mut self, id: ShapeId, user_data: i64) -> bool {
        self.modify(id, |s| s.user_data = user_data)
    }

    pub fn set_brush(&mut self, id: ShapeId, brush: Option<BrushId>) -> bool {
        self.modify(id, |s| s.brush = brush)
    }

    /// Resize a rectangle, bitmap or text shape
    pub fn set_size(&mut self, id: ShapeId, width: f32, height: f32) -> bool {
        let mut resized = false;
        self.modify(id, |s| match &mut s.kind {
            ShapeKind::Rectangle(r) => {
                (r.width, r.height) = (width, height);
                resized = true;
            }
            ShapeKind::Bitmap(b) => {
                (b.width, b.height) = (width, height);
                resized = true;
            }
            ShapeKind::Text(t) => {
                (t.width, t.height) = (width, height);
                resized = true;
            }
            ShapeKind::Circle(_) | ShapeKind::Group(_) => {}
        });
        resized
    }

    pub fn set_radius(&mut self, id: ShapeId, radius: f32) -> bool {
        let mut resized = false;
        self.modify(id, |s| {
            if let ShapeKind::Circle(c) = &mut s.kind {
                c.radius = radius;
                resized = true;
            }
        });
        resized
    }

    pub fn set_text(&mut self, id: ShapeId, text: impl Into<String>) -> bool {
        let text = text.into();
        match self.shapes.get_mut(&id).map(|s| &mut s.kind) {
            Some(ShapeKind::Text(t)) => {
                t.text = text;
                true
            }
            _ => false,
        }
    }

    // === Position ===

    /// Position relative to the parent
    pub fn local_pos(&self, id: ShapeId) -> Option<Vec2> {
        self.shapes.get(&id).map(|s| s.pos)
    }

    /// Effective position: local position plus every ancestor's
    pub fn pos(&self, id: ShapeId) -> Option<Vec2> {
        let mut shape = self.shapes.get(&id)?;
        let mut pos = shape.pos;
        while let Some(parent) = shape.parent.and_then(|p| self.shapes.get(&p)) {
            pos += parent.pos;
            shape = parent;
        }
        Some(pos)
    }

    pub fn set_pos(&mut self, id: ShapeId, pos: Vec2) -> bool {
        self.modify(id, |s| s.pos = pos)
    }

    pub fn offset_pos(&mut self, id: ShapeId, by: Vec2) -> bool {
        self.modify(id, |s| s.pos += by)
    }

    /// Place a shape at an effective position, converting to parent space
    pub fn set_world_pos(&mut self, id: ShapeId, pos: Vec2) -> bool {
        let origin = self.parent(id).and_then(|p| self.pos(p)).unwrap_or(Vec2::ZERO);
        self.set_pos(id, pos - origin)
    }

    /// Where `pos` would be after one tick, or after travelling `len` along
    /// the current heading. Ancestors contribute their own displacement for
    /// the same `len`. Nothing is mutated.
    pub fn move_pos(&self, id: ShapeId, mut pos: Vec2, len: Option<f32>) -> Vec2 {
        let mut current = Some(id);
        while let Some(shape) = current.and_then(|c| self.shapes.get(&c)) {
            let step = shape.motion.step();
            match len {
                Some(len) => {
                    let step_len = step.length();
                    if step_len > 0.0 {
                        pos += step * (len / step_len);
                    }
                }
                None => pos += step,
            }
            current = shape.parent;
        }
        pos
    }

    /// Commit one tick of movement to a shape and all its descendants
    pub fn advance(&mut self, id: ShapeId) {
        let Some(shape) = self.shapes.get_mut(&id) else {
            return;
        };
        let step = shape.motion.step();
        shape.pos += step;
        let children = shape.children.clone();
        if step != Vec2::ZERO {
            self.invalidate_ancestors(id);
        }
        for child in children {
            self.advance(child);
        }
    }

    // === Bounds ===

    /// Bounds the shape would have at effective position `pos`
    pub fn bounds_at(&self, id: ShapeId, pos: Vec2) -> Option<Rect> {
        let shape = self.shapes.get(&id)?;
        match &shape.kind {
            ShapeKind::Group(_) => self.group_local_bounds(id).map(|r| r.offset(pos)),
            kind => kind.leaf_bounds_at(pos),
        }
    }

    /// Bounds at the shape's current effective position
    pub fn bounds(&self, id: ShapeId) -> Option<Rect> {
        self.bounds_at(id, self.pos(id)?)
    }

    /// Union of a group's child boxes relative to the group origin.
    /// `None` for empty groups and non-groups.
    pub fn group_local_bounds(&self, id: ShapeId) -> Option<Rect> {
        let shape = self.shapes.get(&id)?;
        let ShapeKind::Group(group) = &shape.kind else {
            return None;
        };
        if let Some(cached) = group.bounds_cache.get() {
            return Some(cached);
        }
        let union = shape
            .children
            .iter()
            .filter_map(|&c| self.bounds_at(c, self.local_pos(c)?))
            .reduce(|acc, r| acc.union(&r));
        group.bounds_cache.set(union);
        union
    }

    fn invalidate_ancestors(&self, id: ShapeId) {
        let mut current = self.parent(id);
        while let Some(pid) = current {
            let Some(parent) = self.shapes.get(&pid) else {
                break;
            };
            if let ShapeKind::Group(g) = &parent.kind {
                g.invalidate();
            }
            current = parent.parent;
        }
    }

    /// Look-ahead edge check against `bounds`.
    ///
    /// The shape's own box is checked first, then each child in order; the
    /// first non-`Ok` result wins.
    pub fn will_hit_bounds(&self, id: ShapeId, bounds: &Rect) -> BoundsHit {
        let Some(pos) = self.pos(id) else {
            return BoundsHit::Ok;
        };
        let next = self.move_pos(id, pos, None);
        if let Some(r) = self.bounds_at(id, next) {
            let hit = classify(&r, bounds);
            if !hit.is_ok() {
                return hit;
            }
        }
        self.children(id)
            .iter()
            .map(|&c| self.will_hit_bounds(c, bounds))
            .find(|hit| !hit.is_ok())
            .unwrap_or(BoundsHit::Ok)
    }

    // === Hit testing ===

    pub fn hit_test_point(&self, id: ShapeId, p: Vec2) -> bool {
        let Some(shape) = self.shapes.get(&id) else {
            return false;
        };
        if let ShapeKind::Circle(c) = &shape.kind {
            return self
                .pos(id)
                .is_some_and(|centre| centre.distance_squared(p) <= c.radius * c.radius);
        }
        self.bounds(id).is_some_and(|r| r.contains_point(p))
    }

    pub fn hit_test_rect(&self, id: ShapeId, rect: &Rect) -> bool {
        self.bounds(id).is_some_and(|r| r.intersects(rect))
    }

    pub fn hit_test_shape(&self, a: ShapeId, b: ShapeId) -> bool {
        match self.bounds(b) {
            Some(rb) => self.hit_test_rect(a, &rb),
            None => false,
        }
    }

    /// Centre distance test for two circles
    pub fn circles_overlap(&self, a: ShapeId, b: ShapeId) -> bool {
        let radius = |id: ShapeId| self.get(id).and_then(|s| s.kind.radius());
        match (radius(a), radius(b), self.pos(a), self.pos(b)) {
            (Some(ra), Some(rb), Some(pa), Some(pb)) => {
                pa.distance_squared(pb) <= (ra + rb) * (ra + rb)
            }
            _ => false,
        }
    }

    /// First active child of `group` overlapping `shape`
    pub fn group_hit_test_shape(&self, group: ShapeId, shape: ShapeId) -> Option<ShapeId> {
        let other = self.group_prefilter(group, shape)?;
        self.children(group)
            .iter()
            .copied()
            .find(|&c| self.is_active(c) && self.hit_test_rect(c, &other))
    }

    /// Every active child of `group` overlapping `shape`
    pub fn group_hit_test_shapes(&self, group: ShapeId, shape: ShapeId) -> Vec<ShapeId> {
        let Some(other) = self.group_prefilter(group, shape) else {
            return Vec::new();
        };
        self.children(group)
            .iter()
            .copied()
            .filter(|&c| self.is_active(c) && self.hit_test_rect(c, &other))
            .collect()
    }

    /// Active children of `group` that will overlap `shape` after one tick
    /// of both
    pub fn group_will_hit_shapes(&self, group: ShapeId, shape: ShapeId) -> Vec<ShapeId> {
        let next_box = |id: ShapeId| -> Option<Rect> {
            let pos = self.pos(id)?;
            self.bounds_at(id, self.move_pos(id, pos, None))
        };
        let (Some(group_box), Some(other)) = (next_box(group), next_box(shape)) else {
            return Vec::new();
        };
        if !group_box.intersects(&other) {
            return Vec::new();
        }
        self.children(group)
            .iter()
            .copied()
            .filter(|&c| self.is_active(c) && next_box(c).is_some_and(|r| r.intersects(&other)))
            .collect()
    }

    fn group_prefilter(&self, group: ShapeId, shape: ShapeId) -> Option<Rect> {
        let other = self.bounds(shape)?;
        self.bounds(group)?.intersects(&other).then_some(other)
    }

    // === Hierarchy ===

    fn is_ancestor(&self, candidate: ShapeId, of: ShapeId) -> bool {
        let mut current = Some(of);
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    fn attach(&mut self, parent: ShapeId, child: ShapeId, at_front: bool) -> bool {
        if !self.contains(parent) || !self.contains(child) || self.is_ancestor(child, parent) {
            log::warn!("Rejected attaching {:?} under {:?}", child, parent);
            return false;
        }
        self.unlink(child);
        if let Some(p) = self.shapes.get_mut(&parent) {
            if at_front {
                p.children.insert(0, child);
            } else {
                p.children.push(child);
            }
        }
        if let Some(c) = self.shapes.get_mut(&child) {
            c.parent = Some(parent);
        }
        self.invalidate_ancestors(child);
        true
    }

    /// Append `child`; its position is taken as relative to `parent`
    pub fn add_child(&mut self, parent: ShapeId, child: ShapeId) -> bool {
        self.attach(parent, child, false)
    }

    /// Prepend `child` (drawn and tested first)
    pub fn insert_child(&mut self, parent: ShapeId, child: ShapeId) -> bool {
        self.attach(parent, child, true)
    }

    /// Drop the parent link without touching position
    fn unlink(&mut self, child: ShapeId) {
        self.invalidate_ancestors(child);
        let Some(parent) = self.shapes.get_mut(&child).and_then(|c| c.parent.take()) else {
            return;
        };
        if let Some(p) = self.shapes.get_mut(&parent) {
            p.children.retain(|&c| c != child);
        }
    }

    /// Detach `child` from `parent`.
    ///
    /// With `dispose` the child's subtree is destroyed. Otherwise the child
    /// keeps its effective position and its active flag.
    pub fn remove_child(&mut self, parent: ShapeId, child: ShapeId, dispose: bool) -> bool {
        if self.parent(child) != Some(parent) {
            log::warn!("{:?} is not a child of {:?}", child, parent);
            return false;
        }
        if dispose {
            return self.remove(child).is_some();
        }
        let world = self.pos(child);
        self.unlink(child);
        if let (Some(world), Some(c)) = (world, self.shapes.get_mut(&child)) {
            c.pos = world;
        }
        true
    }

    pub fn remove_all_children(&mut self, parent: ShapeId, dispose: bool) {
        for child in self.children(parent).to_vec() {
            self.remove_child(parent, child, dispose);
        }
    }

    /// Destroy a shape and its whole subtree, returning the root
    pub fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        self.unlink(id);
        let mut shape = self.shapes.remove(&id)?;
        let mut stack = std::mem::take(&mut shape.children);
        while let Some(next) = stack.pop() {
            if let Some(child) = self.shapes.remove(&next) {
                stack.extend(child.children);
            }
        }
        Some(shape)
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }
}
