//! World registry
//!
//! Owns the shape arena, the live list (what gets updated, tested and drawn)
//! and the pending list. Shapes spawned during a tick wait in the pending
//! list until the frame driver flushes it, once per frame, after game logic
//! and before render.

use glam::Vec2;

use super::arena::ShapeArena;
use super::bounds::{BoundsHit, Rect};
use super::collision::{self, Contact, SweepConfig};
use super::shape::{Shape, ShapeId};
use crate::renderer::{Color, Resources, colors};
use crate::settings::WorldSettings;

/// Requests from game logic to whoever drives the frames
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Quit,
    SwitchScene(String),
}

#[derive(Debug)]
pub struct World {
    shapes: ShapeArena,
    live: Vec<ShapeId>,
    /// Spawned shapes with their requested active flag
    pending: Vec<(ShapeId, bool)>,
    resources: Resources,
    settings: WorldSettings,
    outbox: Vec<Notification>,
    tick: u64,
    background: Color,
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldSettings::default())
    }
}

impl World {
    pub fn new(settings: WorldSettings) -> Self {
        Self {
            shapes: ShapeArena::new(),
            live: Vec::new(),
            pending: Vec::new(),
            resources: Resources::new(),
            settings,
            outbox: Vec::new(),
            tick: 0,
            background: colors::BACKGROUND,
        }
    }

    pub fn settings(&self) -> &WorldSettings {
        &self.settings
    }

    pub fn shapes(&self) -> &ShapeArena {
        &self.shapes
    }

    pub fn shapes_mut(&mut self) -> &mut ShapeArena {
        &mut self.shapes
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut Resources {
        &mut self.resources
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    pub fn screen_rect(&self) -> Rect {
        self.settings.screen_rect()
    }

    pub fn sweep(&self) -> SweepConfig {
        self.settings.sweep()
    }

    /// Number of completed `update` calls
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    // === Insertion ===

    /// Queue a shape; it joins the live list at the next flush with the
    /// given active flag
    pub fn spawn(&mut self, shape: Shape, active: bool) -> ShapeId {
        let id = self.shapes.insert(shape.with_active(false));
        self.pending.push((id, active));
        log::debug!("Spawned {:?} (pending)", id);
        id
    }

    /// Put a shape straight into the live list. Meant for setup code that
    /// runs outside a tick.
    pub fn add_now(&mut self, shape: Shape) -> ShapeId {
        let id = self.shapes.insert(shape);
        self.live.push(id);
        log::debug!("Added {:?}", id);
        id
    }

    /// Create a shape directly inside `group`, positioned relative to it
    pub fn spawn_child(&mut self, group: ShapeId, shape: Shape) -> Option<ShapeId> {
        if !self.shapes.contains(group) {
            log::warn!("Cannot create a child under missing {:?}", group);
            return None;
        }
        let id = self.shapes.insert(shape);
        self.shapes.add_child(group, id).then_some(id)
    }

    /// Move every pending shape into the live list, returning how many
    pub fn flush_pending(&mut self) -> usize {
        let pending = std::mem::take(&mut self.pending);
        let count = pending.len();
        for (id, active) in pending {
            if self.shapes.set_active(id, active) {
                self.live.push(id);
            }
        }
        count
    }

    pub fn live(&self) -> &[ShapeId] {
        &self.live
    }

    /// Live shapes not attached to a group. Grouped shapes are moved, tested
    /// and drawn through their ancestor.
    pub fn live_roots(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.live
            .iter()
            .copied()
            .filter(|&id| self.shapes.parent(id).is_none())
    }

    pub fn is_live(&self, id: ShapeId) -> bool {
        self.live.contains(&id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    // === Per-tick ===

    /// Advance every active live shape by one step
    pub fn update(&mut self) {
        let roots: Vec<ShapeId> = self.live_roots().collect();
        for id in roots {
            if self.shapes.is_active(id) {
                self.shapes.advance(id);
            }
        }
        self.tick += 1;
    }

    /// Look-ahead check against the screen
    pub fn will_hit_screen(&self, id: ShapeId) -> BoundsHit {
        self.shapes.will_hit_bounds(id, &self.screen_rect())
    }

    /// Bounce circle `ball` off the first candidate it will touch this tick
    pub fn bounce_off_first(
        &mut self,
        ball: ShapeId,
        candidates: &[ShapeId],
    ) -> Option<(ShapeId, Contact)> {
        let config = self.sweep();
        collision::bounce_off_first(&mut self.shapes, ball, candidates, &config)
    }

    pub fn will_bounce_off_rect_sides(&mut self, ball: ShapeId, target: ShapeId) -> bool {
        let config = self.sweep();
        collision::will_bounce_off_rect_sides(&mut self.shapes, ball, target, &config)
    }

    pub fn will_bounce_off_rect_corners(&mut self, ball: ShapeId, target: ShapeId) -> bool {
        let config = self.sweep();
        collision::will_bounce_off_rect_corners(&mut self.shapes, ball, target, &config)
    }

    /// First other active live shape overlapping `shape`
    pub fn live_hit_test(&self, shape: ShapeId) -> Option<ShapeId> {
        self.live_roots()
            .filter(|&id| id != shape && self.shapes.is_active(id))
            .find(|&id| self.shapes.hit_test_shape(id, shape))
    }

    /// Live shapes whose box contains `point`, topmost (last drawn) first
    pub fn shapes_at(&self, point: Vec2) -> Vec<ShapeId> {
        let mut hits: Vec<ShapeId> = self
            .live_roots()
            .filter(|&id| self.shapes.is_active(id) && self.shapes.hit_test_point(id, point))
            .collect();
        hits.reverse();
        hits
    }

    // === Removal ===

    /// Take a shape out of the live and pending lists. With `dispose` its
    /// subtree is destroyed, otherwise it stays in the arena for reuse.
    pub fn remove(&mut self, id: ShapeId, dispose: bool) -> bool {
        let before = self.live.len() + self.pending.len();
        self.live.retain(|&l| l != id);
        self.pending.retain(|&(p, _)| p != id);
        let listed = self.live.len() + self.pending.len() != before;
        let disposed = dispose && self.shapes.remove(id).is_some();
        if listed || disposed {
            log::debug!("Removed {:?} (dispose: {})", id, dispose);
        }
        listed || disposed
    }

    pub fn remove_all(&mut self, dispose: bool) {
        let ids: Vec<ShapeId> = self
            .live
            .drain(..)
            .chain(self.pending.drain(..).map(|(id, _)| id))
            .collect();
        if dispose {
            for id in &ids {
                self.shapes.remove(*id);
            }
        }
        log::info!("Cleared {} shapes from the world", ids.len());
    }

    /// Move a live shape into `group`. Its current effective position is
    /// kept.
    pub fn adopt(&mut self, group: ShapeId, id: ShapeId) -> bool {
        let Some(world_pos) = self.shapes.pos(id) else {
            return false;
        };
        if !self.shapes.add_child(group, id) {
            return false;
        }
        self.live.retain(|&l| l != id);
        self.pending.retain(|&(p, _)| p != id);
        self.shapes.set_world_pos(id, world_pos);
        true
    }

    /// Remove every live shape that will leave `bounds` next tick
    pub fn cull_leaving(&mut self, bounds: &Rect, dispose: bool) -> Vec<ShapeId> {
        let leaving: Vec<ShapeId> = self
            .live_roots()
            .filter(|&id| !self.shapes.will_hit_bounds(id, bounds).is_ok())
            .collect();
        for &id in &leaving {
            self.remove(id, dispose);
        }
        if !leaving.is_empty() {
            log::debug!("Culled {:?}", leaving);
        }
        leaving
    }

    // === Notifications ===

    pub fn notify(&mut self, notification: Notification) {
        self.outbox.push(notification);
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.outbox)
    }
}
