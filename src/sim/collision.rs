//! Circle-vs-rectangle collision sweeps and bounce response
//!
//! A fast ball can cover more than a thin brick in one tick. Instead of
//! testing only the next-tick position, the path from the current to the
//! next position is sampled every `step` units of arc length and the first
//! sample touching the target decides the bounce.
//!
//! Flat faces take priority over corners: the side sweep runs for every
//! candidate before any corner sweep does.

use glam::Vec2;

use super::arena::ShapeArena;
use super::bounds::Rect;
use super::shape::ShapeId;
use crate::consts::{DEFAULT_CORNER_EPSILON, DEFAULT_SWEEP_STEP};

/// Tunables for the sweeps
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepConfig {
    /// Arc length between samples
    pub step: f32,
    /// Subtracted from r² in the corner test
    pub corner_epsilon: f32,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            step: DEFAULT_SWEEP_STEP,
            corner_epsilon: DEFAULT_CORNER_EPSILON,
        }
    }
}

/// What the circle touched
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    /// Left or right face: reflect horizontally
    SideX,
    /// Top or bottom face: reflect vertically
    SideY,
    /// A box corner
    Corner(Vec2),
}

/// First touching sample of a sweep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepHit {
    /// Circle centre at the touching sample
    pub pos: Vec2,
    pub contact: Contact,
}

/// Sample points from `start` (exclusive) to `end` (inclusive), `step` apart.
/// A stationary path yields nothing.
pub fn sweep_samples(start: Vec2, end: Vec2, step: f32) -> impl Iterator<Item = Vec2> {
    let travel = end - start;
    let total = travel.length();
    let step = if step > 0.0 { step } else { DEFAULT_SWEEP_STEP };
    let mut len = 0.0f32;
    std::iter::from_fn(move || {
        if total <= 0.0 || len >= total {
            return None;
        }
        len = (len + step).min(total);
        Some(start + travel * (len / total))
    })
}

/// Cheap reject: does the box swept by the circle reach `r` at all
fn path_reaches(start: Vec2, end: Vec2, radius: f32, r: &Rect) -> bool {
    let min = start.min(end);
    let max = start.max(end);
    Rect::new(min.x, min.y, max.x, max.y)
        .inflate(radius)
        .intersects(r)
}

/// Face zone test for a single sample.
///
/// A side zone is the strip beyond a face, bounded by that face's extent.
/// The centre must lie in the strip with the circle edge reaching the face.
pub fn side_contact(r: &Rect, centre: Vec2, radius: f32) -> Option<Contact> {
    if centre.y >= r.top && centre.y <= r.bottom {
        let right = centre.x >= r.right && centre.x - radius <= r.right;
        let left = centre.x <= r.left && centre.x + radius >= r.left;
        if right || left {
            return Some(Contact::SideX);
        }
    }
    if centre.x >= r.left && centre.x <= r.right {
        let bottom = centre.y >= r.bottom && centre.y - radius <= r.bottom;
        let top = centre.y <= r.top && centre.y + radius >= r.top;
        if bottom || top {
            return Some(Contact::SideY);
        }
    }
    None
}

pub fn corner_contact(r: &Rect, centre: Vec2, radius: f32, epsilon: f32) -> Option<Contact> {
    let limit = radius * radius - epsilon;
    r.corners()
        .into_iter()
        .find(|corner| centre.distance_squared(*corner) < limit)
        .map(Contact::Corner)
}

/// Sweep a circle moving `start -> end` against the faces of `r`
pub fn sweep_sides(start: Vec2, end: Vec2, radius: f32, r: &Rect, step: f32) -> Option<SweepHit> {
    if !path_reaches(start, end, radius, r) {
        return None;
    }
    sweep_samples(start, end, step).find_map(|pos| {
        side_contact(r, pos, radius).map(|contact| SweepHit { pos, contact })
    })
}

/// Sweep a circle moving `start -> end` against the corners of `r`
pub fn sweep_corners(
    start: Vec2,
    end: Vec2,
    radius: f32,
    r: &Rect,
    config: &SweepConfig,
) -> Option<SweepHit> {
    if !path_reaches(start, end, radius, r) {
        return None;
    }
    sweep_samples(start, end, config.step).find_map(|pos| {
        corner_contact(r, pos, radius, config.corner_epsilon)
            .map(|contact| SweepHit { pos, contact })
    })
}

/// Path and radius of a circle shape plus the target's look-ahead box
fn sweep_inputs(
    shapes: &ShapeArena,
    ball: ShapeId,
    target: ShapeId,
) -> Option<(Vec2, Vec2, f32, Rect)> {
    let radius = shapes.get(ball)?.kind.radius()?;
    let target_pos = shapes.pos(target)?;
    let target_box = shapes.bounds_at(target, shapes.move_pos(target, target_pos, None))?;
    let start = shapes.pos(ball)?;
    let end = shapes.move_pos(ball, start, None);
    Some((start, end, radius, target_box))
}

pub fn probe_rect_sides(
    shapes: &ShapeArena,
    ball: ShapeId,
    target: ShapeId,
    config: &SweepConfig,
) -> Option<SweepHit> {
    let (start, end, radius, r) = sweep_inputs(shapes, ball, target)?;
    sweep_sides(start, end, radius, &r, config.step)
}

pub fn probe_rect_corners(
    shapes: &ShapeArena,
    ball: ShapeId,
    target: ShapeId,
    config: &SweepConfig,
) -> Option<SweepHit> {
    let (start, end, radius, r) = sweep_inputs(shapes, ball, target)?;
    sweep_corners(start, end, radius, &r, config)
}

/// Snap the ball to the touching sample and reflect its heading
pub fn apply_hit(shapes: &mut ShapeArena, ball: ShapeId, hit: &SweepHit) {
    shapes.set_world_pos(ball, hit.pos);
    let Some(motion) = shapes.motion_mut(ball) else {
        return;
    };
    match hit.contact {
        Contact::SideX => motion.bounce_x(),
        Contact::SideY => motion.bounce_y(),
        Contact::Corner(corner) => motion.bounce_off_point(hit.pos, corner),
    }
    log::debug!("{:?} bounced ({:?}) at {:?}", ball, hit.contact, hit.pos);
}

/// Side sweep of circle `ball` against `target`'s box; bounces on contact.
/// Returns false for non-circle balls.
pub fn will_bounce_off_rect_sides(
    shapes: &mut ShapeArena,
    ball: ShapeId,
    target: ShapeId,
    config: &SweepConfig,
) -> bool {
    match probe_rect_sides(shapes, ball, target, config) {
        Some(hit) => {
            apply_hit(shapes, ball, &hit);
            true
        }
        None => false,
    }
}

/// Corner sweep of circle `ball` against `target`'s box; deflects on contact
pub fn will_bounce_off_rect_corners(
    shapes: &mut ShapeArena,
    ball: ShapeId,
    target: ShapeId,
    config: &SweepConfig,
) -> bool {
    match probe_rect_corners(shapes, ball, target, config) {
        Some(hit) => {
            apply_hit(shapes, ball, &hit);
            true
        }
        None => false,
    }
}

/// Bounce `ball` off the first of `candidates` it touches.
///
/// Every candidate's faces are tried, in order, before any corner is.
pub fn bounce_off_first(
    shapes: &mut ShapeArena,
    ball: ShapeId,
    candidates: &[ShapeId],
    config: &SweepConfig,
) -> Option<(ShapeId, Contact)> {
    let sides = candidates
        .iter()
        .find_map(|&c| probe_rect_sides(shapes, ball, c, config).map(|hit| (c, hit)));
    let found = sides.or_else(|| {
        candidates
            .iter()
            .find_map(|&c| probe_rect_corners(shapes, ball, c, config).map(|hit| (c, hit)))
    });
    let (target, hit) = found?;
    apply_hit(shapes, ball, &hit);
    Some((target, hit.contact))
}
