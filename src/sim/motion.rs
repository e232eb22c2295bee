//! Speed/direction pair with a cached per-tick step vector
//!
//! Direction is held in radians, 0 = up, clockwise positive. The step vector
//! is `(sin d, -cos d) * speed` and is recomputed by every mutator so it is
//! never stale when a shape moves.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::{deg_to_rad, heading_of, heading_to_vec, normalize_angle, rad_to_deg};

/// Reflect a heading off a vertical boundary (left/right wall). Flips x.
pub fn bounce_x_angle(direction: f64) -> f64 {
    let d = normalize_angle(direction);
    if (FRAC_PI_2..3.0 * FRAC_PI_2).contains(&d) {
        normalize_angle(FRAC_PI_2 + 3.0 * FRAC_PI_2 - d)
    } else {
        normalize_angle(TAU - d)
    }
}

/// Reflect a heading off a horizontal boundary (top/bottom wall). Flips y.
pub fn bounce_y_angle(direction: f64) -> f64 {
    let d = normalize_angle(direction);
    if d <= PI {
        normalize_angle(PI - d)
    } else {
        normalize_angle(PI + TAU - d)
    }
}

/// Deflection applied when a circle glances off a point (a box corner).
///
/// `travel` is the heading of motion, `touch` the heading from the point
/// to the circle centre.
pub fn point_deflection(travel: f64, touch: f64) -> f64 {
    PI - (travel - touch) * 2.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "MotionRepr")]
pub struct Motion {
    direction: f64,
    speed: f32,
    #[serde(skip)]
    step: Vec2,
}

/// Serialized form; the step is rebuilt on load
#[derive(Deserialize)]
struct MotionRepr {
    direction: f64,
    speed: f32,
}

impl From<MotionRepr> for Motion {
    fn from(repr: MotionRepr) -> Self {
        Self::with_radians(repr.speed, repr.direction)
    }
}

impl Default for Motion {
    fn default() -> Self {
        Self::stationary()
    }
}

impl Motion {
    /// Motion with a heading in whole degrees
    pub fn new(speed: f32, direction_deg: i32) -> Self {
        Self::with_radians(speed, deg_to_rad(direction_deg as f64))
    }

    pub fn with_radians(speed: f32, direction: f64) -> Self {
        let mut m = Self {
            direction: 0.0,
            speed,
            step: Vec2::ZERO,
        };
        m.set_direction_rad(direction);
        m
    }

    pub fn stationary() -> Self {
        Self {
            direction: 0.0,
            speed: 0.0,
            step: Vec2::ZERO,
        }
    }

    #[inline]
    pub fn direction(&self) -> f64 {
        self.direction
    }

    /// Direction truncated to whole degrees
    pub fn direction_deg(&self) -> i32 {
        rad_to_deg(self.direction) as i32
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Displacement applied by one tick
    #[inline]
    pub fn step(&self) -> Vec2 {
        self.step
    }

    pub fn set_direction_deg(&mut self, direction_deg: i32) {
        self.set_direction_rad(deg_to_rad(direction_deg as f64));
    }

    pub fn set_direction_rad(&mut self, direction: f64) {
        self.direction = normalize_angle(direction);
        self.update_cache();
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
        self.update_cache();
    }

    /// Turn by `delta` radians (ball "english" effects)
    pub fn add_direction(&mut self, delta: f64) {
        self.set_direction_rad(self.direction + delta);
    }

    pub fn bounce_x(&mut self) {
        self.set_direction_rad(bounce_x_angle(self.direction));
    }

    pub fn bounce_y(&mut self) {
        self.set_direction_rad(bounce_y_angle(self.direction));
    }

    /// Glance off `point` while centred at `centre`
    pub fn bounce_off_point(&mut self, centre: Vec2, point: Vec2) {
        let travel = heading_of(self.step);
        let touch = heading_of(centre - point);
        self.add_direction(point_deflection(travel, touch));
    }

    fn update_cache(&mut self) {
        self.step = heading_to_vec(self.direction) * self.speed;
    }
}
