//! ss2d - shape, movement and collision core for small 2D arcade games
//!
//! Core modules:
//! - `sim`: Shapes, hierarchy, collision sweeps, world registry and frame driver
//! - `renderer`: Drawing seam (canvas trait, resource registry)
//! - `platform`: Input queue/snapshot and tick timers
//! - `settings`: World configuration

pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{SettingsError, WorldSettings};

use glam::Vec2;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Engine configuration constants
pub mod consts {
    /// Logical screen size used when no settings are supplied
    pub const DEFAULT_SCREEN_WIDTH: f32 = 1920.0;
    pub const DEFAULT_SCREEN_HEIGHT: f32 = 1080.0;

    /// Fixed tick period (50 Hz)
    pub const DEFAULT_TICK_PERIOD_MS: u64 = 20;

    /// Arc length between samples of a circle sweep
    pub const DEFAULT_SWEEP_STEP: f32 = 1.0;
    /// Subtracted from r² in the corner test so side hits are not counted twice
    pub const DEFAULT_CORNER_EPSILON: f32 = 0.1;
}

/// Normalize angle to [0, 2π)
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if a >= TAU { 0.0 } else { a }
}

#[inline]
pub fn deg_to_rad(deg: f64) -> f64 {
    deg / 180.0 * PI
}

#[inline]
pub fn rad_to_deg(rad: f64) -> f64 {
    rad / PI * 180.0
}

/// Unit step for a heading (0 = up, clockwise positive, y grows downward)
#[inline]
pub fn heading_to_vec(direction: f64) -> Vec2 {
    Vec2::new(direction.sin() as f32, -direction.cos() as f32)
}

/// Heading a vector points along, in the same convention as [`heading_to_vec`].
///
/// Horizontal vectors are special-cased so left/right come out exact.
pub fn heading_of(v: Vec2) -> f64 {
    if v.y == 0.0 {
        return if v.x > 0.0 { FRAC_PI_2 } else { 3.0 * FRAC_PI_2 };
    }
    normalize_angle(FRAC_PI_2 + (v.y as f64).atan2(v.x as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(-FRAC_PI_2) - 3.0 * FRAC_PI_2).abs() < 1e-12);
        assert!((normalize_angle(TAU + 1.0) - 1.0).abs() < 1e-12);
        assert_eq!(normalize_angle(TAU), 0.0);
    }

    #[test]
    fn test_heading_round_trip() {
        for deg in [0.0, 45.0, 90.0, 135.0, 180.0, 270.0, 300.0] {
            let d = deg_to_rad(deg);
            let back = heading_of(heading_to_vec(d));
            let diff = (back - d).abs();
            assert!(diff < 1e-5 || (TAU - diff) < 1e-5, "deg {deg} -> {back}");
        }
    }

    #[test]
    fn test_heading_of_horizontal() {
        assert_eq!(heading_of(Vec2::new(3.0, 0.0)), FRAC_PI_2);
        assert_eq!(heading_of(Vec2::new(-3.0, 0.0)), 3.0 * FRAC_PI_2);
    }
}
