//! Shape, movement and collision core
//!
//! Everything here is single-threaded and deterministic for a given input
//! sequence:
//! - Shapes live in an arena and refer to each other by id
//! - Iteration follows insertion order (live list) or id order (arena)
//! - No rendering or platform calls; those go through traits

pub mod arena;
pub mod bounds;
pub mod collision;
pub mod motion;
pub mod shape;
pub mod tick;
pub mod world;

pub use arena::ShapeArena;
pub use bounds::{BoundsHit, Rect, classify};
pub use collision::{Contact, SweepConfig, SweepHit};
pub use motion::{Motion, bounce_x_angle, bounce_y_angle, point_deflection};
pub use shape::{
    BitmapShape, BoundsProvider, CircleShape, GroupShape, RectangleShape, Shape, ShapeId,
    ShapeKind, TextAlign, TextShape,
};
pub use tick::{FrameRunner, Scene};
pub use world::{Notification, World};
