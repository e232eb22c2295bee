//! Platform boundary
//!
//! Handles what the window layer hands the core:
//! - Input events (thread-safe queue) and per-tick input snapshots
//! - Timestamps and periodic timers

pub mod input;
pub mod timer;

pub use input::{EventQueue, InputSnapshot, InputState, KeyCode, MouseButton, WindowEvent};
pub use timer::TickDelta;
