//! Input events and per-tick input snapshots
//!
//! A window thread pushes events into an [`EventQueue`]; the tick thread
//! drains it once per frame and folds the events into an [`InputSnapshot`]
//! that game logic reads instead of polling the OS.

use std::collections::{BTreeSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Virtual key code as delivered by the window layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct KeyCode(pub u32);

impl KeyCode {
    pub const ENTER: KeyCode = KeyCode(0x0d);
    pub const ESCAPE: KeyCode = KeyCode(0x1b);
    pub const SPACE: KeyCode = KeyCode(0x20);
    pub const LEFT: KeyCode = KeyCode(0x25);
    pub const UP: KeyCode = KeyCode(0x26);
    pub const RIGHT: KeyCode = KeyCode(0x27);
    pub const DOWN: KeyCode = KeyCode(0x28);

    /// Letter and digit keys use their uppercase ASCII code
    pub fn from_char(c: char) -> KeyCode {
        KeyCode(c.to_ascii_uppercase() as u32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowEvent {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    MouseDown(MouseButton),
    MouseUp(MouseButton),
}

/// Queue shared between the window thread and the tick.
///
/// Every push and every drain takes the lock.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    inner: Arc<Mutex<VecDeque<WindowEvent>>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<WindowEvent>> {
        // A panicking producer leaves plain data behind; keep using it
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn push(&self, event: WindowEvent) {
        self.lock().push_back(event);
    }

    /// Take every queued event, oldest first
    pub fn drain(&self) -> Vec<WindowEvent> {
        self.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Everything game logic may know about input for one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    /// Timestamp of the tick
    pub tick_ms: u64,
    /// Mouse position in world coordinates
    pub mouse: Vec2,
    pub keys_down: BTreeSet<KeyCode>,
    pub keys_pressed: BTreeSet<KeyCode>,
    pub keys_released: BTreeSet<KeyCode>,
    pub buttons_down: BTreeSet<MouseButton>,
    pub buttons_pressed: BTreeSet<MouseButton>,
    /// Raw events in arrival order
    pub events: Vec<WindowEvent>,
}

impl InputSnapshot {
    pub fn is_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Went down during this tick
    pub fn was_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn was_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    pub fn was_clicked(&self, button: MouseButton) -> bool {
        self.buttons_pressed.contains(&button)
    }
}

/// Held-key state carried across ticks
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys: BTreeSet<KeyCode>,
    buttons: BTreeSet<MouseButton>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one tick's events into a snapshot.
    ///
    /// Auto-repeat key downs for a key already held are not new presses.
    pub fn snapshot(
        &mut self,
        tick_ms: u64,
        mouse: Vec2,
        events: Vec<WindowEvent>,
    ) -> InputSnapshot {
        let mut snap = InputSnapshot {
            tick_ms,
            mouse,
            ..Default::default()
        };
        for event in &events {
            match *event {
                WindowEvent::KeyDown(k) => {
                    if self.keys.insert(k) {
                        snap.keys_pressed.insert(k);
                    }
                }
                WindowEvent::KeyUp(k) => {
                    if self.keys.remove(&k) {
                        snap.keys_released.insert(k);
                    }
                }
                WindowEvent::MouseDown(b) => {
                    if self.buttons.insert(b) {
                        snap.buttons_pressed.insert(b);
                    }
                }
                WindowEvent::MouseUp(b) => {
                    self.buttons.remove(&b);
                }
            }
        }
        snap.keys_down = self.keys.clone();
        snap.buttons_down = self.buttons.clone();
        snap.events = events;
        snap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_drains_in_order() {
        let q = EventQueue::new();
        q.push(WindowEvent::KeyDown(KeyCode::LEFT));
        q.push(WindowEvent::MouseDown(MouseButton::Left));
        assert_eq!(q.len(), 2);
        assert_eq!(
            q.drain(),
            vec![
                WindowEvent::KeyDown(KeyCode::LEFT),
                WindowEvent::MouseDown(MouseButton::Left)
            ]
        );
        assert!(q.is_empty());
    }

    #[test]
    fn test_queue_shared_across_threads() {
        let q = EventQueue::new();
        let producer = q.clone();
        let handle = std::thread::spawn(move || {
            for i in 0..100 {
                producer.push(WindowEvent::KeyDown(KeyCode(i)));
            }
        });
        let mut seen = Vec::new();
        while seen.len() < 100 {
            seen.extend(q.drain());
            std::thread::yield_now();
        }
        handle.join().unwrap();
        assert_eq!(seen.len(), 100);
        assert_eq!(seen[99], WindowEvent::KeyDown(KeyCode(99)));
    }

    #[test]
    fn test_snapshot_tracks_held_and_pressed() {
        let mut state = InputState::new();
        let snap = state.snapshot(
            20,
            Vec2::new(5.0, 6.0),
            vec![
                WindowEvent::KeyDown(KeyCode::SPACE),
                WindowEvent::KeyDown(KeyCode::from_char('a')),
            ],
        );
        assert!(snap.was_pressed(KeyCode::SPACE));
        assert!(snap.is_down(KeyCode(b'A' as u32)));
        assert_eq!(snap.mouse, Vec2::new(5.0, 6.0));

        // Held across ticks, auto-repeat is not a new press
        let snap = state.snapshot(40, Vec2::ZERO, vec![WindowEvent::KeyDown(KeyCode::SPACE)]);
        assert!(snap.is_down(KeyCode::SPACE));
        assert!(!snap.was_pressed(KeyCode::SPACE));

        let snap = state.snapshot(60, Vec2::ZERO, vec![WindowEvent::KeyUp(KeyCode::SPACE)]);
        assert!(!snap.is_down(KeyCode::SPACE));
        assert!(snap.was_released(KeyCode::SPACE));
        assert!(snap.is_down(KeyCode::from_char('A')));
    }

    #[test]
    fn test_mouse_buttons() {
        let mut state = InputState::new();
        let snap = state.snapshot(0, Vec2::ZERO, vec![WindowEvent::MouseDown(MouseButton::Left)]);
        assert!(snap.was_clicked(MouseButton::Left));
        assert!(snap.is_button_down(MouseButton::Left));
        let snap = state.snapshot(0, Vec2::ZERO, vec![WindowEvent::MouseUp(MouseButton::Left)]);
        assert!(!snap.is_button_down(MouseButton::Left));
        assert!(!snap.was_clicked(MouseButton::Left));
    }
}
