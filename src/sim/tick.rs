//! Fixed-period frame driver
//!
//! One frame runs strictly in this order:
//! 1. drain the input queue into an [`InputSnapshot`]
//! 2. let the scene run its logic
//! 3. flush shapes spawned during the logic step
//! 4. realize pending resources and render
//!
//! Nothing else mutates the world between those steps.

use glam::Vec2;

use super::world::{Notification, World};
use crate::platform::{EventQueue, InputSnapshot, InputState, TickDelta};
use crate::renderer::{self, Canvas, ResourceLoader};

/// Game logic for one screen (menu, level, ...)
pub trait Scene {
    /// One tick of logic. Shapes spawned here appear from the next tick.
    fn update(&mut self, world: &mut World, input: &InputSnapshot);
}

impl<F: FnMut(&mut World, &InputSnapshot)> Scene for F {
    fn update(&mut self, world: &mut World, input: &InputSnapshot) {
        self(world, input)
    }
}

/// Drives frames at the world's tick period
#[derive(Debug)]
pub struct FrameRunner {
    input: InputState,
    events: EventQueue,
    timer: TickDelta,
    frames: u64,
}

impl FrameRunner {
    pub fn new(period_ms: u64, now_ms: u64) -> Self {
        Self {
            input: InputState::new(),
            events: EventQueue::new(),
            timer: TickDelta::new(period_ms, now_ms),
            frames: 0,
        }
    }

    pub fn for_world(world: &World, now_ms: u64) -> Self {
        Self::new(world.settings().tick_period_ms, now_ms)
    }

    /// Handle for the window thread to push events into
    pub fn events(&self) -> EventQueue {
        self.events.clone()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one frame unconditionally
    pub fn run_frame<B: Canvas + ResourceLoader>(
        &mut self,
        world: &mut World,
        scene: &mut dyn Scene,
        now_ms: u64,
        mouse: Vec2,
        backend: &mut B,
    ) -> Vec<Notification> {
        let snapshot = self.input.snapshot(now_ms, mouse, self.events.drain());
        scene.update(world, &snapshot);
        world.flush_pending();
        let realized = world.resources_mut().realize(&mut *backend);
        if realized > 0 {
            log::debug!("Realized {} resources", realized);
        }
        renderer::render(world, &mut *backend);
        self.frames += 1;

        let notifications = world.take_notifications();
        for n in &notifications {
            log::info!("Frame {}: {:?}", self.frames, n);
        }
        notifications
    }

    /// Run a frame only if the tick period has elapsed
    pub fn poll<B: Canvas + ResourceLoader>(
        &mut self,
        world: &mut World,
        scene: &mut dyn Scene,
        now_ms: u64,
        mouse: Vec2,
        backend: &mut B,
    ) -> Option<Vec<Notification>> {
        if !self.timer.elapsed(now_ms) {
            return None;
        }
        Some(self.run_frame(world, scene, now_ms, mouse, backend))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{KeyCode, WindowEvent};
    use crate::renderer::{DrawCommand, RecordingCanvas, colors};
    use crate::settings::WorldSettings;
    use crate::sim::motion::Motion;
    use crate::sim::shape::{Shape, ShapeId};

    /// Spawns a circle on the first tick and records what it saw
    struct Spawner {
        spawned: Option<ShapeId>,
        live_seen: Vec<usize>,
    }

    impl Scene for Spawner {
        fn update(&mut self, world: &mut World, input: &InputSnapshot) {
            self.live_seen.push(world.live().len());
            if self.spawned.is_none() {
                let brush = world.resources_mut().add_brush(colors::WHITE);
                let shape = Shape::circle(10.0, 10.0, 2.0, Motion::stationary()).with_brush(brush);
                self.spawned = Some(world.spawn(shape, true));
            }
            if input.was_pressed(KeyCode::ESCAPE) {
                world.notify(Notification::Quit);
            }
            world.update();
        }
    }

    #[test]
    fn test_spawned_shape_renders_in_same_frame_after_flush() {
        let mut world = World::new(WorldSettings::with_screen(100.0, 100.0));
        let mut runner = FrameRunner::for_world(&world, 0);
        let mut scene = Spawner {
            spawned: None,
            live_seen: Vec::new(),
        };
        let mut canvas = RecordingCanvas::new();

        runner.run_frame(&mut world, &mut scene, 0, Vec2::ZERO, &mut canvas);
        // Logic did not see it, the flush before render did
        assert_eq!(scene.live_seen, vec![0]);
        assert!(
            canvas
                .last_frame()
                .iter()
                .any(|c| matches!(c, DrawCommand::FillCircle(..)))
        );

        runner.run_frame(&mut world, &mut scene, 20, Vec2::ZERO, &mut canvas);
        assert_eq!(scene.live_seen, vec![0, 1]);
        assert_eq!(runner.frames(), 2);
    }

    #[test]
    fn test_events_reach_scene_and_notifications_come_back() {
        let mut world = World::default();
        let mut runner = FrameRunner::new(20, 0);
        let mut scene = Spawner {
            spawned: None,
            live_seen: Vec::new(),
        };
        let mut canvas = RecordingCanvas::new();

        let events = runner.events();
        events.push(WindowEvent::KeyDown(KeyCode::ESCAPE));
        let out = runner.run_frame(&mut world, &mut scene, 0, Vec2::ZERO, &mut canvas);
        assert_eq!(out, vec![Notification::Quit]);

        let out = runner.run_frame(&mut world, &mut scene, 20, Vec2::ZERO, &mut canvas);
        assert!(out.is_empty());
    }

    #[test]
    fn test_poll_respects_period() {
        let mut world = World::default();
        let mut runner = FrameRunner::new(20, 0);
        let mut ticks = 0;
        let mut scene = |_: &mut World, _: &InputSnapshot| ticks += 1;
        let mut canvas = RecordingCanvas::new();

        assert!(runner.poll(&mut world, &mut scene, 5, Vec2::ZERO, &mut canvas).is_none());
        assert!(runner.poll(&mut world, &mut scene, 20, Vec2::ZERO, &mut canvas).is_some());
        assert!(runner.poll(&mut world, &mut scene, 30, Vec2::ZERO, &mut canvas).is_none());
        assert!(runner.poll(&mut world, &mut scene, 45, Vec2::ZERO, &mut canvas).is_some());
        drop(scene);
        assert_eq!(ticks, 2);
        assert_eq!(runner.frames(), 2);
    }

    #[test]
    fn test_determinism() {
        let run = || {
            let mut world = World::new(WorldSettings::with_screen(200.0, 200.0));
            let ball = world.add_now(Shape::circle(100.0, 100.0, 5.0, Motion::new(7.0, 33)));
            let mut runner = FrameRunner::new(20, 0);
            let mut canvas = RecordingCanvas::new();
            let mut scene = |world: &mut World, _: &InputSnapshot| {
                let hit = world.will_hit_screen(ball);
                if let Some(motion) = world.shapes_mut().motion_mut(ball) {
                    if hit.is_horizontal() {
                        motion.bounce_x();
                    } else if hit.is_vertical() {
                        motion.bounce_y();
                    }
                }
                world.update();
            };
            for frame in 0..200 {
                runner.run_frame(&mut world, &mut scene, frame * 20, Vec2::ZERO, &mut canvas);
            }
            world.shapes().pos(ball)
        };
        assert_eq!(run(), run());
    }
}
