//! Headless canvas that records draw calls
//!
//! Used by the demo binary and tests. It also acts as a resource loader
//! that "fails" to load any bitmap path it was told is missing.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use glam::Vec2;

use super::resources::{BitmapId, BrushId, Color, ResourceLoader};
use super::Canvas;
use crate::sim::{Rect, TextAlign};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    FillRect(Rect, BrushId),
    FillCircle(Vec2, f32, BrushId),
    OutlineRect(Rect, BrushId),
    Bitmap(BitmapId, Rect, f32),
    Text(String, Rect, TextAlign, BrushId),
}

#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub commands: Vec<DrawCommand>,
    missing: BTreeSet<PathBuf>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `load_bitmap` fail for `path`
    pub fn with_missing(mut self, path: impl Into<PathBuf>) -> Self {
        self.missing.insert(path.into());
        self
    }

    /// Commands of the last frame (since the last clear)
    pub fn last_frame(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear(_)))
            .map(|i| i + 1)
            .unwrap_or(0);
        &self.commands[start..]
    }

    pub fn reset(&mut self) {
        self.commands.clear();
    }
}

impl Canvas for RecordingCanvas {
    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_rect(&mut self, rect: Rect, brush: BrushId) {
        self.commands.push(DrawCommand::FillRect(rect, brush));
    }

    fn fill_circle(&mut self, centre: Vec2, radius: f32, brush: BrushId) {
        self.commands.push(DrawCommand::FillCircle(centre, radius, brush));
    }

    fn outline_rect(&mut self, rect: Rect, brush: BrushId) {
        self.commands.push(DrawCommand::OutlineRect(rect, brush));
    }

    fn draw_bitmap(&mut self, bitmap: BitmapId, rect: Rect, opacity: f32) {
        self.commands.push(DrawCommand::Bitmap(bitmap, rect, opacity));
    }

    fn draw_text(&mut self, text: &str, rect: Rect, align: TextAlign, brush: BrushId) {
        self.commands
            .push(DrawCommand::Text(text.to_string(), rect, align, brush));
    }
}

impl ResourceLoader for RecordingCanvas {
    fn create_brush(&mut self, _id: BrushId, _color: Color) -> bool {
        true
    }

    fn load_bitmap(&mut self, _id: BitmapId, path: &Path) -> bool {
        !self.missing.contains(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WorldSettings;
    use crate::renderer::{colors, render};
    use crate::sim::{Motion, Shape, World};

    #[test]
    fn test_unrealized_and_missing_visuals_are_skipped() {
        let mut world = World::new(WorldSettings::default());
        let red = world.resources_mut().add_brush(colors::RED);
        let ship = world.resources_mut().add_bitmap("ship.png");
        let gone = world.resources_mut().add_bitmap("gone.png");

        world.add_now(Shape::rectangle(0.0, 0.0, 10.0, 10.0, Motion::stationary()).with_brush(red));
        world.add_now(Shape::circle(50.0, 50.0, 5.0, Motion::stationary()));
        world.add_now(Shape::bitmap(Some(ship), 20.0, 20.0, 8.0, 8.0, Motion::stationary()));
        world.add_now(Shape::bitmap(Some(gone), 30.0, 30.0, 8.0, 8.0, Motion::stationary()));

        // Nothing realized yet: only the clear
        let mut canvas = RecordingCanvas::new().with_missing("gone.png");
        render(&world, &mut canvas);
        assert_eq!(canvas.last_frame().len(), 0);

        world.resources_mut().realize(&mut canvas);
        render(&world, &mut canvas);
        let frame = canvas.last_frame();
        assert_eq!(frame.len(), 2);
        assert!(matches!(frame[0], DrawCommand::FillRect(_, b) if b == red));
        assert!(matches!(frame[1], DrawCommand::Bitmap(b, _, _) if b == ship));
    }

    #[test]
    fn test_group_draws_active_children_and_debug_bounds() {
        let mut settings = WorldSettings::default();
        settings.draw.show_group_bounds = true;
        let mut world = World::new(settings);
        let white = world.resources_mut().add_brush(colors::WHITE);

        let group =
            world.add_now(Shape::group(100.0, 100.0, Motion::stationary()).with_brush(white));
        let brick = |x: f32| {
            Shape::rectangle(x, 0.0, 10.0, 10.0, Motion::stationary()).with_brush(white)
        };
        let a = world.spawn_child(group, brick(0.0)).unwrap();
        let b = world.spawn_child(group, brick(20.0)).unwrap();
        world.shapes_mut().set_active(b, false);

        let mut canvas = RecordingCanvas::new();
        world.resources_mut().realize(&mut canvas);
        render(&world, &mut canvas);

        let frame = canvas.last_frame();
        assert_eq!(
            frame,
            &[
                DrawCommand::OutlineRect(Rect::new(100.0, 100.0, 130.0, 110.0), white),
                DrawCommand::FillRect(Rect::new(100.0, 100.0, 110.0, 110.0), white),
            ]
        );
        assert!(world.shapes().is_active(a));
    }
}
