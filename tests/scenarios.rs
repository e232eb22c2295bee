//! End-to-end scenarios through the public API

use glam::Vec2;

use ss2d::WorldSettings;
use ss2d::platform::InputSnapshot;
use ss2d::renderer::{DrawCommand, RecordingCanvas, colors};
use ss2d::sim::{BoundsHit, FrameRunner, Motion, Rect, Shape, ShapeId, World};

fn approx(a: Vec2, b: Vec2) -> bool {
    (a - b).length() < 1e-2
}

#[test]
fn diagonal_ball_advances_one_step() {
    let mut world = World::default();
    let ball = world.add_now(Shape::circle(200.0, 600.0, 8.0, Motion::new(10.0, 135)));
    world.update();
    let pos = world.shapes().pos(ball).unwrap();
    assert!(approx(pos, Vec2::new(207.07, 607.07)), "got {pos:?}");
}

#[test]
fn screen_edge_reports_right_then_bounces_left() {
    let mut world = World::new(WorldSettings::with_screen(640.0, 480.0));
    let paddle = world.add_now(Shape::rectangle(630.0, 200.0, 8.0, 40.0, Motion::new(6.0, 80)));

    assert_eq!(world.will_hit_screen(paddle), BoundsHit::Right);
    // Look-ahead only
    assert_eq!(world.shapes().pos(paddle), Some(Vec2::new(630.0, 200.0)));

    world.shapes_mut().motion_mut(paddle).unwrap().bounce_x();
    assert!(world.shapes().motion(paddle).unwrap().step().x < 0.0);
    assert_eq!(world.will_hit_screen(paddle), BoundsHit::Ok);
}

#[test]
fn ball_inside_box_bounces_in_crossing_tick() {
    let mut world = World::new(WorldSettings::with_screen(1000.0, 1000.0));
    let field = world.add_now(Shape::rectangle(0.0, 0.0, 100.0, 100.0, Motion::stationary()));
    let ball = world.add_now(Shape::circle(85.0, 50.0, 10.0, Motion::new(5.0, 90)));

    let mut bounced = None;
    for tick in 0..5 {
        if world.will_bounce_off_rect_sides(ball, field) {
            bounced = Some(tick);
            break;
        }
        world.update();
    }
    assert_eq!(bounced, Some(2));
    assert!(world.shapes().motion(ball).unwrap().step().x < 0.0);
}

#[test]
fn spawned_shape_joins_next_tick() {
    let mut world = World::new(WorldSettings::with_screen(100.0, 100.0));
    let mut runner = FrameRunner::for_world(&world, 0);
    let mut canvas = RecordingCanvas::new();

    let mut spawned: Option<ShapeId> = None;
    let mut seen_live = Vec::new();
    let mut scene = |world: &mut World, _: &InputSnapshot| {
        if let Some(id) = spawned {
            seen_live.push(world.is_live(id));
        } else {
            let id = world.spawn(Shape::rectangle(1.0, 1.0, 2.0, 2.0, Motion::new(1.0, 180)), true);
            seen_live.push(world.is_live(id));
            spawned = Some(id);
        }
        world.update();
    };
    for frame in 0..3 {
        runner.run_frame(&mut world, &mut scene, frame * 20, Vec2::ZERO, &mut canvas);
    }
    drop(scene);

    assert_eq!(seen_live, vec![false, true, true]);
    // Never advanced in its first tick; advanced in the two after
    let pos = world.shapes().pos(spawned.unwrap()).unwrap();
    assert!(approx(pos, Vec2::new(1.0, 3.0)), "got {pos:?}");
}

#[test]
fn group_bounds_are_child_union() {
    let mut world = World::default();
    let group = world.add_now(Shape::group(0.0, 0.0, Motion::stationary()));
    world
        .spawn_child(group, Shape::rectangle(0.0, 0.0, 50.0, 50.0, Motion::stationary()))
        .unwrap();
    world
        .spawn_child(group, Shape::rectangle(60.0, 0.0, 50.0, 50.0, Motion::stationary()))
        .unwrap();
    assert_eq!(world.shapes().bounds(group), Some(Rect::new(0.0, 0.0, 110.0, 50.0)));

    // Moving the group moves its box, not its local union
    world.shapes_mut().set_pos(group, Vec2::new(10.0, 10.0));
    assert_eq!(world.shapes().bounds(group), Some(Rect::new(10.0, 10.0, 120.0, 60.0)));
    assert_eq!(
        world.shapes().group_local_bounds(group),
        Some(Rect::new(0.0, 0.0, 110.0, 50.0))
    );
}

#[test]
fn missing_bitmap_draws_nothing_but_still_collides() {
    let mut world = World::new(WorldSettings::with_screen(200.0, 200.0));
    let white = world.resources_mut().add_brush(colors::WHITE);
    let art = world.resources_mut().add_bitmap("assets/brick.png");
    let brick = world.add_now(Shape::bitmap(
        Some(art),
        50.0,
        100.0,
        100.0,
        10.0,
        Motion::stationary(),
    ));
    let ball = world.add_now(
        Shape::circle(100.0, 80.0, 5.0, Motion::new(20.0, 180)).with_brush(white),
    );

    let mut canvas = RecordingCanvas::new().with_missing("assets/brick.png");
    let mut runner = FrameRunner::for_world(&world, 0);
    let mut bounced = false;
    let mut scene = |world: &mut World, _: &InputSnapshot| {
        bounced |= world.bounce_off_first(ball, &[brick]).is_some();
        world.update();
    };
    runner.run_frame(&mut world, &mut scene, 0, Vec2::ZERO, &mut canvas);
    drop(scene);

    assert!(bounced);
    assert!(world.shapes().motion(ball).unwrap().step().y < 0.0);
    let frame = canvas.last_frame();
    assert!(frame.iter().any(|c| matches!(c, DrawCommand::FillCircle(..))));
    assert!(!frame.iter().any(|c| matches!(c, DrawCommand::Bitmap(..))));
}
