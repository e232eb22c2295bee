//! ss2d demo entry point
//!
//! Runs a small Breakout scene headless: the bat follows the ball, frames are
//! recorded instead of drawn, and a summary is printed at the end.
//!
//! Usage: `ss2d-demo [settings.json] [seed]`

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use ss2d::WorldSettings;
use ss2d::platform::{InputSnapshot, KeyCode};
use ss2d::renderer::{RecordingCanvas, colors};
use ss2d::sim::{
    BoundsHit, FrameRunner, Motion, Notification, Scene, Shape, ShapeId, TextAlign, World,
};

const MAX_FRAMES: u64 = 5_000;
const DEFAULT_SEED: u64 = 0x5eed;

const BRICK_ROWS: usize = 5;
const BRICK_COLS: usize = 10;
const BRICK_HEIGHT: f32 = 24.0;
const BRICK_GAP: f32 = 4.0;
const FIELD_MARGIN: f32 = 40.0;

const BAT_WIDTH: f32 = 160.0;
const BAT_HEIGHT: f32 = 16.0;
const BALL_RADIUS: f32 = 10.0;
const BALL_SPEED: f32 = 9.0;
/// Launch heading varies by up to this many degrees either side of straight up
const LAUNCH_JITTER_DEG: i32 = 30;

struct Breakout {
    rng: Pcg32,
    bat: ShapeId,
    ball: ShapeId,
    bricks: ShapeId,
    score: ShapeId,
    lives: u32,
    points: u32,
}

impl Breakout {
    fn new(world: &mut World, seed: u64) -> Self {
        let screen = world.screen_rect();
        let res = world.resources_mut();
        let white = res.add_brush(colors::WHITE);
        let orange = res.add_brush(colors::ORANGE);
        let row_brushes = [
            res.add_brush(colors::RED),
            res.add_brush(colors::ORANGE),
            res.add_brush(colors::YELLOW),
            res.add_brush(colors::GREEN),
            res.add_brush(colors::BLUE),
        ];

        let bat_y = screen.bottom - FIELD_MARGIN - BAT_HEIGHT;
        let bat = world.add_now(
            Shape::rectangle(
                (screen.width() - BAT_WIDTH) / 2.0,
                bat_y,
                BAT_WIDTH,
                BAT_HEIGHT,
                Motion::stationary(),
            )
            .with_brush(white),
        );
        let ball = world.add_now(
            Shape::circle(
                screen.width() / 2.0,
                bat_y - BALL_RADIUS,
                BALL_RADIUS,
                Motion::stationary(),
            )
            .with_brush(orange),
        );

        let bricks = world.add_now(
            Shape::group(FIELD_MARGIN, FIELD_MARGIN * 2.0, Motion::stationary()).with_brush(white),
        );
        let brick_width = (screen.width() - 2.0 * FIELD_MARGIN) / BRICK_COLS as f32 - BRICK_GAP;
        for row in 0..BRICK_ROWS {
            for col in 0..BRICK_COLS {
                let brick = Shape::rectangle(
                    col as f32 * (brick_width + BRICK_GAP),
                    row as f32 * (BRICK_HEIGHT + BRICK_GAP),
                    brick_width,
                    BRICK_HEIGHT,
                    Motion::stationary(),
                )
                .with_brush(row_brushes[row % row_brushes.len()])
                .with_user_data(((BRICK_ROWS - row) * 10) as i64);
                world.spawn_child(bricks, brick);
            }
        }

        let score = world.add_now(
            Shape::text(
                "Score: 0",
                FIELD_MARGIN,
                8.0,
                400.0,
                40.0,
                TextAlign::Leading,
                Motion::stationary(),
            )
            .with_brush(white),
        );

        let mut game = Self {
            rng: Pcg32::seed_from_u64(seed),
            bat,
            ball,
            bricks,
            score,
            lives: 3,
            points: 0,
        };
        game.launch(world);
        game
    }

    /// Put the ball on top of the bat and send it upwards
    fn launch(&mut self, world: &mut World) {
        let Some(bat) = world.shapes().bounds(self.bat) else {
            return;
        };
        let centre = Vec2::new((bat.left + bat.right) / 2.0, bat.top - BALL_RADIUS - 1.0);
        let heading = self.rng.random_range(-LAUNCH_JITTER_DEG..=LAUNCH_JITTER_DEG);
        let shapes = world.shapes_mut();
        shapes.set_world_pos(self.ball, centre);
        if let Some(motion) = shapes.motion_mut(self.ball) {
            *motion = Motion::new(BALL_SPEED, heading);
        }
        log::info!("Ball launched at {} degrees", heading);
    }

    fn track_bat(&self, world: &mut World, mouse_x: f32) {
        let screen = world.screen_rect();
        let Some(pos) = world.shapes().pos(self.bat) else {
            return;
        };
        let x = (mouse_x - BAT_WIDTH / 2.0).clamp(screen.left, screen.right - BAT_WIDTH);
        world.shapes_mut().set_pos(self.bat, Vec2::new(x, pos.y));
    }

    fn hit_bricks(&mut self, world: &mut World) {
        let candidates = world.shapes().group_will_hit_shapes(self.bricks, self.ball);
        if candidates.is_empty() {
            return;
        }
        let Some((brick, contact)) = world.bounce_off_first(self.ball, &candidates) else {
            return;
        };
        let value = world.shapes().get(brick).map_or(0, |b| b.user_data);
        world.shapes_mut().remove_child(self.bricks, brick, true);
        self.points += value as u32;
        world
            .shapes_mut()
            .set_text(self.score, format!("Score: {}", self.points));
        log::debug!("Brick {:?} hit ({:?}), score {}", brick, contact, self.points);

        if world.shapes().children(self.bricks).is_empty() {
            log::info!("All bricks cleared");
            world.notify(Notification::SwitchScene("cleared".into()));
        }
    }
}

impl Scene for Breakout {
    fn update(&mut self, world: &mut World, input: &InputSnapshot) {
        if input.was_pressed(KeyCode::ESCAPE) {
            world.notify(Notification::Quit);
            return;
        }
        self.track_bat(world, input.mouse.x);

        match world.will_hit_screen(self.ball) {
            BoundsHit::Left | BoundsHit::Right => {
                if let Some(m) = world.shapes_mut().motion_mut(self.ball) {
                    m.bounce_x();
                }
            }
            BoundsHit::Top => {
                if let Some(m) = world.shapes_mut().motion_mut(self.ball) {
                    m.bounce_y();
                }
            }
            BoundsHit::Bottom => {
                self.lives = self.lives.saturating_sub(1);
                log::info!("Ball lost, {} lives left", self.lives);
                if self.lives == 0 {
                    world.notify(Notification::Quit);
                    return;
                }
                self.launch(world);
            }
            BoundsHit::Ok => {
                if !world.will_bounce_off_rect_sides(self.ball, self.bat) {
                    world.will_bounce_off_rect_corners(self.ball, self.bat);
                }
                self.hit_bricks(world);
            }
        }

        world.update();
    }
}

fn load_settings(path: Option<&str>) -> WorldSettings {
    let Some(path) = path else {
        return WorldSettings::default();
    };
    match WorldSettings::load(path) {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("Failed to load settings from {}: {}", path, e);
            WorldSettings::default()
        }
    }
}

fn main() {
    env_logger::init();
    log::info!("ss2d demo starting...");

    let args: Vec<String> = std::env::args().collect();
    let settings = load_settings(args.get(1).map(String::as_str));
    let seed = args
        .get(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SEED);

    let mut world = World::new(settings);
    let mut game = Breakout::new(&mut world, seed);
    let mut runner = FrameRunner::for_world(&world, 0);
    let mut canvas = RecordingCanvas::new();
    let period = world.settings().tick_period_ms;
    log::info!("Game initialized with seed: {}", seed);

    let mut ended_by = None;
    for frame in 0..MAX_FRAMES {
        // Only keep the latest frame around
        canvas.reset();
        // Autoplay: the mouse follows the ball
        let mouse = world.shapes().pos(game.ball).unwrap_or_default();
        let notifications =
            runner.run_frame(&mut world, &mut game, frame * period, mouse, &mut canvas);
        if let Some(n) = notifications.into_iter().next() {
            ended_by = Some(n);
            break;
        }
    }

    println!("Frames run:     {}", runner.frames());
    println!("Score:          {}", game.points);
    println!("Lives left:     {}", game.lives);
    println!(
        "Bricks left:    {}",
        world.shapes().children(game.bricks).len()
    );
    println!("Last frame ops: {}", canvas.last_frame().len());
    match ended_by {
        Some(n) => println!("Ended by:       {:?}", n),
        None => println!("Ended by:       frame limit"),
    }
}
