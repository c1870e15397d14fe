//! Headless demo runner
//!
//! Drives the simulation with a scripted pilot and null sinks. Useful for
//! soak-testing balance changes and for profiling the tick without a
//! browser host attached.
//!
//! Usage: gridfall [seed] [seconds]

use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use gridfall::Tuning;
use gridfall::audio::NullAudio;
use gridfall::consts::{MAX_SUBSTEPS, PLAYER_WIDTH, SIM_DT};
use gridfall::hud::{HudFrame, HudSink};
use gridfall::render::NullRender;
use gridfall::sim::{Control, GamePhase, GameWorld, InputState, Viewport, tick};

/// Host frames to sit on the game over screen before restarting
const RESTART_DELAY_FRAMES: u32 = 120;

/// Longest host frame the accumulator will absorb, seconds
const MAX_FRAME_DT: f32 = 0.1;

/// HUD sink that logs a status line once a second
#[derive(Default)]
struct LogHud {
    frames: u64,
}

impl HudSink for LogHud {
    fn show(&mut self, frame: &HudFrame) {
        self.frames += 1;
        if self.frames % 60 == 0 {
            log::debug!(
                "score {} (best {}) level {} kills {} ammo {}/{}",
                frame.score,
                frame.high_score,
                frame.level,
                frame.kills,
                frame.ammo,
                frame.ammo_max
            );
        }
    }
}

/// Scripted stand-in for a player: chases the formation midpoint and fires
/// on a steady rhythm
struct Pilot {
    restart_delay: u32,
    games: u32,
}

impl Pilot {
    fn new() -> Self {
        Self {
            restart_delay: 0,
            games: 1,
        }
    }

    fn drive(&mut self, world: &mut GameWorld, input: &mut InputState) {
        if world.phase == GamePhase::GameOver {
            *input = InputState::default();
            self.restart_delay += 1;
            if self.restart_delay >= RESTART_DELAY_FRAMES {
                self.restart_delay = 0;
                self.games += 1;
                world.restart();
            }
            return;
        }

        // Track the center of the formation
        input.release(Control::Left);
        input.release(Control::Right);
        if let Some((min_x, max_x)) = world.grid.horizontal_extent() {
            let target = (min_x + max_x) / 2.0;
            let center = world.player.pos.x + PLAYER_WIDTH / 2.0;
            if target < center - 10.0 {
                input.press(Control::Left);
            } else if target > center + 10.0 {
                input.press(Control::Right);
            }
        }

        // Fire every third of a second, release on the next tick
        match world.tick_count % 20 {
            0 => input.press(Control::Shoot),
            1 => input.release(Control::Shoot),
            _ => {}
        }
    }
}

/// Wall-clock seed for runs that do not pass one
fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0x5eed)
}

/// One positional argument. Malformed values are logged and dropped rather
/// than aborting the run.
fn parse_arg<T: FromStr>(raw: Option<String>, name: &str) -> Option<T> {
    let raw = raw?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("ignoring {} argument {:?}: not a number", name, raw);
            None
        }
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> (u64, f32) {
    let seed = parse_arg(args.next(), "seed").unwrap_or_else(clock_seed);
    let seconds: f32 = parse_arg(args.next(), "seconds").unwrap_or(60.0);
    (seed, seconds.clamp(1.0, 3600.0))
}

fn main() {
    env_logger::init();

    let (seed, seconds) = parse_args(std::env::args().skip(1));
    log::info!("gridfall headless demo: seed {}, {:.0}s", seed, seconds);

    let mut world = GameWorld::new(Viewport::new(800.0, 600.0), Tuning::default(), seed);
    world.start();

    let mut input = InputState::default();
    let mut pilot = Pilot::new();
    let mut render = NullRender;
    let mut hud = LogHud::default();
    let mut audio = NullAudio;

    // Synthetic host clock: one 60 Hz frame per iteration, run through the
    // same accumulator a real host would use
    let frame_dt: f32 = 1.0 / 60.0;
    let total_frames = (seconds * 60.0) as u64;
    let mut accumulator = 0.0f32;

    for _ in 0..total_frames {
        accumulator += frame_dt.min(MAX_FRAME_DT);

        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            pilot.drive(&mut world, &mut input);
            tick(
                &mut world,
                &mut input,
                SIM_DT,
                &mut render,
                &mut hud,
                &mut audio,
            );
            accumulator -= SIM_DT;
            substeps += 1;
        }
    }

    log::info!(
        "done: {} game(s), final score {}, best {}, level {}",
        pilot.games,
        world.data.score,
        world.data.high_score,
        world.data.level
    );
    for (i, entry) in world.scoreboard.entries.iter().enumerate() {
        log::info!("  #{}: {} (level {})", i + 1, entry.score, entry.level);
    }
}
